/// Input bounds for the litres and price fields of the order card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLimits {
    pub max_litres: f64,
    pub litres_step: f64,
    pub max_price: f64,
    pub price_step: f64,
}

/// Litres and price kept in sync while the player edits the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderQuote {
    pub litres: f64,
    pub price: f64,
    /// Tank fill after the order, as a percentage of the tank.
    pub fill_percent: f64,
}

/// Converts between litres and price for a station's order card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderForm {
    litre_price: f64,
    current_fuel: f64,
    max_litres: f64,
}

impl OrderForm {
    #[must_use]
    pub fn new(litre_price: f64, current_fuel: f64, max_litres: f64) -> Self {
        Self {
            litre_price,
            current_fuel,
            max_litres,
        }
    }

    /// Litres that still fit in the tank.
    #[must_use]
    pub fn capacity(&self) -> f64 {
        (self.max_litres - self.current_fuel).max(0.0)
    }

    #[must_use]
    pub fn limits(&self) -> InputLimits {
        let capacity = self.capacity();
        InputLimits {
            max_litres: capacity,
            litres_step: 1.0,
            max_price: (capacity * self.litre_price).floor(),
            price_step: self.litre_price,
        }
    }

    /// The player typed a litre amount.
    #[must_use]
    pub fn litres_changed(&self, litres: f64) -> OrderQuote {
        let litres = sanitize(litres).min(self.capacity());
        OrderQuote {
            litres,
            price: (litres * self.litre_price).floor(),
            fill_percent: self.fill_percent(litres),
        }
    }

    /// The player typed a price.
    #[must_use]
    pub fn price_changed(&self, price: f64) -> OrderQuote {
        let price = sanitize(price);
        let litres = if self.litre_price > 0.0 {
            (price / self.litre_price).floor()
        } else {
            0.0
        };
        OrderQuote {
            litres,
            price,
            fill_percent: self.fill_percent(litres),
        }
    }

    /// Litres to request from the host, or `None` when either field is zero.
    #[must_use]
    pub fn submit(&self, litres: f64, price: f64) -> Option<f64> {
        let litres = sanitize(litres);
        let price = sanitize(price);
        if litres == 0.0 || price == 0.0 {
            return None;
        }
        Some(litres)
    }

    fn fill_percent(&self, litres: f64) -> f64 {
        if self.max_litres <= 0.0 {
            return 0.0;
        }
        (self.current_fuel + litres) / self.max_litres * 100.0
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
