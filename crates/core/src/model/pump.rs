use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, positive};
use crate::timed::ProgressCurve;

/// Start parameters for a pump session.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpParams {
    pub target_litres: f64,
    pub price_per_litre: f64,
    /// Litres delivered per second.
    pub fuel_rate: f64,
    pub station_name: Option<String>,
}

/// Display values for one pump tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpFrame {
    pub litres: f64,
    pub target_litres: f64,
    pub total_cost: f64,
    pub price_per_litre: f64,
    pub fuel_rate: f64,
    /// Share of the target delivered, in `[0, 100]`.
    pub percent: f64,
}

/// Terminal report for a pump session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpComplete {
    /// Litres delivered, truncated to one decimal and never negative.
    pub litres: f64,
    pub completed: bool,
}

/// Litres pumped at a fixed flow rate until the target is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelPump {
    target_litres: f64,
    price_per_litre: f64,
    fuel_rate: f64,
    station_name: Option<String>,
    current_litres: f64,
    total_cost: f64,
}

impl FuelPump {
    #[must_use]
    pub fn target_litres(&self) -> f64 {
        self.target_litres
    }

    #[must_use]
    pub fn price_per_litre(&self) -> f64 {
        self.price_per_litre
    }

    #[must_use]
    pub fn fuel_rate(&self) -> f64 {
        self.fuel_rate
    }

    #[must_use]
    pub fn station_name(&self) -> Option<&str> {
        self.station_name.as_deref()
    }

    #[must_use]
    pub fn current_litres(&self) -> f64 {
        self.current_litres
    }

    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        (self.current_litres / self.target_litres * 100.0).clamp(0.0, 100.0)
    }

    /// Litres reported to the host: truncated to one decimal, floored at zero.
    #[must_use]
    pub fn reported_litres(&self) -> f64 {
        ((self.current_litres * 10.0).floor() / 10.0).max(0.0)
    }
}

impl ProgressCurve for FuelPump {
    type Params = PumpParams;
    type Frame = PumpFrame;
    type Outcome = PumpComplete;

    fn begin(params: PumpParams) -> Result<Self, ParamsError> {
        let target_litres =
            positive(params.target_litres).ok_or(ParamsError::TargetLitres(params.target_litres))?;
        let price_per_litre = positive(params.price_per_litre)
            .ok_or(ParamsError::PricePerLitre(params.price_per_litre))?;
        let fuel_rate =
            positive(params.fuel_rate).ok_or(ParamsError::FuelRate(params.fuel_rate))?;

        Ok(Self {
            target_litres,
            price_per_litre,
            fuel_rate,
            station_name: params.station_name,
            current_litres: 0.0,
            total_cost: 0.0,
        })
    }

    fn advance(&mut self, elapsed: Duration) -> PumpFrame {
        let pumped = (elapsed.as_secs_f64() * self.fuel_rate).min(self.target_litres);
        self.current_litres = self.current_litres.max(pumped);
        self.total_cost = self.current_litres * self.price_per_litre;
        self.frame()
    }

    fn frame(&self) -> PumpFrame {
        PumpFrame {
            litres: self.current_litres,
            target_litres: self.target_litres,
            total_cost: self.total_cost,
            price_per_litre: self.price_per_litre,
            fuel_rate: self.fuel_rate,
            percent: self.percent(),
        }
    }

    fn is_complete(&self) -> bool {
        self.current_litres >= self.target_litres
    }

    fn outcome(&self, completed: bool) -> PumpComplete {
        PumpComplete {
            litres: self.reported_litres(),
            completed,
        }
    }
}
