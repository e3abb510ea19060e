/// Fixed-point rendering, e.g. `format_number(2.5, 2) == "2.50"`.
///
/// Exact binary ties (0.125 at two places) round to even, not up.
#[must_use]
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

#[must_use]
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol}{}", format_number(value, 2))
}

/// Whole-number percentage label, rounding half up.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    format!("{}%", percent.round())
}

#[must_use]
pub fn format_rate(litres_per_second: f64) -> String {
    format!("{litres_per_second} L/s")
}
