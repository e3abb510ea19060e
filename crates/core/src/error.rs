use thiserror::Error;

/// Rejected start parameters. The controller stays idle when this is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ParamsError {
    #[error("target litres must be a positive number, got {0}")]
    TargetLitres(f64),
    #[error("price per litre must be a positive number, got {0}")]
    PricePerLitre(f64),
    #[error("fuel rate must be a positive number, got {0}")]
    FuelRate(f64),
    #[error("progress duration must be greater than zero")]
    ZeroDuration,
    #[error("progress duration must be a positive number of milliseconds, got {0}")]
    DurationMillis(f64),
}

/// Returns `value` when it is a finite number above zero.
pub(crate) fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
