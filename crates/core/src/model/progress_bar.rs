use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::timed::ProgressCurve;

/// Label shown when the host does not send one.
pub const DEFAULT_PROGRESS_LABEL: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressParams {
    pub label: String,
    pub duration: Duration,
    pub cancellable: bool,
}

impl ProgressParams {
    #[must_use]
    pub fn new(label: impl Into<String>, duration: Duration, cancellable: bool) -> Self {
        Self {
            label: label.into(),
            duration,
            cancellable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFrame {
    /// Percentage in `[0, 100]`.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressComplete {
    pub completed: bool,
}

/// A bar that fills linearly over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    label: String,
    duration: Duration,
    cancellable: bool,
    percent: f64,
}

impl ProgressBar {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn cancellable(&self) -> bool {
        self.cancellable
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl ProgressCurve for ProgressBar {
    type Params = ProgressParams;
    type Frame = ProgressFrame;
    type Outcome = ProgressComplete;

    fn begin(params: ProgressParams) -> Result<Self, ParamsError> {
        if params.duration.is_zero() {
            return Err(ParamsError::ZeroDuration);
        }
        let label = if params.label.trim().is_empty() {
            DEFAULT_PROGRESS_LABEL.to_string()
        } else {
            params.label
        };

        Ok(Self {
            label,
            duration: params.duration,
            cancellable: params.cancellable,
            percent: 0.0,
        })
    }

    fn advance(&mut self, elapsed: Duration) -> ProgressFrame {
        let pct = (elapsed.as_secs_f64() / self.duration.as_secs_f64() * 100.0).min(100.0);
        self.percent = self.percent.max(pct);
        self.frame()
    }

    fn frame(&self) -> ProgressFrame {
        ProgressFrame {
            percent: self.percent,
        }
    }

    fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    fn outcome(&self, completed: bool) -> ProgressComplete {
        ProgressComplete { completed }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn bar(duration_ms: u64) -> ProgressBar {
        ProgressBar::begin(ProgressParams::new(
            "Delivering fuel",
            Duration::from_millis(duration_ms),
            true,
        ))
        .unwrap()
    }

    #[test]
    fn percent_is_linear_in_elapsed_time() {
        let mut bar = bar(1_000);

        assert_relative_eq!(bar.advance(Duration::from_millis(400)).percent, 40.0);
        assert!(!bar.is_complete());
    }

    #[test]
    fn reaches_exactly_one_hundred_at_duration() {
        let mut bar = bar(2_500);

        let frame = bar.advance(Duration::from_millis(2_500));

        assert_eq!(frame.percent, 100.0);
        assert!(bar.is_complete());
    }

    #[test]
    fn clamps_past_duration() {
        let mut bar = bar(1_000);

        assert_eq!(bar.advance(Duration::from_secs(9)).percent, 100.0);
    }

    #[test]
    fn blank_label_uses_default() {
        let bar = ProgressBar::begin(ProgressParams::new(
            "  ",
            Duration::from_millis(10),
            false,
        ))
        .unwrap();

        assert_eq!(bar.label(), DEFAULT_PROGRESS_LABEL);
        assert!(!bar.cancellable());
    }
}
