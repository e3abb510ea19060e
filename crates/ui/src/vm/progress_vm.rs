use serde::Serialize;

use hud_core::{ProgressBar, ProgressFrame};

use super::format::format_percent;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressVm {
    pub label: String,
    pub width: f64,
    pub percent_label: String,
    pub cancel_visible: bool,
    pub visible: bool,
}

#[must_use]
pub fn map_progress_started(bar: &ProgressBar) -> ProgressVm {
    ProgressVm {
        label: bar.label().to_string(),
        width: bar.percent(),
        percent_label: format_percent(bar.percent()),
        cancel_visible: bar.cancellable(),
        visible: true,
    }
}

pub fn apply_progress_frame(vm: &mut ProgressVm, frame: ProgressFrame) {
    vm.width = frame.percent;
    vm.percent_label = format_percent(frame.percent);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hud_core::{ProgressCurve, ProgressParams};

    use super::*;

    #[test]
    fn tracks_bar_percent() {
        let bar = ProgressBar::begin(ProgressParams::new(
            "Delivering",
            Duration::from_secs(1),
            true,
        ))
        .unwrap();
        let mut vm = map_progress_started(&bar);

        assert_eq!(vm.label, "Delivering");
        assert_eq!(vm.percent_label, "0%");
        assert!(vm.cancel_visible);

        apply_progress_frame(&mut vm, ProgressFrame { percent: 64.5 });

        assert_eq!(vm.width, 64.5);
        assert_eq!(vm.percent_label, "65%");
    }
}
