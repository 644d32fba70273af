use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    Axis, AxisRange, FrequencyScaleMapper, FrequencyScaleMode, NormalizedPointer, ViewportModel,
    format_time,
};
use crate::error::{ViewerError, ViewerResult};

/// One wheel event as delivered by the input backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub alt: bool,
    pub shift: bool,
    pub ctrl: bool,
}

impl WheelInput {
    #[must_use]
    pub fn new(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn validate(self) -> ViewerResult<Self> {
        if !self.delta_x.is_finite() || !self.delta_y.is_finite() {
            return Err(ViewerError::InvalidData(
                "wheel deltas must be finite".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelMode {
    /// Adjusts the amplitude window center and width.
    Amplitude,
    /// Grows or shrinks the view about its center.
    Zoom,
    /// Translates the view.
    Pan,
}

impl WheelMode {
    /// Ctrl selects zoom even when alt or shift is also held.
    #[must_use]
    pub fn resolve(input: WheelInput) -> Self {
        if input.ctrl {
            Self::Zoom
        } else if input.alt || input.shift {
            Self::Amplitude
        } else {
            Self::Pan
        }
    }
}

/// Step sizes applied per unit of wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelTuning {
    /// Pan step as a fraction of the visible width.
    #[serde(default = "default_pan_step_ratio")]
    pub pan_step_ratio: f64,
    /// Half-width change as a fraction of the visible width.
    #[serde(default = "default_zoom_step_ratio")]
    pub zoom_step_ratio: f64,
    /// Amplitude units per unit of wheel delta.
    #[serde(default = "default_amplitude_step_ratio")]
    pub amplitude_step_ratio: f64,
    #[serde(default = "default_min_amplitude_width")]
    pub min_amplitude_width: f64,
    /// Smallest view width reachable by zooming in, as a fraction of the domain.
    #[serde(default = "default_min_view_fraction")]
    pub min_view_fraction: f64,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            pan_step_ratio: default_pan_step_ratio(),
            zoom_step_ratio: default_zoom_step_ratio(),
            amplitude_step_ratio: default_amplitude_step_ratio(),
            min_amplitude_width: default_min_amplitude_width(),
            min_view_fraction: default_min_view_fraction(),
        }
    }
}

fn default_pan_step_ratio() -> f64 {
    0.01
}

fn default_zoom_step_ratio() -> f64 {
    0.01
}

fn default_amplitude_step_ratio() -> f64 {
    0.1
}

fn default_min_amplitude_width() -> f64 {
    1.0
}

fn default_min_view_fraction() -> f64 {
    1e-3
}

impl WheelTuning {
    pub fn validate(self) -> ViewerResult<Self> {
        let fields = [
            ("pan_step_ratio", self.pan_step_ratio),
            ("zoom_step_ratio", self.zoom_step_ratio),
            ("amplitude_step_ratio", self.amplitude_step_ratio),
            ("min_amplitude_width", self.min_amplitude_width),
            ("min_view_fraction", self.min_view_fraction),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ViewerError::InvalidData(format!(
                    "wheel tuning `{name}` must be finite and > 0"
                )));
            }
        }
        if self.min_view_fraction > 1.0 {
            return Err(ViewerError::InvalidData(
                "wheel tuning `min_view_fraction` must be <= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Applies one wheel event to `viewport` and returns the mode that handled it.
///
/// Overflow past the domain is clamped, never rejected. Only non-finite
/// deltas are errors, and they leave the viewport untouched.
pub fn apply_wheel(
    viewport: &mut ViewportModel,
    input: WheelInput,
    tuning: &WheelTuning,
) -> ViewerResult<WheelMode> {
    let input = input.validate()?;
    let mode = WheelMode::resolve(input);
    match mode {
        WheelMode::Amplitude => adjust_amplitude(viewport, input, tuning)?,
        WheelMode::Zoom => zoom(viewport, input, tuning),
        WheelMode::Pan => pan(viewport, input, tuning),
    }
    trace!(?mode, delta_x = input.delta_x, delta_y = input.delta_y, "applied wheel input");
    Ok(mode)
}

fn adjust_amplitude(
    viewport: &mut ViewportModel,
    input: WheelInput,
    tuning: &WheelTuning,
) -> ViewerResult<()> {
    let (width_delta, center_delta) = if input.shift {
        (input.delta_y, input.delta_x)
    } else {
        (input.delta_x, input.delta_y)
    };
    let current = viewport.view().amplitude;
    let width = (current.width() + width_delta * tuning.amplitude_step_ratio)
        .max(tuning.min_amplitude_width);
    let center = current.center() + center_delta * tuning.amplitude_step_ratio;

    let mut amplitude = AxisRange::centered(center, width / 2.0)?;
    amplitude.confine_to(viewport.domain().amplitude);
    viewport.view_mut().amplitude = amplitude;
    Ok(())
}

fn zoom(viewport: &mut ViewportModel, input: WheelInput, tuning: &WheelTuning) {
    zoom_axis(viewport, Axis::Time, input.delta_y, tuning);
    if !input.shift {
        zoom_axis(viewport, Axis::Frequency, input.delta_y, tuning);
    }
}

fn zoom_axis(viewport: &mut ViewportModel, axis: Axis, delta: f64, tuning: &WheelTuning) {
    let domain = viewport.domain().range(axis);
    let view_width = viewport.view().width(axis);
    let domain_width = domain.width();

    let mut half_step = delta * tuning.zoom_step_ratio * view_width;
    if view_width + 2.0 * half_step > domain_width {
        half_step = (domain_width - view_width) / 2.0;
    }
    if half_step < 0.0 {
        let floor_width = (tuning.min_view_fraction * domain_width).min(view_width);
        half_step = half_step.max((floor_width - view_width) / 2.0);
    }
    if half_step == 0.0 {
        return;
    }

    let range = viewport.view_mut().range_mut(axis);
    range.min -= half_step;
    range.max += half_step;
    range.confine_to(domain);
}

fn pan(viewport: &mut ViewportModel, input: WheelInput, tuning: &WheelTuning) {
    // shift swaps axis roles, but `WheelMode::resolve` sends shift-held input
    // to amplitude mode first, so `apply_wheel` never takes this branch
    let (time_delta, frequency_delta) = if input.shift {
        (-input.delta_y, input.delta_x)
    } else {
        (input.delta_x, -input.delta_y)
    };
    pan_axis(viewport, Axis::Time, time_delta, tuning);
    pan_axis(viewport, Axis::Frequency, frequency_delta, tuning);
}

fn pan_axis(viewport: &mut ViewportModel, axis: Axis, delta: f64, tuning: &WheelTuning) {
    let domain = viewport.domain().range(axis);
    let view = viewport.view().range(axis);

    let mut shift = delta * tuning.pan_step_ratio * view.width();
    if view.max + shift > domain.max {
        shift = domain.max - view.max;
    }
    if view.min + shift < domain.min {
        shift = domain.min - view.min;
    }
    if shift == 0.0 {
        return;
    }

    let range = viewport.view_mut().range_mut(axis);
    range.min += shift;
    range.max += shift;
    range.confine_to(domain);
}

/// Values shown next to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorReadout {
    pub time: f64,
    pub frequency: f64,
    pub amplitude_center: f64,
    pub amplitude_half_width: f64,
}

impl CursorReadout {
    /// Readout for a pointer measured from the top-left of the surface.
    pub fn at(viewport: &ViewportModel, pointer: NormalizedPointer) -> ViewerResult<Self> {
        let (time, frequency) = viewport.position_at(pointer)?;
        let amplitude = viewport.view().amplitude;
        Ok(Self {
            time,
            frequency,
            amplitude_center: amplitude.center(),
            amplitude_half_width: amplitude.width() / 2.0,
        })
    }

    /// `"<time>, <freq>\n<center> dB ± <half width> dB"`.
    #[must_use]
    pub fn label(&self, viewport: &ViewportModel, mode: FrequencyScaleMode) -> String {
        let mapper = FrequencyScaleMapper::for_viewport(viewport, mode);
        format!(
            "{}, {}\n{:.2} dB ± {:.2} dB",
            format_time(self.time),
            mapper.format(self.frequency),
            self.amplitude_center,
            self.amplitude_half_width
        )
    }
}

/// Pointer tracking for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pointer: Option<NormalizedPointer>,
}

impl CursorState {
    #[must_use]
    pub fn pointer(self) -> Option<NormalizedPointer> {
        self.pointer
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.pointer.is_some()
    }

    pub fn on_pointer_move(&mut self, pointer: NormalizedPointer) -> ViewerResult<()> {
        self.pointer = Some(pointer.validate()?);
        Ok(())
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Readout at the last pointer position, if the pointer is over the surface.
    pub fn readout(self, viewport: &ViewportModel) -> ViewerResult<Option<CursorReadout>> {
        self.pointer
            .map(|pointer| CursorReadout::at(viewport, pointer))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{CursorReadout, CursorState, WheelInput, WheelMode, WheelTuning, apply_wheel};
    use crate::core::{AmplitudeWindow, FrequencyScaleMode, NormalizedPointer, ViewportModel};

    fn model() -> ViewportModel {
        ViewportModel::new(0.0, 100.0, 50.0, 100, 10, AmplitudeWindow::default(), 150.0)
            .expect("viewport")
    }

    #[test]
    fn ctrl_takes_precedence_over_amplitude_modifiers() {
        let input = WheelInput::new(0.0, 1.0).with_shift().with_ctrl();
        assert_eq!(WheelMode::resolve(input), WheelMode::Zoom);
        assert_eq!(
            WheelMode::resolve(WheelInput::new(0.0, 1.0).with_alt()),
            WheelMode::Amplitude
        );
        assert_eq!(WheelMode::resolve(WheelInput::new(0.0, 1.0)), WheelMode::Pan);
    }

    #[test]
    fn amplitude_mode_moves_center_and_floors_width() {
        let mut model = model();
        let tuning = WheelTuning::default();
        apply_wheel(&mut model, WheelInput::new(-10_000.0, 10.0).with_alt(), &tuning)
            .expect("wheel");
        let amplitude = model.view().amplitude;
        assert_relative_eq!(amplitude.width(), 1.0);
        assert_relative_eq!(amplitude.center(), 1.0);
    }

    #[test]
    fn shift_swaps_amplitude_width_and_center_deltas() {
        let mut model = model();
        let tuning = WheelTuning::default();
        apply_wheel(&mut model, WheelInput::new(20.0, 100.0).with_shift(), &tuning)
            .expect("wheel");
        let amplitude = model.view().amplitude;
        assert_relative_eq!(amplitude.width(), 100.0);
        assert_relative_eq!(amplitude.center(), 2.0);
    }

    #[test]
    fn zoom_in_shrinks_both_axes_about_center() {
        let mut model = model();
        apply_wheel(
            &mut model,
            WheelInput::new(0.0, -10.0).with_ctrl(),
            &WheelTuning::default(),
        )
        .expect("wheel");
        // half step = -10 * 0.01 * 100 = -10 on each side
        assert_relative_eq!(model.view().time.min, 10.0);
        assert_relative_eq!(model.view().time.max, 90.0);
        assert_relative_eq!(model.view().frequency.width(), 40.0);
        assert_relative_eq!(model.view().frequency.center(), 25.0);
    }

    #[test]
    fn zoom_with_shift_leaves_frequency_alone() {
        let mut model = model();
        apply_wheel(
            &mut model,
            WheelInput::new(0.0, -10.0).with_ctrl().with_shift(),
            &WheelTuning::default(),
        )
        .expect("wheel");
        assert_eq!(model.view().frequency, model.domain().frequency);
        assert_relative_eq!(model.view().time.width(), 80.0);
    }

    #[test]
    fn zoom_out_at_full_extent_is_a_no_op() {
        let mut model = model();
        let before = *model.view();
        apply_wheel(
            &mut model,
            WheelInput::new(0.0, 50.0).with_ctrl(),
            &WheelTuning::default(),
        )
        .expect("wheel");
        assert_eq!(*model.view(), before);
    }

    #[test]
    fn zoom_out_near_an_edge_shifts_view_back_inside() {
        let mut model = model();
        model
            .set_view_range(crate::core::Axis::Time, 0.0, 50.0)
            .expect("range");
        apply_wheel(
            &mut model,
            WheelInput::new(0.0, 20.0).with_ctrl().with_shift(),
            &WheelTuning::default(),
        )
        .expect("wheel");
        // 50 wide grows by 10 each side to [-10, 60], shifted to [0, 70]
        assert_relative_eq!(model.view().time.min, 0.0);
        assert_relative_eq!(model.view().time.max, 70.0);
    }

    #[test]
    fn pan_is_reduced_at_domain_edge() {
        let mut model = model();
        model
            .set_view_range(crate::core::Axis::Time, 40.0, 60.0)
            .expect("range");
        apply_wheel(
            &mut model,
            WheelInput::new(1_000.0, 0.0),
            &WheelTuning::default(),
        )
        .expect("wheel");
        assert_relative_eq!(model.view().time.min, 80.0);
        assert_relative_eq!(model.view().time.max, 100.0);
    }

    #[test]
    fn non_finite_delta_is_rejected_without_mutation() {
        let mut model = model();
        let before = *model.view();
        assert!(
            apply_wheel(
                &mut model,
                WheelInput::new(f64::NAN, 0.0),
                &WheelTuning::default()
            )
            .is_err()
        );
        assert_eq!(*model.view(), before);
    }

    #[test]
    fn readout_label_matches_display_format() {
        let model = model();
        let readout =
            CursorReadout::at(&model, NormalizedPointer::new(0.5, 0.5)).expect("readout");
        assert_eq!(
            readout.label(&model, FrequencyScaleMode::Linear),
            "0:00:50.00, 25.0 Hz\n0.00 dB ± 45.00 dB"
        );
    }

    #[test]
    fn cursor_state_tracks_pointer_presence() {
        let model = model();
        let mut cursor = CursorState::default();
        assert!(cursor.readout(&model).expect("readout").is_none());
        cursor
            .on_pointer_move(NormalizedPointer::new(0.0, 1.0))
            .expect("move");
        assert!(cursor.is_visible());
        cursor.on_pointer_leave();
        assert!(!cursor.is_visible());
        assert!(
            cursor
                .on_pointer_move(NormalizedPointer::new(f64::INFINITY, 0.0))
                .is_err()
        );
    }

    #[test]
    fn tuning_validation_rejects_non_positive_steps() {
        let tuning = WheelTuning {
            zoom_step_ratio: 0.0,
            ..WheelTuning::default()
        };
        assert!(tuning.validate().is_err());
        assert!(WheelTuning::default().validate().is_ok());
    }
}
