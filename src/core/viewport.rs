use serde::{Deserialize, Serialize};

use crate::core::{Axis, AxisRange, DomainExtent, NormalizedPointer, ViewExtent};
use crate::error::{ViewerError, ViewerResult};

/// Default displayed amplitude band, in decibel-like units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeWindow {
    pub center: f64,
    pub half_width: f64,
}

impl Default for AmplitudeWindow {
    fn default() -> Self {
        Self {
            center: 0.0,
            half_width: 45.0,
        }
    }
}

impl AmplitudeWindow {
    pub fn validate(self) -> ViewerResult<Self> {
        if !self.center.is_finite() {
            return Err(ViewerError::InvalidData(
                "amplitude window center must be finite".to_owned(),
            ));
        }
        if !self.half_width.is_finite() || self.half_width <= 0.0 {
            return Err(ViewerError::InvalidData(
                "amplitude window half width must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Scale/translate pair for one axis of the zoom transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTransform {
    pub scale: f64,
    pub translate: f64,
}

impl AxisTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: 0.0,
    };
}

/// Affine transform handed to the rendering backend.
///
/// Maps the full-domain quad (clip space `[-1, 1]` on both axes) so that the
/// visible sub-extent fills the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub time: AxisTransform,
    pub frequency: AxisTransform,
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        time: AxisTransform::IDENTITY,
        frequency: AxisTransform::IDENTITY,
    };

    /// Row-major 3x3 homogeneous matrix.
    #[must_use]
    pub fn to_matrix3(self) -> [f32; 9] {
        [
            self.time.scale as f32,
            0.0,
            self.time.translate as f32,
            0.0,
            self.frequency.scale as f32,
            self.frequency.translate as f32,
            0.0,
            0.0,
            1.0,
        ]
    }
}

/// Domain and view extents for one channel.
///
/// `domain` is replaced wholesale when a new dataset is declared. `view` is
/// mutated by interaction and is kept inside `domain` on every axis after
/// each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportModel {
    domain: DomainExtent,
    view: ViewExtent,
}

impl ViewportModel {
    /// Builds a model covering `[time_start, time_end] x [0, nyquist]`.
    ///
    /// The amplitude domain is `[-amplitude_limit, amplitude_limit]` and the
    /// visible amplitude band starts at `window`, confined to that domain.
    pub fn new(
        time_start: f64,
        time_end: f64,
        nyquist: f64,
        num_t: usize,
        num_f: usize,
        window: AmplitudeWindow,
        amplitude_limit: f64,
    ) -> ViewerResult<Self> {
        if !nyquist.is_finite() || nyquist < 0.0 {
            return Err(ViewerError::InvalidData(
                "nyquist frequency must be finite and >= 0".to_owned(),
            ));
        }
        if !amplitude_limit.is_finite() || amplitude_limit <= 0.0 {
            return Err(ViewerError::InvalidData(
                "amplitude limit must be finite and > 0".to_owned(),
            ));
        }
        let window = window.validate()?;

        let time = AxisRange::new(time_start, time_end)?;
        let frequency = AxisRange::new(0.0, nyquist)?;
        let amplitude = AxisRange::centered(0.0, amplitude_limit)?;
        let domain = DomainExtent {
            time,
            frequency,
            amplitude,
            num_t,
            num_f,
        };

        let mut view_amplitude = AxisRange::centered(window.center, window.half_width)?;
        view_amplitude.confine_to(amplitude);

        Ok(Self {
            domain,
            view: ViewExtent {
                time,
                frequency,
                amplitude: view_amplitude,
            },
        })
    }

    #[must_use]
    pub fn domain(&self) -> &DomainExtent {
        &self.domain
    }

    #[must_use]
    pub fn view(&self) -> &ViewExtent {
        &self.view
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewExtent {
        &mut self.view
    }

    /// Absolute value at `normalized` along the visible range of `axis`.
    #[must_use]
    pub fn scale_axis(&self, axis: Axis, normalized: f64) -> f64 {
        self.view.range(axis).lerp(normalized)
    }

    /// Time/frequency under a pointer; frequency grows upwards.
    pub fn position_at(&self, pointer: NormalizedPointer) -> ViewerResult<(f64, f64)> {
        let pointer = pointer.validate()?;
        Ok((
            self.scale_axis(Axis::Time, pointer.x),
            self.scale_axis(Axis::Frequency, 1.0 - pointer.y),
        ))
    }

    /// Visible amplitude band as `(min, max)`.
    #[must_use]
    pub fn amplitude_window(&self) -> (f64, f64) {
        (self.view.amplitude.min, self.view.amplitude.max)
    }

    #[must_use]
    pub fn zoom_transform(&self) -> ZoomTransform {
        ZoomTransform {
            time: self.axis_transform(Axis::Time),
            frequency: self.axis_transform(Axis::Frequency),
        }
    }

    fn axis_transform(&self, axis: Axis) -> AxisTransform {
        let domain_width = self.domain.width(axis);
        let view_width = self.view.width(axis);
        if domain_width <= 0.0 || view_width <= 0.0 {
            return AxisTransform::IDENTITY;
        }
        let zoom = domain_width / view_width;
        let pan = (self.view.center(axis) - self.domain.center(axis)) / domain_width;
        AxisTransform {
            scale: zoom,
            translate: -2.0 * pan * zoom,
        }
    }

    /// Overrides the visible range of one axis, confined to the domain.
    pub fn set_view_range(&mut self, axis: Axis, start: f64, end: f64) -> ViewerResult<()> {
        let mut range = AxisRange::new(start, end)?;
        range.confine_to(self.domain.range(axis));
        *self.view.range_mut(axis) = range;
        Ok(())
    }

    /// Restores the full time/frequency extent, keeping the amplitude band.
    pub fn reset_view(&mut self) {
        self.view.time = self.domain.time;
        self.view.frequency = self.domain.frequency;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{AmplitudeWindow, ViewportModel, ZoomTransform};
    use crate::core::{Axis, NormalizedPointer};

    fn model() -> ViewportModel {
        ViewportModel::new(0.0, 100.0, 50.0, 1000, 64, AmplitudeWindow::default(), 150.0)
            .expect("viewport")
    }

    #[test]
    fn new_model_views_full_domain_with_default_amplitude_band() {
        let model = model();
        assert_eq!(model.view().time, model.domain().time);
        assert_eq!(model.view().frequency, model.domain().frequency);
        assert_eq!(model.amplitude_window(), (-45.0, 45.0));
        assert_eq!(model.domain().num_t, 1000);
        assert_eq!(model.domain().num_f, 64);
    }

    #[test]
    fn amplitude_band_never_exceeds_limit() {
        let window = AmplitudeWindow {
            center: 0.0,
            half_width: 500.0,
        };
        let model = ViewportModel::new(0.0, 1.0, 1.0, 1, 1, window, 60.0).expect("viewport");
        assert_eq!(model.amplitude_window(), (-60.0, 60.0));
    }

    #[test]
    fn full_view_has_identity_transform() {
        assert_eq!(model().zoom_transform(), ZoomTransform::IDENTITY);
    }

    #[test]
    fn zoomed_view_transform_matches_pan_and_zoom() {
        let mut model = model();
        model.set_view_range(Axis::Time, 50.0, 100.0).expect("set range");

        let transform = model.zoom_transform();
        assert_relative_eq!(transform.time.scale, 2.0);
        // pan = (75 - 50) / 100 = 0.25, translate = -2 * 0.25 * 2
        assert_relative_eq!(transform.time.translate, -1.0);
        assert_relative_eq!(transform.frequency.scale, 1.0);
    }

    #[test]
    fn frequency_is_inverted_against_vertical_pointer() {
        let model = model();
        let (time, frequency) = model
            .position_at(NormalizedPointer::new(0.25, 0.0))
            .expect("position");
        assert_relative_eq!(time, 25.0);
        assert_relative_eq!(frequency, 50.0);

        let (_, bottom) = model
            .position_at(NormalizedPointer::new(0.0, 1.0))
            .expect("position");
        assert_relative_eq!(bottom, 0.0);
    }

    #[test]
    fn set_view_range_is_confined_to_domain() {
        let mut model = model();
        model.set_view_range(Axis::Time, 90.0, 130.0).expect("set range");
        assert_eq!(model.view().time.min, 60.0);
        assert_eq!(model.view().time.max, 100.0);
        assert!(model.view().is_within(model.domain()));
    }

    #[test]
    fn degenerate_domain_yields_identity_transform() {
        let model = ViewportModel::new(3.0, 3.0, 0.0, 0, 0, AmplitudeWindow::default(), 150.0)
            .expect("viewport");
        assert_eq!(model.zoom_transform(), ZoomTransform::IDENTITY);
    }
}
