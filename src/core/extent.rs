use serde::{Deserialize, Serialize};

use crate::core::Axis;
use crate::error::{ViewerError, ViewerResult};

/// Closed `[min, max]` interval on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Builds a range from two finite bounds, ordering them if needed.
    pub fn new(start: f64, end: f64) -> ViewerResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ViewerError::InvalidData(
                "axis range bounds must be finite".to_owned(),
            ));
        }
        Ok(Self {
            min: start.min(end),
            max: start.max(end),
        })
    }

    /// Builds a range around `center` spanning `half_width` on each side.
    pub fn centered(center: f64, half_width: f64) -> ViewerResult<Self> {
        if !half_width.is_finite() || half_width < 0.0 {
            return Err(ViewerError::InvalidData(
                "axis half width must be finite and >= 0".to_owned(),
            ));
        }
        Self::new(center - half_width, center + half_width)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(self) -> f64 {
        (self.max + self.min) / 2.0
    }

    #[must_use]
    pub fn contains_range(self, other: Self) -> bool {
        other.min >= self.min && other.max <= self.max
    }

    /// Value at `normalized` in `[0, 1]` along this range.
    #[must_use]
    pub fn lerp(self, normalized: f64) -> f64 {
        self.min + normalized * self.width()
    }

    /// Moves `self` inside `outer` without changing its width, capping the
    /// width to `outer`'s first when it does not fit.
    pub(crate) fn confine_to(&mut self, outer: Self) {
        if self.width() > outer.width() {
            *self = outer;
            return;
        }
        if self.min < outer.min {
            self.max += outer.min - self.min;
            self.min = outer.min;
        }
        if self.max > outer.max {
            self.min -= self.max - outer.max;
            self.max = outer.max;
        }
        // rounding on the shifted bound can leave it an ulp outside
        self.min = self.min.max(outer.min);
        self.max = self.max.min(outer.max);
    }
}

/// Full addressable range of one channel's current dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainExtent {
    pub time: AxisRange,
    pub frequency: AxisRange,
    pub amplitude: AxisRange,
    /// Number of time blocks (columns) in the dataset.
    pub num_t: usize,
    /// Number of frequency bins (rows) in the dataset.
    pub num_f: usize,
}

impl DomainExtent {
    #[must_use]
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::Time => self.time,
            Axis::Frequency => self.frequency,
            Axis::Amplitude => self.amplitude,
        }
    }

    #[must_use]
    pub fn width(&self, axis: Axis) -> f64 {
        self.range(axis).width()
    }

    #[must_use]
    pub fn center(&self, axis: Axis) -> f64 {
        self.range(axis).center()
    }
}

/// Currently visible sub-range of a [`DomainExtent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewExtent {
    pub time: AxisRange,
    pub frequency: AxisRange,
    pub amplitude: AxisRange,
}

impl ViewExtent {
    #[must_use]
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::Time => self.time,
            Axis::Frequency => self.frequency,
            Axis::Amplitude => self.amplitude,
        }
    }

    pub(crate) fn range_mut(&mut self, axis: Axis) -> &mut AxisRange {
        match axis {
            Axis::Time => &mut self.time,
            Axis::Frequency => &mut self.frequency,
            Axis::Amplitude => &mut self.amplitude,
        }
    }

    #[must_use]
    pub fn width(&self, axis: Axis) -> f64 {
        self.range(axis).width()
    }

    #[must_use]
    pub fn center(&self, axis: Axis) -> f64 {
        self.range(axis).center()
    }

    #[must_use]
    pub fn is_within(&self, domain: &DomainExtent) -> bool {
        [Axis::Time, Axis::Frequency, Axis::Amplitude]
            .into_iter()
            .all(|axis| domain.range(axis).contains_range(self.range(axis)))
    }
}

#[cfg(test)]
mod tests {
    use super::AxisRange;

    #[test]
    fn range_orders_bounds_and_rejects_non_finite() {
        let range = AxisRange::new(5.0, -1.0).expect("range");
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 5.0);
        assert_eq!(range.width(), 6.0);
        assert_eq!(range.center(), 2.0);

        assert!(AxisRange::new(f64::NAN, 1.0).is_err());
        assert!(AxisRange::centered(0.0, -1.0).is_err());
    }

    #[test]
    fn confine_shifts_without_changing_width() {
        let outer = AxisRange::new(0.0, 100.0).expect("outer");
        let mut inner = AxisRange::new(-10.0, 20.0).expect("inner");
        inner.confine_to(outer);
        assert_eq!(inner, AxisRange::new(0.0, 30.0).expect("expected"));

        let mut inner = AxisRange::new(90.0, 110.0).expect("inner");
        inner.confine_to(outer);
        assert_eq!(inner, AxisRange::new(80.0, 100.0).expect("expected"));
    }

    #[test]
    fn confine_caps_oversized_range_to_outer() {
        let outer = AxisRange::new(0.0, 10.0).expect("outer");
        let mut inner = AxisRange::new(-5.0, 20.0).expect("inner");
        inner.confine_to(outer);
        assert_eq!(inner, outer);
    }
}
