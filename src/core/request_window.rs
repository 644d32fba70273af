use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};

/// Time window a user asks the compute service for, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestWindow {
    pub start: f64,
    pub end: f64,
}

impl RequestWindow {
    pub fn new(start: f64, end: f64) -> ViewerResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ViewerError::InvalidData(
                "request window bounds must be finite".to_owned(),
            ));
        }
        if start > end {
            return Err(ViewerError::InvalidData(
                "request window start must be <= end".to_owned(),
            ));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end - self.start
    }

    /// Steps the window forward by one interval.
    ///
    /// A window already one interval long slides; any other window is
    /// resized to one interval from its start.
    pub fn advance(self, interval: f64) -> ViewerResult<Self> {
        let interval = validate_interval(interval)?;
        if self.length() == interval {
            return Ok(Self {
                start: self.start + interval,
                end: self.end + interval,
            });
        }
        Ok(Self {
            start: self.start,
            end: self.start + interval,
        })
    }

    /// Steps the window backwards by one interval, never before zero.
    pub fn retreat(self, interval: f64) -> ViewerResult<Self> {
        let interval = validate_interval(interval)?;
        if self.length() == interval {
            return Ok(Self {
                start: (self.start - interval).max(0.0),
                end: (self.end - interval).max(interval),
            });
        }
        Ok(Self {
            start: (self.start - interval).max(0.0),
            end: self.end,
        })
    }
}

fn validate_interval(interval: f64) -> ViewerResult<f64> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(ViewerError::InvalidData(
            "request interval must be finite and > 0".to_owned(),
        ));
    }
    Ok(interval)
}
