//! Sensor input: validated acceleration samples and the per-subject
//! [`MotionDetector`](motion::MotionDetector) that consumes them.

pub mod motion;

use crate::error::SampleError;

/// Number of acceleration axes (x, y, z).
pub const AXES: usize = 3;

/// One validated 3-axis acceleration reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Epoch seconds.
    pub timestamp: f64,
    /// Acceleration in g, ordered x, y, z.
    pub axes: [f64; AXES],
}

impl Sample {
    /// Validate raw sensor data.  Exactly three finite axes and a finite
    /// timestamp are required.
    pub fn new(timestamp: f64, axes: &[f64]) -> Result<Self, SampleError> {
        if !timestamp.is_finite() {
            return Err(SampleError::BadTimestamp);
        }
        let axes: [f64; AXES] = axes
            .try_into()
            .map_err(|_| SampleError::AxisCount(axes.len()))?;
        if let Some(axis) = axes.iter().position(|v| !v.is_finite()) {
            return Err(SampleError::NonFinite { axis });
        }
        Ok(Self { timestamp, axes })
    }
}
