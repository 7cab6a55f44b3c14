//! Fundamental types for indexing features against video frames.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Video frame rate used to map frame indices to time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTiming {
    fps: f64,
}

impl FrameTiming {
    pub fn new(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "frame rate must be positive and finite, got {}",
                fps
            )));
        }
        Ok(Self { fps })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Time of a frame in seconds
    pub fn frame_to_seconds(&self, frame: usize) -> f64 {
        frame as f64 / self.fps
    }

    /// Frame displayed at `seconds`; `None` before the start of the video
    pub fn seconds_to_frame(&self, seconds: f64) -> Option<usize> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        Some((seconds * self.fps).floor() as usize)
    }

    /// Duration covered by `n_frames` frames
    pub fn duration_secs(&self, n_frames: usize) -> f64 {
        self.frame_to_seconds(n_frames)
    }

    /// Timestamps (seconds) for frames `0..n_frames`
    pub fn timestamps(&self, n_frames: usize) -> Vec<f64> {
        (0..n_frames).map(|f| self.frame_to_seconds(f)).collect()
    }
}

/// Named per-frame feature, the unit handed to feature stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl FeatureSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Frames whose value is undefined
    pub fn nan_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// `(seconds, value)` pairs for plotting or export
    pub fn with_time(&self, timing: &FrameTiming) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(frame, &v)| (timing.frame_to_seconds(frame), v))
            .collect()
    }
}

impl From<(String, ndarray::Array1<f64>)> for FeatureSeries {
    fn from((name, values): (String, ndarray::Array1<f64>)) -> Self {
        Self::new(name, values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timing() {
        let timing = FrameTiming::new(60.0).unwrap();
        assert!((timing.frame_to_seconds(30) - 0.5).abs() < 1e-12);
        assert_eq!(timing.seconds_to_frame(0.5), Some(30));
        assert_eq!(timing.seconds_to_frame(-1.0), None);
        assert_eq!(timing.timestamps(3), vec![0.0, 1.0 / 60.0, 2.0 / 60.0]);
    }

    #[test]
    fn test_invalid_fps() {
        assert!(FrameTiming::new(0.0).is_err());
        assert!(FrameTiming::new(f64::NAN).is_err());
        assert!(FrameTiming::new(-30.0).is_err());
    }

    #[test]
    fn test_feature_series() {
        let series = FeatureSeries::new("pupil_area", vec![1.0, f64::NAN, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.nan_count(), 1);

        let timing = FrameTiming::new(2.0).unwrap();
        let timed = series.with_time(&timing);
        assert_eq!(timed[2], (1.0, 3.0));
    }
}
