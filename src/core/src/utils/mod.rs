use log::debug;
use std::time::Instant;

pub struct FloatUtils;

impl FloatUtils {
    #[inline]
    pub fn clamp01(value: f64) -> f64 {
        value.clamp(0.0, 1.0)
    }

    #[inline]
    pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
        from + (to - from) * Self::clamp01(t)
    }

    /// Position of `value` between `from` and `to`, clamped to 0..1.
    /// A degenerate range yields 0.
    #[inline]
    pub fn inverse_lerp(from: f64, to: f64, value: f64) -> f64 {
        if (to - from).abs() < f64::EPSILON {
            return 0.0;
        }

        Self::clamp01((value - from) / (to - from))
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn variance(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = Self::mean(values);

        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
    }
}

pub struct TimeEstimation;

impl TimeEstimation {
    pub fn estimate<T, F: FnOnce() -> T>(action: F) -> (T, u32) {
        let now = Instant::now();

        let result = action();

        (result, now.elapsed().as_millis() as u32)
    }
}

pub struct Logging;

impl Logging {
    pub fn estimate_result<T, F: FnOnce() -> T>(action: F, message: &str) -> T {
        let (result, estimated) = TimeEstimation::estimate(action);

        debug!("{}, {} ms", message, estimated);

        result
    }
}
