use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f64,
    pub value: f64,
}

impl CurveKey {
    pub const fn new(time: f64, value: f64) -> Self {
        CurveKey { time, value }
    }
}

/// Piecewise-linear lookup curve.
///
/// Keys are sorted by `time`; evaluation outside the key range holds the
/// first/last value. Tunable curves (grade adjustment, level growth) are
/// loaded from data rather than hardcoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    pub fn new(keys: Vec<CurveKey>) -> Result<Self, String> {
        let curve = Curve { keys };
        curve.validate()?;
        Ok(curve)
    }

    pub fn constant(value: f64) -> Self {
        Curve {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.keys.is_empty() {
            return Err("curve has no keys".to_string());
        }

        if self
            .keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err("curve contains non-finite keys".to_string());
        }

        if self.keys.iter().tuple_windows().any(|(a, b)| a.time >= b.time) {
            return Err("curve key times must be strictly increasing".to_string());
        }

        Ok(())
    }

    /// True when values never decrease as time grows.
    pub fn is_non_decreasing(&self) -> bool {
        self.keys
            .iter()
            .tuple_windows()
            .all(|(a, b)| b.value >= a.value)
    }

    pub fn evaluate(&self, time: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }

        if time >= last.time {
            return last.value;
        }

        self.keys
            .iter()
            .tuple_windows()
            .find(|(a, b)| time >= a.time && time <= b.time)
            .map(|(a, b)| {
                let t = (time - a.time) / (b.time - a.time);
                a.value + (b.value - a.value) * t
            })
            .unwrap_or(last.value)
    }
}
