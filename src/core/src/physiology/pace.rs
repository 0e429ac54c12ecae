use crate::error::{SimulationError, SimulationResult};
use crate::physiology::constants::{METERS_PER_MILE, SECONDS_PER_MINUTE, VDOT_A, VDOT_B, VDOT_C};
use crate::shared::Curve;

/// Converts between running speed (miles per second) and oxygen cost
/// (VDOT, mL/kg/min), adjusted by the course grade.
#[derive(Debug, Clone)]
pub struct PaceConverter {
    grade_curve: Curve,
}

impl PaceConverter {
    pub fn new(grade_curve: Curve) -> Self {
        PaceConverter { grade_curve }
    }

    /// Effort multiplier for a grade. Flat is 1.0, uphill above, downhill below.
    #[inline]
    pub fn grade_factor(&self, grade: f64) -> f64 {
        self.grade_curve.evaluate(grade)
    }

    pub fn speed_to_vdot(&self, speed: f64, grade: f64) -> f64 {
        let v = speed * self.grade_factor(grade) * METERS_PER_MILE * SECONDS_PER_MINUTE;

        VDOT_A * v * v + VDOT_B * v + VDOT_C
    }

    pub fn vdot_to_speed(&self, vdot: f64, grade: f64) -> SimulationResult<f64> {
        let c = VDOT_C - vdot;
        let discriminant = VDOT_B * VDOT_B - 4.0 * VDOT_A * c;

        if !discriminant.is_finite() || discriminant < 0.0 {
            return Err(SimulationError::NumericDomain { vdot, grade });
        }

        let meters_per_minute = (-VDOT_B + discriminant.sqrt()) / (2.0 * VDOT_A);

        // below the model's zero-speed cost there is no forward solution
        if meters_per_minute < 0.0 {
            return Err(SimulationError::NumericDomain { vdot, grade });
        }

        Ok(meters_per_minute / METERS_PER_MILE / SECONDS_PER_MINUTE / self.grade_factor(grade))
    }
}

pub struct PaceFormatter;

impl PaceFormatter {
    /// "m:ss" per mile. Non-positive speeds have no pace.
    pub fn mile_pace(speed: f64) -> String {
        if !speed.is_finite() || speed <= 0.0 {
            return String::from("--:--");
        }

        let total_seconds = (1.0 / speed).round() as u64;

        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}
