use crate::config::FuelTunables;
use crate::physiology::{
    ECONOMY_STAT_SCALE, FORM_ECONOMY_SPAN, FUEL_ECONOMY_SPAN, HYDRATION_ECONOMY_SPAN, MIN_ECONOMY,
    STRENGTH_ECONOMY_SPAN,
};
use crate::utils::FloatUtils;
use serde::{Deserialize, Serialize};

pub const MIN_GRIT: f64 = 1.0;

/// Physiological snapshot of a runner between activities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerAttributes {
    pub initial_vo2_max: f64,

    pub current_vo2_max: f64,
    pub current_strength: f64,
    pub current_form: f64,
    /// Exponent >= 1 applied to perceived soreness.
    pub current_grit: f64,
    pub current_recovery: f64,

    // fuel and fatigue, clamped by the update formulas
    pub short_term_calories: f64,
    pub long_term_calories: f64,
    pub hydration_status: f64,
    pub long_term_soreness: f64,
    pub sleep_status: f64,
    pub confidence: f64,
}

impl Default for RunnerAttributes {
    fn default() -> Self {
        RunnerAttributes {
            initial_vo2_max: 50.0,
            current_vo2_max: 50.0,
            current_strength: 40.0,
            current_form: 40.0,
            current_grit: MIN_GRIT,
            current_recovery: 40.0,
            short_term_calories: 2000.0,
            long_term_calories: 20000.0,
            hydration_status: 1.0,
            long_term_soreness: 0.0,
            sleep_status: 1.0,
            confidence: 0.0,
        }
    }
}

impl RunnerAttributes {
    pub fn with_vo2_max(vo2_max: f64) -> Self {
        RunnerAttributes {
            initial_vo2_max: vo2_max,
            current_vo2_max: vo2_max,
            ..Default::default()
        }
    }

    /// Fraction of oxygen cost turned into forward speed, given what the
    /// current activity has used up so far.
    pub fn economy(&self, hydration_cost: f64, calorie_cost: f64, fuel: &FuelTunables) -> f64 {
        let form_economy =
            1.0 - FORM_ECONOMY_SPAN * (-self.current_form.max(0.0) / ECONOMY_STAT_SCALE).exp();
        let strength_economy = 1.0
            - STRENGTH_ECONOMY_SPAN * (-self.current_strength.max(0.0) / ECONOMY_STAT_SCALE).exp();

        let hydration =
            FloatUtils::clamp01(self.hydration_status - hydration_cost / fuel.hydration_reserve_liters);
        let hydration_factor = 1.0 - HYDRATION_ECONOMY_SPAN * (1.0 - hydration);

        let fuel_left =
            FloatUtils::clamp01((self.short_term_calories - calorie_cost) / fuel.glycogen_wall_kcal);
        let fuel_factor = 1.0 - FUEL_ECONOMY_SPAN * (1.0 - fuel_left);

        (form_economy * strength_economy * hydration_factor * fuel_factor).clamp(MIN_ECONOMY, 1.0)
    }

    pub fn stat(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Vo2Max => self.current_vo2_max,
            StatKind::Strength => self.current_strength,
            StatKind::Form => self.current_form,
            StatKind::Grit => self.current_grit,
            StatKind::Recovery => self.current_recovery,
        }
    }

    pub fn set_stat(&mut self, stat: StatKind, value: f64) {
        match stat {
            StatKind::Vo2Max => self.current_vo2_max = value,
            StatKind::Strength => self.current_strength = value,
            StatKind::Form => self.current_form = value,
            StatKind::Grit => self.current_grit = value.max(MIN_GRIT),
            StatKind::Recovery => self.current_recovery = value,
        }
    }

    /// Stats an activity can run on: positive VO2max, grit >= 1, and
    /// finite strength, form and recovery.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.current_vo2_max.is_finite() && self.current_vo2_max > 0.0) {
            return Err(format!("current_vo2_max must be positive, got {}", self.current_vo2_max));
        }

        if !(self.current_grit >= MIN_GRIT && self.current_grit.is_finite()) {
            return Err(format!("current_grit must be >= 1, got {}", self.current_grit));
        }

        for (name, value) in [
            ("current_strength", self.current_strength),
            ("current_form", self.current_form),
            ("current_recovery", self.current_recovery),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }

        Ok(())
    }

    pub fn stat_line(&self) -> StatLine {
        StatLine {
            vo2_max: self.current_vo2_max,
            strength: self.current_strength,
            form: self.current_form,
            grit: self.current_grit,
            recovery: self.current_recovery,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Vo2Max,
    Strength,
    Form,
    Grit,
    Recovery,
}

/// The trainable stats at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatLine {
    pub vo2_max: f64,
    pub strength: f64,
    pub form: f64,
    pub grit: f64,
    pub recovery: f64,
}
