use crate::error::{SimulationError, SimulationResult};
use crate::shared::{Curve, CurveKey};
use serde::{Deserialize, Serialize};

/// Every tunable constant the simulation reads. Loaded from data by the
/// database crate; `Default` mirrors the shipped `tunables.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTunables {
    pub tick_seconds: f64,
    pub grade_window: f64,
    pub grade_curve: Curve,

    pub run: ActivityTiming,
    pub race: ActivityTiming,
    pub workout: ActivityTiming,

    pub controller: ControllerTunables,
    pub soreness: SorenessTunables,
    pub fuel: FuelTunables,
    pub progression: ProgressionTunables,
    pub recovery: RecoveryTunables,
    pub opportunity: OpportunityTunables,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivityTiming {
    /// Simulated seconds covered by one macro-step.
    pub macro_step_seconds: f64,
    /// Gravity passes per macro-step.
    pub gravity_iterations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerTunables {
    pub magnitude: f64,
    pub stddev: f64,
    pub max_soreness: f64,
    pub min_effort: f64,
    pub max_effort: f64,
    pub run_seed_deviation: f64,
    pub run_difficulty_penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SorenessTunables {
    pub short_term_threshold: f64,
    pub short_term_exponent_scale: f64,
    pub long_term_threshold: f64,
    pub cubic_slope: f64,
    pub linear_slope: f64,
    pub linear_offset: f64,
    pub time_slope: f64,
    pub time_offset: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTunables {
    pub reference_intensity: f64,
    pub hydration_liters_per_minute: f64,
    pub calories_per_minute: f64,
    pub hydration_reserve_liters: f64,
    pub glycogen_wall_kcal: f64,
    pub glycogen_capacity_kcal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTunables {
    pub experience_per_minute: f64,
    pub race_experience_multiplier: f64,
    pub level_experience: Vec<u32>,
    pub level_experience_growth: f64,
    pub max_level: u32,
    pub vo2_growth: Curve,
    pub strength_growth: Curve,
    pub form_growth: Curve,
    pub recovery_growth: Curve,
    pub grit_growth: Curve,
    pub workout_effect_exponent: f64,
    pub race_confidence_swing: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryTunables {
    pub soreness_floor_recovery: f64,
    pub recovery_half_point: f64,
    pub glycogen_refill_kcal: f64,
    pub hydration_restore: f64,
    pub confidence_decay: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityTunables {
    /// Distance ahead of a marker at which the zone opens.
    pub lead_miles: f64,
    /// Tick size while the zone is open; smaller ticks mean a slower replay.
    pub slow_tick_seconds: f64,
    pub push_multiplier: f64,
    pub ease_multiplier: f64,
}

impl Default for SimulationTunables {
    fn default() -> Self {
        SimulationTunables {
            tick_seconds: 1.0,
            grade_window: 0.05,
            grade_curve: Curve::new(vec![
                CurveKey::new(-0.2, 0.72),
                CurveKey::new(-0.1, 0.85),
                CurveKey::new(0.0, 1.0),
                CurveKey::new(0.1, 1.3),
                CurveKey::new(0.2, 1.7),
            ])
            .unwrap_or_else(|_| Curve::constant(1.0)),
            run: ActivityTiming {
                macro_step_seconds: 30.0,
                gravity_iterations: 5,
            },
            race: ActivityTiming {
                macro_step_seconds: 15.0,
                gravity_iterations: 2,
            },
            workout: ActivityTiming {
                macro_step_seconds: 10.0,
                gravity_iterations: 2,
            },
            controller: ControllerTunables::default(),
            soreness: SorenessTunables::default(),
            fuel: FuelTunables::default(),
            progression: ProgressionTunables::default(),
            recovery: RecoveryTunables::default(),
            opportunity: OpportunityTunables::default(),
        }
    }
}

impl Default for ActivityTiming {
    fn default() -> Self {
        ActivityTiming {
            macro_step_seconds: 30.0,
            gravity_iterations: 2,
        }
    }
}

impl Default for ControllerTunables {
    fn default() -> Self {
        ControllerTunables {
            magnitude: 0.2,
            stddev: 0.02,
            max_soreness: 100.0,
            min_effort: 0.3,
            max_effort: 1.15,
            run_seed_deviation: 0.03,
            run_difficulty_penalty: 0.5,
        }
    }
}

impl Default for SorenessTunables {
    fn default() -> Self {
        SorenessTunables {
            short_term_threshold: 0.7,
            short_term_exponent_scale: 3.0,
            long_term_threshold: 0.8,
            cubic_slope: 2.0,
            linear_slope: 0.1,
            linear_offset: 0.5,
            time_slope: 0.05,
            time_offset: 0.0,
        }
    }
}

impl Default for FuelTunables {
    fn default() -> Self {
        FuelTunables {
            reference_intensity: 0.7,
            hydration_liters_per_minute: 0.02,
            calories_per_minute: 10.0,
            hydration_reserve_liters: 3.0,
            glycogen_wall_kcal: 500.0,
            glycogen_capacity_kcal: 2000.0,
        }
    }
}

impl Default for ProgressionTunables {
    fn default() -> Self {
        let decaying = |start: f64, end: f64| {
            Curve::new(vec![CurveKey::new(0.0, start), CurveKey::new(1.0, end)])
                .unwrap_or_else(|_| Curve::constant(end))
        };

        ProgressionTunables {
            experience_per_minute: 1.0,
            race_experience_multiplier: 1.5,
            level_experience: vec![40, 60, 90, 135, 200, 300],
            level_experience_growth: 1.5,
            max_level: 50,
            vo2_growth: decaying(0.03, 0.005),
            strength_growth: decaying(0.04, 0.01),
            form_growth: decaying(0.04, 0.01),
            recovery_growth: decaying(0.03, 0.01),
            grit_growth: decaying(0.02, 0.005),
            workout_effect_exponent: 16.0,
            race_confidence_swing: 0.1,
        }
    }
}

impl Default for RecoveryTunables {
    fn default() -> Self {
        RecoveryTunables {
            soreness_floor_recovery: 2.0,
            recovery_half_point: 100.0,
            glycogen_refill_kcal: 1500.0,
            hydration_restore: 0.5,
            confidence_decay: 0.1,
        }
    }
}

impl Default for OpportunityTunables {
    fn default() -> Self {
        OpportunityTunables {
            lead_miles: 0.05,
            slow_tick_seconds: 0.25,
            push_multiplier: 1.05,
            ease_multiplier: 0.95,
        }
    }
}

impl SimulationTunables {
    pub fn validate(&self) -> SimulationResult<()> {
        let positive = |value: f64, name: &str| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimulationError::configuration(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        };

        positive(self.tick_seconds, "tick_seconds")?;
        positive(self.grade_window, "grade_window")?;
        positive(self.opportunity.slow_tick_seconds, "opportunity.slow_tick_seconds")?;
        positive(self.controller.max_soreness, "controller.max_soreness")?;
        positive(self.fuel.reference_intensity, "fuel.reference_intensity")?;
        positive(self.fuel.hydration_reserve_liters, "fuel.hydration_reserve_liters")?;
        positive(self.fuel.glycogen_wall_kcal, "fuel.glycogen_wall_kcal")?;
        positive(self.soreness.short_term_threshold, "soreness.short_term_threshold")?;
        positive(self.soreness.long_term_threshold, "soreness.long_term_threshold")?;
        positive(
            self.recovery.recovery_half_point,
            "recovery.recovery_half_point",
        )?;

        for (name, timing) in [("run", &self.run), ("race", &self.race), ("workout", &self.workout)] {
            positive(timing.macro_step_seconds, &format!("{}.macro_step_seconds", name))?;

            if timing.gravity_iterations == 0 {
                return Err(SimulationError::configuration(format!(
                    "{}.gravity_iterations must be at least 1",
                    name
                )));
            }
        }

        self.grade_curve
            .validate()
            .map_err(|e| SimulationError::configuration(format!("grade_curve: {}", e)))?;

        if !self.grade_curve.is_non_decreasing()
            || self.grade_curve.keys().iter().any(|k| k.value <= 0.0)
        {
            return Err(SimulationError::configuration(
                "grade_curve must be positive and non-decreasing",
            ));
        }

        if self.controller.stddev < 0.0 {
            return Err(SimulationError::configuration("controller.stddev is negative"));
        }

        if !(0.0 < self.controller.min_effort && self.controller.min_effort < self.controller.max_effort) {
            return Err(SimulationError::configuration(
                "controller effort bounds must satisfy 0 < min_effort < max_effort",
            ));
        }

        let progression = &self.progression;

        if progression.level_experience.iter().any(|&xp| xp == 0)
            || progression.level_experience_growth < 1.0
        {
            return Err(SimulationError::configuration(
                "level experience thresholds must be positive and growth >= 1",
            ));
        }

        for curve in [
            &progression.vo2_growth,
            &progression.strength_growth,
            &progression.form_growth,
            &progression.recovery_growth,
            &progression.grit_growth,
        ] {
            curve
                .validate()
                .map_err(|e| SimulationError::configuration(format!("growth curve: {}", e)))?;
        }

        Ok(())
    }

    pub fn timing(&self, kind: crate::simulation::ActivityType) -> ActivityTiming {
        match kind {
            crate::simulation::ActivityType::Run => self.run,
            crate::simulation::ActivityType::Race => self.race,
            crate::simulation::ActivityType::Workout => self.workout,
        }
    }
}
