use crate::config::ProgressionTunables;
use crate::runner::ActivitySummary;
use crate::simulation::ActivityType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerProgression {
    pub level: u32,
    pub experience: u32,
}

impl Default for RunnerProgression {
    fn default() -> Self {
        RunnerProgression {
            level: 1,
            experience: 0,
        }
    }
}

/// Multipliers applied to the trainable stats on one level-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelGrowth {
    pub vo2_max: f64,
    pub strength: f64,
    pub form: f64,
    pub recovery: f64,
    pub grit: f64,
}

pub struct ProgressionCalculator;

impl ProgressionCalculator {
    /// Experience needed to leave `level`. Levels past the table grow
    /// exponentially from its last entry.
    pub fn experience_threshold(level: u32, tunables: &ProgressionTunables) -> u32 {
        let index = level.saturating_sub(1) as usize;
        let table = &tunables.level_experience;

        if let Some(&threshold) = table.get(index) {
            return threshold.max(1);
        }

        let last = table.last().copied().unwrap_or(100) as f64;
        let steps = (index + 1 - table.len()) as i32;

        (last * tunables.level_experience_growth.powi(steps))
            .round()
            .clamp(1.0, u32::MAX as f64) as u32
    }

    /// `round(minutes · (runVDOT / VO2max)² · experience_per_minute)`, with
    /// races earning a bonus multiplier.
    pub fn experience_change(
        summary: &ActivitySummary,
        vo2_max: f64,
        tunables: &ProgressionTunables,
    ) -> u32 {
        if vo2_max <= 0.0 || summary.run_vdot <= 0.0 {
            return 0;
        }

        let intensity = summary.run_vdot / vo2_max;
        let multiplier = match summary.activity {
            ActivityType::Race => tunables.race_experience_multiplier,
            _ => 1.0,
        };

        (summary.time_in_minutes() * intensity * intensity * tunables.experience_per_minute * multiplier)
            .round()
            .max(0.0) as u32
    }

    /// Growth is keyed by the level being reached, normalised by max level.
    pub fn level_growth(level: u32, tunables: &ProgressionTunables) -> LevelGrowth {
        let normalized = if tunables.max_level == 0 {
            1.0
        } else {
            (level as f64 / tunables.max_level as f64).clamp(0.0, 1.0)
        };

        LevelGrowth {
            vo2_max: 1.0 + tunables.vo2_growth.evaluate(normalized).max(0.0),
            strength: 1.0 + tunables.strength_growth.evaluate(normalized).max(0.0),
            form: 1.0 + tunables.form_growth.evaluate(normalized).max(0.0),
            recovery: 1.0 + tunables.recovery_growth.evaluate(normalized).max(0.0),
            grit: 1.0 + tunables.grit_growth.evaluate(normalized).max(0.0) / 4.0,
        }
    }

    /// `proximity ^ exponent`, where proximity measures how close the run
    /// VDOT landed to the goal. Only efforts near the goal earn real gains.
    pub fn workout_effect_scale(run_vdot: f64, goal_vdot: f64, tunables: &ProgressionTunables) -> f64 {
        if goal_vdot <= 0.0 {
            return 0.0;
        }

        let proximity = (1.0 - (run_vdot - goal_vdot).abs() / goal_vdot).clamp(0.0, 1.0);

        proximity.powf(tunables.workout_effect_exponent)
    }
}
