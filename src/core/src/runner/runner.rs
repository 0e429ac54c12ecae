use crate::config::{FuelTunables, RecoveryTunables, SimulationTunables};
use crate::physiology::PhysiologyCosts;
use crate::route::WorkoutEffect;
use crate::runner::builder::RunnerBuilder;
use crate::runner::{
    ActivityHistory, ActivityHistoryItem, ActivitySummary, LevelUpRecord, ProgressionCalculator,
    RunnerAttributes, RunnerProgression, RunnerUpdateRecord, StatKind, StatUpRecord, MIN_GRIT,
};
use crate::shared::FullName;
use crate::utils::FloatUtils;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunnerId(pub u32);

impl Display for RunnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    pub id: RunnerId,
    pub full_name: FullName,
    pub team_name: String,

    pub attributes: RunnerAttributes,
    pub progression: RunnerProgression,
    pub history: ActivityHistory,
}

/// Goal and rewards of the workout a runner just finished.
pub struct WorkoutGoal<'w> {
    pub goal_vdot: f64,
    pub effects: &'w [WorkoutEffect],
}

impl Runner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    pub fn economy(&self, hydration_cost: f64, calorie_cost: f64, fuel: &FuelTunables) -> f64 {
        self.attributes.economy(hydration_cost, calorie_cost, fuel)
    }

    /// Folds a finished run or race into the runner and reports what changed.
    pub fn post_run_update(
        &mut self,
        summary: &ActivitySummary,
        tunables: &SimulationTunables,
    ) -> RunnerUpdateRecord {
        let starting_level = self.progression.level;
        let starting_experience = self.progression.experience;

        self.apply_activity_costs(summary, tunables);

        let experience_change = ProgressionCalculator::experience_change(
            summary,
            self.attributes.current_vo2_max,
            &tunables.progression,
        );

        let level_ups = self.add_experience(experience_change, tunables);

        if let Some((place, field_size)) = summary.place {
            self.apply_race_confidence(place, field_size, tunables);
        }

        self.history.add(ActivityHistoryItem {
            date: summary.date,
            activity: summary.activity,
            distance: summary.distance,
            time_in_seconds: summary.time_in_seconds,
            run_vdot: summary.run_vdot,
        });

        RunnerUpdateRecord {
            runner: self.id,
            activity: summary.activity,
            run_vdot: summary.run_vdot,
            distance: summary.distance,
            time_in_seconds: summary.time_in_seconds,
            place: summary.place.map(|(place, _)| place),
            starting_level,
            ending_level: self.progression.level,
            starting_experience,
            ending_experience: self.progression.experience,
            experience_change,
            level_ups,
            stat_ups: Vec::new(),
        }
    }

    /// Post-run update plus the workout's stat bumps, scaled by how close
    /// the runner got to the goal VDOT.
    pub fn post_workout_update(
        &mut self,
        summary: &ActivitySummary,
        goal: &WorkoutGoal<'_>,
        tunables: &SimulationTunables,
    ) -> RunnerUpdateRecord {
        let mut record = self.post_run_update(summary, tunables);

        let scale = ProgressionCalculator::workout_effect_scale(
            summary.run_vdot,
            goal.goal_vdot,
            &tunables.progression,
        );

        for effect in goal.effects {
            let before = self.attributes.stat(effect.stat);
            self.attributes.set_stat(effect.stat, before + effect.amount * scale);
            let after = self.attributes.stat(effect.stat);

            if after != before {
                record.stat_ups.push(StatUpRecord {
                    stat: effect.stat,
                    before,
                    after,
                });
            }
        }

        debug!(
            "workout effects for {}: scale {:.3}, {} stat ups",
            self.full_name,
            scale,
            record.stat_ups.len()
        );

        record
    }

    /// Daily recovery tick.
    pub fn on_end_day(&mut self, tunables: &SimulationTunables) {
        let capacity = tunables.fuel.glycogen_capacity_kcal;
        let tunables: &RecoveryTunables = &tunables.recovery;
        let attributes = &mut self.attributes;

        let recovery = attributes.current_recovery.max(0.0);
        let rate = recovery / (recovery + tunables.recovery_half_point)
            * FloatUtils::clamp01(attributes.sleep_status);
        let amount = (attributes.long_term_soreness * rate).max(tunables.soreness_floor_recovery);

        attributes.long_term_soreness = (attributes.long_term_soreness - amount).max(0.0);

        let refill = tunables
            .glycogen_refill_kcal
            .min(attributes.long_term_calories.max(0.0))
            .min((capacity - attributes.short_term_calories).max(0.0));
        attributes.short_term_calories += refill;
        attributes.long_term_calories -= refill;

        attributes.hydration_status =
            FloatUtils::clamp01(attributes.hydration_status + tunables.hydration_restore);
        attributes.confidence *= 1.0 - FloatUtils::clamp01(tunables.confidence_decay);
        attributes.sleep_status = 1.0;
    }

    fn apply_activity_costs(&mut self, summary: &ActivitySummary, tunables: &SimulationTunables) {
        let attributes = &mut self.attributes;

        attributes.short_term_calories = (attributes.short_term_calories - summary.calorie_cost).max(0.0);
        attributes.hydration_status = FloatUtils::clamp01(
            attributes.hydration_status - summary.hydration_cost / tunables.fuel.hydration_reserve_liters,
        );

        let soreness = PhysiologyCosts::long_term_soreness_delta(
            summary.time_in_minutes(),
            summary.run_vdot,
            attributes.current_vo2_max,
            &tunables.soreness,
        );
        attributes.long_term_soreness = (attributes.long_term_soreness + soreness).max(0.0);
    }

    /// Adds experience and levels up while the current threshold is met.
    pub fn add_experience(&mut self, amount: u32, tunables: &SimulationTunables) -> Vec<LevelUpRecord> {
        let progression = &tunables.progression;
        let mut level_ups = Vec::new();

        self.progression.experience = self.progression.experience.saturating_add(amount);

        while self.progression.level < progression.max_level {
            let threshold =
                ProgressionCalculator::experience_threshold(self.progression.level, progression);

            if self.progression.experience < threshold {
                break;
            }

            self.progression.experience -= threshold;
            self.progression.level += 1;

            let before = self.attributes.stat_line();
            let growth = ProgressionCalculator::level_growth(self.progression.level, progression);

            let attributes = &mut self.attributes;
            attributes.current_vo2_max *= growth.vo2_max;
            attributes.current_strength *= growth.strength;
            attributes.current_form *= growth.form;
            attributes.current_recovery *= growth.recovery;
            attributes.current_grit = (attributes.current_grit * growth.grit).max(MIN_GRIT);

            info!(
                "{} reached level {} (vo2max {:.2} -> {:.2})",
                self.full_name, self.progression.level, before.vo2_max, attributes.current_vo2_max
            );

            level_ups.push(LevelUpRecord {
                level: self.progression.level,
                before,
                after: self.attributes.stat_line(),
            });
        }

        level_ups
    }

    fn apply_race_confidence(&mut self, place: usize, field_size: usize, tunables: &SimulationTunables) {
        // winner +swing, last place -swing, linear in between
        let spread = field_size.saturating_sub(1).max(1) as f64;
        let standing = 1.0 - 2.0 * (place.saturating_sub(1) as f64 / spread);
        let change = if field_size <= 1 {
            0.0
        } else {
            tunables.progression.race_confidence_swing * standing
        };

        self.attributes.confidence = (self.attributes.confidence + change).clamp(-1.0, 1.0);
    }

    pub fn stat(&self, stat: StatKind) -> f64 {
        self.attributes.stat(stat)
    }
}
