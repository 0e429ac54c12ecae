use crate::runner::RunnerId;
use crate::simulation::{ActivityType, OpportunityState};
use serde::Serialize;

/// Entries averaged for the "recent" VDOT shown to listeners.
pub const RECENT_VDOT_SAMPLES: usize = 10;

/// One stepper sample. `distance_in_miles` is cumulative over the activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationIntervalData {
    pub time_in_seconds: f64,
    pub distance_in_miles: f64,
    pub vdot: f64,
    pub economy: f64,
}

/// Per-activity state of one runner. Owned by the simulation, never shared.
#[derive(Debug, Clone)]
pub struct RunnerState {
    pub intervals: Vec<SimulationIntervalData>,

    pub desired_vdot: f64,
    pub current_speed: f64,
    pub desired_speed: f64,

    pub interval_distance: f64,
    pub interval_percent_done: f64,
    /// Length of the repeats already run in earlier intervals.
    pub completed_distance: f64,
    pub total_distance: f64,
    pub total_percent_done: f64,
    pub time_in_seconds: f64,

    pub short_term_soreness: f64,
    pub hydration_cost: f64,
    pub calorie_cost: f64,
}

impl RunnerState {
    pub fn new(desired_vdot: f64, desired_speed: f64, economy: f64) -> Self {
        RunnerState {
            intervals: vec![SimulationIntervalData {
                time_in_seconds: 0.0,
                distance_in_miles: 0.0,
                vdot: desired_vdot * economy,
                economy,
            }],
            desired_vdot,
            current_speed: desired_speed,
            desired_speed,
            interval_distance: 0.0,
            interval_percent_done: 0.0,
            completed_distance: 0.0,
            total_distance: 0.0,
            total_percent_done: 0.0,
            time_in_seconds: 0.0,
            short_term_soreness: 0.0,
            hydration_cost: 0.0,
            calorie_cost: 0.0,
        }
    }

    #[inline]
    pub fn last_interval(&self) -> &SimulationIntervalData {
        // never empty: seeded with the start marker
        &self.intervals[self.intervals.len() - 1]
    }

    #[inline]
    pub fn is_finished(&self, interval_length: f64) -> bool {
        self.interval_distance >= interval_length
    }

    /// Mean VDOT over the last `RECENT_VDOT_SAMPLES` stepper samples.
    pub fn recent_vdot(&self) -> f64 {
        let samples = &self.intervals[self.intervals.len().saturating_sub(RECENT_VDOT_SAMPLES)..];

        samples.iter().map(|s| s.vdot).sum::<f64>() / samples.len() as f64
    }

    /// Moves the runner onto the next repeat, banking the distance of the
    /// one just finished.
    pub fn start_repeat(&mut self, finished_length: f64) {
        self.completed_distance += finished_length;
        self.total_distance = self.completed_distance;
        self.interval_distance = 0.0;
        self.interval_percent_done = 0.0;
    }

    pub fn snapshot(&self, runner: RunnerId, interval_length: f64) -> RunnerStateSnapshot {
        let last = self.last_interval();

        RunnerStateSnapshot {
            runner,
            desired_vdot: self.desired_vdot,
            current_speed: self.current_speed,
            desired_speed: self.desired_speed,
            interval_distance: self.interval_distance,
            interval_percent_done: self.interval_percent_done,
            total_distance: self.total_distance,
            total_percent_done: self.total_percent_done,
            time_in_seconds: self.time_in_seconds,
            latest_vdot: last.vdot,
            recent_vdot: self.recent_vdot(),
            economy: last.economy,
            short_term_soreness: self.short_term_soreness,
            hydration_cost: self.hydration_cost,
            calorie_cost: self.calorie_cost,
            finished: self.is_finished(interval_length),
        }
    }
}

/// Immutable copy of a runner's state, safe to hand to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerStateSnapshot {
    pub runner: RunnerId,
    pub desired_vdot: f64,
    pub current_speed: f64,
    pub desired_speed: f64,
    pub interval_distance: f64,
    pub interval_percent_done: f64,
    pub total_distance: f64,
    pub total_percent_done: f64,
    pub time_in_seconds: f64,
    pub latest_vdot: f64,
    pub recent_vdot: f64,
    pub economy: f64,
    pub short_term_soreness: f64,
    pub hydration_cost: f64,
    pub calorie_cost: f64,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub activity: ActivityType,
    /// Simulation clock, rest periods included.
    pub elapsed_seconds: f64,
    pub interval: usize,
    pub repeat: u32,
    pub opportunity: Option<OpportunityState>,
    pub runners: Vec<RunnerStateSnapshot>,
}

impl SimulationSnapshot {
    pub fn runner(&self, id: RunnerId) -> Option<&RunnerStateSnapshot> {
        self.runners.iter().find(|r| r.runner == id)
    }

    /// Runner furthest along the course.
    pub fn leader(&self) -> Option<&RunnerStateSnapshot> {
        self.runners
            .iter()
            .max_by(|a, b| a.total_distance.total_cmp(&b.total_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, vdot: f64) -> SimulationIntervalData {
        SimulationIntervalData {
            time_in_seconds: time,
            distance_in_miles: 0.0,
            vdot,
            economy: 0.9,
        }
    }

    #[test]
    fn test_new_state_has_start_marker() {
        let state = RunnerState::new(45.0, 0.003, 0.9);

        assert_eq!(state.intervals.len(), 1);
        assert_eq!(state.last_interval().time_in_seconds, 0.0);
        assert!((state.last_interval().vdot - 40.5).abs() < 1e-12);
        assert_eq!(state.current_speed, 0.003);
        assert!(!state.is_finished(1.0));
    }

    #[test]
    fn test_recent_vdot_uses_tail_only() {
        let mut state = RunnerState::new(10.0, 0.003, 0.9);

        for i in 1..=RECENT_VDOT_SAMPLES {
            state.intervals.push(sample(i as f64, 50.0));
        }

        assert!((state.recent_vdot() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_start_repeat_banks_distance() {
        let mut state = RunnerState::new(45.0, 0.003, 0.9);
        state.interval_distance = 0.5;
        state.interval_percent_done = 1.0;
        state.total_distance = 0.5;

        state.start_repeat(0.5);

        assert_eq!(state.completed_distance, 0.5);
        assert_eq!(state.total_distance, 0.5);
        assert_eq!(state.interval_distance, 0.0);
        assert_eq!(state.interval_percent_done, 0.0);
    }
}
