use crate::error::{SimulationError, SimulationResult};
use crate::runner::{RunnerId, StatKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub repeats: u32,
    /// Miles per repeat.
    pub length: f64,
    /// Rest after each repeat, except the last repeat of the workout.
    pub rest_seconds: f64,
}

/// Stat bump granted by a workout when the runner hits its goal effort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEffect {
    pub stat: StatKind,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    pub intervals: Vec<Interval>,
    #[serde(default)]
    pub effects: Vec<WorkoutEffect>,
}

impl Workout {
    pub fn validate(&self) -> SimulationResult<()> {
        if self.intervals.is_empty() {
            return Err(SimulationError::configuration(format!(
                "workout '{}' has no intervals",
                self.name
            )));
        }

        for (index, interval) in self.intervals.iter().enumerate() {
            if !(interval.length.is_finite() && interval.length > 0.0) {
                return Err(SimulationError::configuration(format!(
                    "workout '{}' interval {} has non-positive length {}",
                    self.name, index, interval.length
                )));
            }

            if interval.repeats == 0 {
                return Err(SimulationError::configuration(format!(
                    "workout '{}' interval {} has zero repeats",
                    self.name, index
                )));
            }

            if !(interval.rest_seconds.is_finite() && interval.rest_seconds >= 0.0) {
                return Err(SimulationError::configuration(format!(
                    "workout '{}' interval {} has negative rest",
                    self.name, index
                )));
            }
        }

        Ok(())
    }

    pub fn total_repeats(&self) -> u32 {
        self.intervals.iter().map(|i| i.repeats).sum()
    }

    pub fn total_distance(&self) -> f64 {
        self.intervals.iter().map(|i| i.repeats as f64 * i.length).sum()
    }
}

/// Runners doing a workout together at one target effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutGroup {
    pub runners: Vec<RunnerId>,
    /// Target effort as a fraction of each runner's VO2max.
    pub target_vdot_percent: f64,
}

impl WorkoutGroup {
    pub fn new(runners: Vec<RunnerId>, target_vdot_percent: f64) -> Self {
        WorkoutGroup {
            runners,
            target_vdot_percent,
        }
    }
}
