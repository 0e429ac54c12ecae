use crate::config::ControllerTunables;
use crate::error::{SimulationError, SimulationResult};
use crate::route::{Interval, Route, Workout};
use crate::runner::Runner;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Run,
    Race,
    Workout,
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ActivityType::Run => write!(f, "run"),
            ActivityType::Race => write!(f, "race"),
            ActivityType::Workout => write!(f, "workout"),
        }
    }
}

/// What the simulation is running, with the parameters only that variant
/// needs. Target effort is always a fraction of each runner's VO2max.
#[derive(Debug, Clone)]
pub enum ActivityKind {
    Run {
        target_vdot_percent: f64,
    },
    Race {
        target_vdot_percent: f64,
        /// Team whose runners get a choice at each opportunity marker.
        player_team: String,
    },
    Workout {
        workout: Workout,
        target_vdot_percent: f64,
    },
}

impl ActivityKind {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            ActivityKind::Run { .. } => ActivityType::Run,
            ActivityKind::Race { .. } => ActivityType::Race,
            ActivityKind::Workout { .. } => ActivityType::Workout,
        }
    }

    pub fn target_vdot_percent(&self) -> f64 {
        match self {
            ActivityKind::Run {
                target_vdot_percent,
            }
            | ActivityKind::Race {
                target_vdot_percent,
                ..
            }
            | ActivityKind::Workout {
                target_vdot_percent,
                ..
            } => *target_vdot_percent,
        }
    }

    /// Runs and races are one interval the length of the course.
    pub fn intervals(&self, route: &Route) -> Vec<Interval> {
        match self {
            ActivityKind::Workout { workout, .. } => workout.intervals.clone(),
            _ => vec![Interval {
                repeats: 1,
                length: route.length(),
                rest_seconds: 0.0,
            }],
        }
    }

    pub fn validate(&self, route: &Route, controller: &ControllerTunables) -> SimulationResult<()> {
        let target = self.target_vdot_percent();

        if !(target.is_finite() && target > 0.0 && target <= controller.max_effort) {
            return Err(SimulationError::configuration(format!(
                "target vdot percent {} must be in (0, {}]",
                target, controller.max_effort
            )));
        }

        if route.length() <= 0.0 {
            return Err(SimulationError::configuration(format!(
                "route '{}' has zero length",
                route.name
            )));
        }

        match self {
            ActivityKind::Workout { workout, .. } => workout.validate(),
            ActivityKind::Race { player_team, .. }
                if player_team.is_empty() && !route.markers().is_empty() =>
            {
                Err(SimulationError::configuration(format!(
                    "race on '{}' has opportunity markers but no player team",
                    route.name
                )))
            }
            _ => Ok(()),
        }
    }

    /// Starting desired VDOT. Runs add a Gaussian offset pulled down by
    /// course difficulty and narrowing as the runner levels up; races and
    /// workouts start straight on target.
    pub fn seed_vdot<R: Rng + ?Sized>(
        &self,
        runner: &Runner,
        route: &Route,
        controller: &ControllerTunables,
        rng: &mut R,
    ) -> SimulationResult<f64> {
        let vo2_max = runner.attributes.current_vo2_max;
        let target = self.target_vdot_percent();

        let percent = match self {
            ActivityKind::Run { .. } => {
                let level = runner.progression.level.max(1) as f64;
                let offset = Normal::new(
                    -route.difficulty() * controller.run_difficulty_penalty,
                    controller.run_seed_deviation / level.sqrt(),
                )
                .map_err(|e| SimulationError::configuration(format!("run seed: {}", e)))?;

                target + offset.sample(rng)
            }
            _ => target,
        };

        Ok(vo2_max * percent.clamp(controller.min_effort, controller.max_effort))
    }
}
