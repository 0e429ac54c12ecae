use crate::error::{SimulationError, SimulationResult};
use crate::route::{Route, Workout, WorkoutGroup};
use crate::runner::{Roster, Runner, RunnerId};
use crate::simulation::{
    ActivityKind, ActivityReport, Simulation, SimulationContext, SimulationDriver, StepResult,
};
use crate::utils::Logging;
use log::info;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Several workout groups on the same workout. Each group is its own
/// simulation with its own runners, so groups never share state.
pub struct WorkoutSession {
    simulations: Vec<Simulation>,
    cursor: usize,
}

impl WorkoutSession {
    pub fn new(
        workout: &Workout,
        route: &Route,
        groups: &[WorkoutGroup],
        roster: &Roster,
        context: SimulationContext,
    ) -> SimulationResult<Self> {
        if groups.is_empty() {
            return Err(SimulationError::configuration(format!(
                "workout '{}' has no groups",
                workout.name
            )));
        }

        let mut seen: BTreeSet<RunnerId> = BTreeSet::new();
        for id in groups.iter().flat_map(|g| g.runners.iter()) {
            if !seen.insert(*id) {
                return Err(SimulationError::DuplicateRunner(*id));
            }
        }

        info!(
            "workout '{}': {} groups, {} repeats over {:.2} mi",
            workout.name,
            groups.len(),
            workout.total_repeats(),
            workout.total_distance()
        );

        let simulations = groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let kind = ActivityKind::Workout {
                    workout: workout.clone(),
                    target_vdot_percent: group.target_vdot_percent,
                };

                Simulation::from_roster(
                    kind,
                    route.clone(),
                    roster,
                    &group.runners,
                    context.reseeded(context.seed.wrapping_add(index as u64)),
                )
            })
            .collect::<SimulationResult<Vec<_>>>()?;

        Ok(WorkoutSession {
            simulations,
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.simulations.iter().all(|s| s.is_finished())
    }

    pub fn simulations(&self) -> &[Simulation] {
        &self.simulations
    }

    /// Advances the next unfinished group by one frame, round-robin.
    /// Returns the group index with its frame, or `None` once all are done.
    pub fn advance(&mut self) -> SimulationResult<Option<(usize, StepResult)>> {
        let count = self.simulations.len();

        for offset in 0..count {
            let index = (self.cursor + offset) % count;

            if self.simulations[index].is_finished() {
                continue;
            }

            self.cursor = (index + 1) % count;
            let step = self.simulations[index].advance()?;

            return Ok(Some((index, step)));
        }

        Ok(None)
    }

    /// Drives every group to the end on the rayon pool.
    pub fn run_parallel(&mut self) -> SimulationResult<Vec<ActivityReport>> {
        let groups = self.simulations.len();

        Logging::estimate_result(
            || {
                self.simulations
                    .par_iter_mut()
                    .map(|simulation| match simulation.report() {
                        Some(report) => Ok(report.clone()),
                        None => SimulationDriver::run_headless(simulation),
                    })
                    .collect::<SimulationResult<Vec<_>>>()
            },
            &format!("workout session: {} groups", groups),
        )
    }

    pub fn reports(&self) -> Vec<&ActivityReport> {
        self.simulations.iter().filter_map(|s| s.report()).collect()
    }

    /// Every group's runners, ready for `Roster::merge`.
    pub fn into_runners(self) -> Vec<Runner> {
        info!("workout session closed with {} groups", self.simulations.len());

        self.simulations
            .into_iter()
            .flat_map(|s| s.into_runners())
            .collect()
    }
}
