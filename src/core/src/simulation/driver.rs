use crate::error::{SimulationError, SimulationResult};
use crate::runner::RunnerId;
use crate::simulation::{
    ActivityReport, EventDispatcher, OpportunityChoice, RunnerStateSnapshot, Simulation, StepStatus,
};
use log::debug;

/// Answers opportunity-zone choices for a headless run.
pub trait ChoiceProvider {
    fn choose(&mut self, runner: RunnerId, state: &RunnerStateSnapshot) -> OpportunityChoice;
}

impl<F> ChoiceProvider for F
where
    F: FnMut(RunnerId, &RunnerStateSnapshot) -> OpportunityChoice,
{
    fn choose(&mut self, runner: RunnerId, state: &RunnerStateSnapshot) -> OpportunityChoice {
        self(runner, state)
    }
}

/// Always holds pace.
pub struct HoldPace;

impl ChoiceProvider for HoldPace {
    fn choose(&mut self, _runner: RunnerId, _state: &RunnerStateSnapshot) -> OpportunityChoice {
        OpportunityChoice::hold()
    }
}

/// Drives a simulation to the end, dispatching every frame's events.
pub struct SimulationDriver;

impl SimulationDriver {
    pub fn run(
        simulation: &mut Simulation,
        dispatcher: &mut EventDispatcher<'_>,
        chooser: &mut dyn ChoiceProvider,
    ) -> SimulationResult<ActivityReport> {
        let mut frames: u64 = 0;

        loop {
            let step = simulation.advance()?;
            frames += 1;

            dispatcher.dispatch(&step.events);

            match step.status {
                StepStatus::Finished => {
                    debug!("simulation finished after {} frames", frames);

                    return simulation
                        .report()
                        .cloned()
                        .ok_or(SimulationError::AlreadyFinished);
                }
                StepStatus::Cancelled => return Err(SimulationError::Cancelled),
                StepStatus::AwaitingChoice(runner) => {
                    let state = simulation
                        .runner_snapshot(runner)
                        .ok_or(SimulationError::UnknownRunner(runner))?;
                    let choice = chooser.choose(runner, &state);

                    simulation.submit_choice(choice)?;
                }
                StepStatus::Running | StepStatus::Slowed | StepStatus::Resting => {}
            }
        }
    }

    /// Runs without listeners, holding pace at every opportunity.
    pub fn run_headless(simulation: &mut Simulation) -> SimulationResult<ActivityReport> {
        Self::run(simulation, &mut EventDispatcher::new(), &mut HoldPace)
    }
}
