use crate::runner::RunnerId;
use crate::simulation::{ActivityReport, RunnerStateSnapshot, SimulationSnapshot};

#[derive(Debug, Clone)]
pub enum SimulationEvent {
    Tick(SimulationSnapshot),
    IntervalStarted { interval: usize, repeat: u32 },
    RestStarted { seconds: f64 },
    OpportunityStarted { distance: f64 },
    RunnerInZone { runner: RunnerId, state: RunnerStateSnapshot },
    OpportunityEnded { distance: f64 },
    Finished(ActivityReport),
}

/// Receives simulation notifications. Implement only what you need.
pub trait SimulationListener {
    fn on_tick(&mut self, _snapshot: &SimulationSnapshot) {}

    fn on_interval_started(&mut self, _interval: usize, _repeat: u32) {}

    fn on_rest_started(&mut self, _seconds: f64) {}

    fn on_opportunity_started(&mut self, _distance: f64) {}

    fn on_runner_in_zone(&mut self, _runner: RunnerId, _state: &RunnerStateSnapshot) {}

    fn on_opportunity_ended(&mut self, _distance: f64) {}

    fn on_finished(&mut self, _report: &ActivityReport) {}
}

/// Fans events out to every subscribed listener, in subscription order.
#[derive(Default)]
pub struct EventDispatcher<'l> {
    listeners: Vec<&'l mut dyn SimulationListener>,
}

impl<'l> EventDispatcher<'l> {
    pub fn new() -> Self {
        EventDispatcher {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: &'l mut dyn SimulationListener) {
        self.listeners.push(listener);
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, events: &[SimulationEvent]) {
        for event in events {
            for listener in self.listeners.iter_mut() {
                Self::notify(&mut **listener, event);
            }
        }
    }

    fn notify(listener: &mut dyn SimulationListener, event: &SimulationEvent) {
        match event {
            SimulationEvent::Tick(snapshot) => listener.on_tick(snapshot),
            SimulationEvent::IntervalStarted { interval, repeat } => {
                listener.on_interval_started(*interval, *repeat)
            }
            SimulationEvent::RestStarted { seconds } => listener.on_rest_started(*seconds),
            SimulationEvent::OpportunityStarted { distance } => {
                listener.on_opportunity_started(*distance)
            }
            SimulationEvent::RunnerInZone { runner, state } => {
                listener.on_runner_in_zone(*runner, state)
            }
            SimulationEvent::OpportunityEnded { distance } => listener.on_opportunity_ended(*distance),
            SimulationEvent::Finished(report) => listener.on_finished(report),
        }
    }
}
