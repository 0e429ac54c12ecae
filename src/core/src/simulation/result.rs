use crate::runner::{RunnerId, RunnerUpdateRecord};
use crate::simulation::{ActivityType, SimulationEvent};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a finished activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityReport {
    pub kind: ActivityType,
    pub date: NaiveDate,
    pub updates: BTreeMap<RunnerId, RunnerUpdateRecord>,
    /// Runners by time on course, fastest first.
    pub finish_order: Vec<RunnerId>,
}

impl ActivityReport {
    pub fn update(&self, runner: RunnerId) -> Option<&RunnerUpdateRecord> {
        self.updates.get(&runner)
    }

    pub fn winner(&self) -> Option<RunnerId> {
        self.finish_order.first().copied()
    }

    pub fn level_ups(&self) -> usize {
        self.updates.values().map(|u| u.level_ups.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus {
    Running,
    /// An opportunity zone is open and ticks are short.
    Slowed,
    Resting,
    AwaitingChoice(RunnerId),
    Finished,
    Cancelled,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Finished | StepStatus::Cancelled)
    }
}

/// Everything one `advance` call produced.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub events: Vec<SimulationEvent>,
    pub status: StepStatus,
}

impl StepResult {
    pub fn new(events: Vec<SimulationEvent>, status: StepStatus) -> Self {
        StepResult { events, status }
    }

    pub fn idle(status: StepStatus) -> Self {
        Self::new(Vec::new(), status)
    }
}
