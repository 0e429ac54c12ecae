pub mod config;
pub mod error;
pub mod physiology;
pub mod route;
pub mod runner;
pub mod simulation;

pub mod shared;
pub mod utils;

pub use config::*;
pub use error::{SimulationError, SimulationResult};

pub use physiology::{PaceConverter, PaceFormatter, PhysiologyCosts};

pub use route::{Interval, Route, Workout, WorkoutEffect, WorkoutGroup};

pub use runner::{
    ActivityHistory, ActivityHistoryItem, ActivitySummary, LevelUpRecord, ProgressionCalculator,
    Roster, Runner, RunnerAttributes, RunnerBuilder, RunnerId, RunnerProgression,
    RunnerUpdateRecord, StatKind, StatLine, StatUpRecord, WorkoutGoal,
};

pub use simulation::{
    ActivityKind, ActivityReport, ActivityType, CancellationToken, ChoiceProvider, EventDispatcher,
    HoldPace, OpportunityChoice, OpportunityState, RunnerStateSnapshot, Simulation,
    SimulationContext, SimulationDriver, SimulationEvent, SimulationListener, SimulationSnapshot,
    StepResult, StepStatus, WorkoutSession,
};

pub use shared::{Curve, CurveKey, FullName};
pub use utils::*;

pub use nalgebra::Vector3;
