use crate::runner::RunnerId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("runner {0} is not on the roster")]
    UnknownRunner(RunnerId),

    #[error("runner {0} is entered more than once")]
    DuplicateRunner(RunnerId),

    #[error("no positive speed solves vdot {vdot:.3} at grade {grade:.3}")]
    NumericDomain { vdot: f64, grade: f64 },

    #[error("simulation is not waiting for an opportunity choice")]
    NotAwaitingChoice,

    #[error("simulation already finished")]
    AlreadyFinished,

    #[error("simulation was cancelled")]
    Cancelled,
}

impl SimulationError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        SimulationError::Configuration(message.into())
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
