use running_core::SimulationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("malformed {file}: {source}")]
    Json {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("save data could not be encoded: {0}")]
    Save(#[from] serde_json::Error),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DatabaseError {
    pub fn json(file: &'static str, source: serde_json::Error) -> Self {
        DatabaseError::Json { file, source }
    }
}
