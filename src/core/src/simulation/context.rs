use crate::config::SimulationTunables;
use crate::simulation::CancellationToken;
use chrono::NaiveDate;

/// Inputs shared by every activity the game day runs.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub date: NaiveDate,
    pub seed: u64,
    pub tunables: SimulationTunables,
    pub cancellation: CancellationToken,
}

impl SimulationContext {
    pub fn new(date: NaiveDate, seed: u64) -> Self {
        SimulationContext {
            date,
            seed,
            tunables: SimulationTunables::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_tunables(mut self, tunables: SimulationTunables) -> Self {
        self.tunables = tunables;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Same context with a different seed, for sibling simulations.
    pub fn reseeded(&self, seed: u64) -> Self {
        SimulationContext {
            seed,
            ..self.clone()
        }
    }
}
