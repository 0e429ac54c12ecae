use crate::DatabaseError;
use running_core::SimulationTunables;

const STATIC_TUNABLES_JSON: &str = include_str!("../../data/tunables.json");

pub struct TunablesLoader;

impl TunablesLoader {
    pub fn load() -> Result<SimulationTunables, DatabaseError> {
        let tunables: SimulationTunables =
            serde_json::from_str(STATIC_TUNABLES_JSON).map_err(|e| DatabaseError::json("tunables.json", e))?;

        tunables.validate()?;

        Ok(tunables)
    }
}
