mod error;
mod generators;
mod loaders;
mod save;

pub use error::*;
pub use generators::*;
pub use loaders::*;
pub use save::*;

use log::info;
use running_core::SimulationTunables;
use running_core::utils::Logging;
use running_core::Workout;

/// Raw static data, as shipped in `data/`.
pub struct DatabaseEntity {
    pub roster: RosterEntity,
    pub routes: Vec<RouteEntity>,
    pub workouts: Vec<Workout>,
    pub tunables: SimulationTunables,
}

pub struct DatabaseLoader;

impl DatabaseLoader {
    pub fn load() -> Result<DatabaseEntity, DatabaseError> {
        Logging::estimate_result(
            || -> Result<DatabaseEntity, DatabaseError> {
                let entity = DatabaseEntity {
                    roster: RunnerLoader::load()?,
                    routes: RouteLoader::load()?,
                    workouts: WorkoutLoader::load()?,
                    tunables: TunablesLoader::load()?,
                };

                info!(
                    "database loaded: {} runners, {} routes, {} workouts",
                    entity.roster.runners.len(),
                    entity.routes.len(),
                    entity.workouts.len()
                );

                Ok(entity)
            },
            "database loading",
        )
    }
}
