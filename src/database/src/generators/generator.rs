use crate::generators::RunnerGenerator;
use crate::loaders::RouteEntity;
use crate::{DatabaseEntity, DatabaseError};
use chrono::NaiveDate;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use running_core::{Roster, Route, SimulationTunables, Vector3, Workout};
use std::collections::BTreeMap;

/// Everything a season needs, built from the static data.
pub struct GameData {
    pub roster: Roster,
    pub player_team: String,
    pub routes: BTreeMap<String, Route>,
    pub workouts: BTreeMap<String, Workout>,
    pub tunables: SimulationTunables,
}

impl GameData {
    pub fn route(&self, name: &str) -> Result<&Route, DatabaseError> {
        self.routes
            .get(name)
            .ok_or_else(|| DatabaseError::InvalidData(format!("unknown route '{}'", name)))
    }

    pub fn workout(&self, name: &str) -> Result<&Workout, DatabaseError> {
        self.workouts
            .get(name)
            .ok_or_else(|| DatabaseError::InvalidData(format!("unknown workout '{}'", name)))
    }
}

pub struct DatabaseGenerator;

impl DatabaseGenerator {
    pub fn generate(data: &DatabaseEntity, date: NaiveDate, seed: u64) -> Result<GameData, DatabaseError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut roster = Roster::new(date);

        for entity in &data.roster.runners {
            let runner = RunnerGenerator::from_entity(roster.next_id(), entity)?;
            roster.add(runner)?;
        }

        let generator = RunnerGenerator::with_names(&data.roster.names);

        for team in &data.roster.rival_teams {
            for _ in 0..team.size {
                let runner = generator.generate(roster.next_id(), team, &mut rng)?;
                debug!("generated {} for {}", runner.full_name, team.name);
                roster.add(runner)?;
            }
        }

        let routes = data
            .routes
            .iter()
            .map(|entity| Ok((entity.name.clone(), Self::generate_route(entity)?)))
            .collect::<Result<BTreeMap<_, _>, DatabaseError>>()?;

        let workouts = data
            .workouts
            .iter()
            .map(|workout| (workout.name.clone(), workout.clone()))
            .collect();

        info!(
            "generated roster of {} runners for {}",
            roster.len(),
            data.roster.player_team
        );

        Ok(GameData {
            roster,
            player_team: data.roster.player_team.clone(),
            routes,
            workouts,
            tunables: data.tunables.clone(),
        })
    }

    fn generate_route(entity: &RouteEntity) -> Result<Route, DatabaseError> {
        let points = entity
            .points
            .iter()
            .map(|[x, y, z]| Vector3::new(*x, *y, *z))
            .collect();

        let route = Route::new(entity.name.clone(), points)?;

        Ok(route.with_markers(entity.markers.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabaseLoader;

    fn game() -> GameData {
        let data = DatabaseLoader::load().unwrap();
        DatabaseGenerator::generate(&data, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(), 1).unwrap()
    }

    #[test]
    fn test_shipped_data_generates() {
        let game = game();

        assert!(!game.roster.team(&game.player_team).is_empty());
        assert!(game.roster.len() > game.roster.team(&game.player_team).len());
        assert!(game.route("County Championship").unwrap().markers().len() == 1);
        assert!(game.workout("Mile Repeats").is_ok());
    }

    #[test]
    fn test_unknown_route_is_error() {
        assert!(matches!(game().route("Moon"), Err(DatabaseError::InvalidData(_))));
    }

    #[test]
    fn test_same_seed_same_rivals() {
        let names = |game: GameData| -> Vec<String> {
            game.roster.runners().map(|r| r.full_name.key()).collect()
        };

        assert_eq!(names(game()), names(game()));
    }
}
