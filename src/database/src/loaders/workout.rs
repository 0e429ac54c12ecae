use crate::DatabaseError;
use running_core::Workout;

const STATIC_WORKOUTS_JSON: &str = include_str!("../../data/workouts.json");

pub struct WorkoutLoader;

impl WorkoutLoader {
    pub fn load() -> Result<Vec<Workout>, DatabaseError> {
        let workouts: Vec<Workout> =
            serde_json::from_str(STATIC_WORKOUTS_JSON).map_err(|e| DatabaseError::json("workouts.json", e))?;

        for workout in &workouts {
            workout.validate()?;
        }

        Ok(workouts)
    }
}
