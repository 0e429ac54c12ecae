use crate::DatabaseError;
use serde::Deserialize;

const STATIC_RUNNERS_JSON: &str = include_str!("../../data/runners.json");

#[derive(Deserialize)]
pub struct RosterEntity {
    pub player_team: String,
    pub runners: Vec<RunnerEntity>,
    #[serde(default)]
    pub rival_teams: Vec<RivalTeamEntity>,
    pub names: NamesEntity,
}

#[derive(Deserialize)]
pub struct RunnerEntity {
    pub first_name: String,
    pub last_name: String,
    pub team: String,
    pub vo2_max: f64,
    pub strength: f64,
    pub form: f64,
    pub grit: f64,
    pub recovery: f64,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct RivalTeamEntity {
    pub name: String,
    pub size: usize,
    pub vo2_max_range: (f64, f64),
}

#[derive(Deserialize, Clone)]
pub struct NamesEntity {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
}

pub struct RunnerLoader;

impl RunnerLoader {
    pub fn load() -> Result<RosterEntity, DatabaseError> {
        Self::parse(STATIC_RUNNERS_JSON)
    }

    pub fn parse(json: &str) -> Result<RosterEntity, DatabaseError> {
        serde_json::from_str(json).map_err(|e| DatabaseError::json("runners.json", e))
    }
}
