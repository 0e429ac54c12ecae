use crate::DatabaseError;
use serde::Deserialize;

const STATIC_ROUTES_JSON: &str = include_str!("../../data/routes.json");

#[derive(Deserialize)]
pub struct RouteEntity {
    pub name: String,
    /// `[x, y, elevation]` in miles.
    pub points: Vec<[f64; 3]>,
    #[serde(default)]
    pub markers: Vec<f64>,
}

pub struct RouteLoader;

impl RouteLoader {
    pub fn load() -> Result<Vec<RouteEntity>, DatabaseError> {
        serde_json::from_str(STATIC_ROUTES_JSON).map_err(|e| DatabaseError::json("routes.json", e))
    }
}
