use crate::runner::{RunnerId, StatKind, StatLine};
use crate::simulation::ActivityType;
use chrono::NaiveDate;
use serde::Serialize;

/// What one runner did during an activity, handed to the post-activity
/// update formulas.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    pub activity: ActivityType,
    pub date: NaiveDate,
    pub run_vdot: f64,
    pub distance: f64,
    pub time_in_seconds: f64,
    pub hydration_cost: f64,
    pub calorie_cost: f64,
    /// 1-based finishing place and field size, races only.
    pub place: Option<(usize, usize)>,
}

impl ActivitySummary {
    pub fn time_in_minutes(&self) -> f64 {
        self.time_in_seconds / 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelUpRecord {
    pub level: u32,
    pub before: StatLine,
    pub after: StatLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatUpRecord {
    pub stat: StatKind,
    pub before: f64,
    pub after: f64,
}

/// Everything that changed for one runner, for presentation layers to
/// animate. Built once at the end of an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerUpdateRecord {
    pub runner: RunnerId,
    pub activity: ActivityType,
    pub run_vdot: f64,
    pub distance: f64,
    pub time_in_seconds: f64,
    pub place: Option<usize>,

    pub starting_level: u32,
    pub ending_level: u32,
    pub starting_experience: u32,
    pub ending_experience: u32,
    pub experience_change: u32,

    pub level_ups: Vec<LevelUpRecord>,
    pub stat_ups: Vec<StatUpRecord>,
}

impl RunnerUpdateRecord {
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}
