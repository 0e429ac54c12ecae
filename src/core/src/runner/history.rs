use crate::simulation::ActivityType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHistoryItem {
    pub date: NaiveDate,
    pub activity: ActivityType,
    pub distance: f64,
    pub time_in_seconds: f64,
    pub run_vdot: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityHistory {
    items: Vec<ActivityHistoryItem>,
}

impl ActivityHistory {
    pub fn new() -> Self {
        ActivityHistory { items: Vec::new() }
    }

    pub fn add(&mut self, item: ActivityHistoryItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ActivityHistoryItem] {
        &self.items
    }

    pub fn last(&self) -> Option<&ActivityHistoryItem> {
        self.items.last()
    }

    pub fn days_since_last_activity(&self, now: NaiveDate) -> Option<i64> {
        self.items
            .iter()
            .map(|item| item.date)
            .max()
            .map(|last| (now - last).num_days())
    }

    /// Miles logged in the seven days ending at `now`.
    pub fn weekly_mileage(&self, now: NaiveDate) -> f64 {
        self.items
            .iter()
            .filter(|item| {
                let age = (now - item.date).num_days();
                (0..7).contains(&age)
            })
            .map(|item| item.distance)
            .sum()
    }
}
