use crate::DatabaseError;
use log::{info, warn};
use running_core::{Roster, RunnerProgression, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SAVED_STATS: [(StatKind, &str); 5] = [
    (StatKind::Vo2Max, "vo2_max"),
    (StatKind::Strength, "strength"),
    (StatKind::Form, "form"),
    (StatKind::Grit, "grit"),
    (StatKind::Recovery, "recovery"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerSave {
    pub stats: BTreeMap<String, f64>,
    pub progression: RunnerProgression,
}

/// Persisted runner progress, keyed by "First Last".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunnerSaveStore {
    runners: BTreeMap<String, RunnerSave>,
}

impl RunnerSaveStore {
    pub fn save(roster: &Roster, team: &str) -> Self {
        let runners = roster
            .runners()
            .filter(|r| r.team_name == team)
            .map(|runner| {
                let stats = SAVED_STATS
                    .iter()
                    .map(|(stat, key)| (key.to_string(), runner.stat(*stat)))
                    .collect();

                (
                    runner.full_name.key(),
                    RunnerSave {
                        stats,
                        progression: runner.progression,
                    },
                )
            })
            .collect();

        RunnerSaveStore { runners }
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RunnerSave> {
        self.runners.get(key)
    }

    pub fn to_json(&self) -> Result<String, DatabaseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        serde_json::from_str(json).map_err(|e| DatabaseError::json("save", e))
    }

    /// Writes saved stats back onto matching runners. Returns how many
    /// runners were restored.
    pub fn restore(&self, roster: &mut Roster) -> usize {
        let mut restored = 0;

        for runner in roster.runners_mut() {
            let Some(save) = self.runners.get(&runner.full_name.key()) else {
                continue;
            };

            for (stat, key) in SAVED_STATS.iter() {
                match save.stats.get(*key) {
                    Some(value) if Self::usable(*stat, *value) => runner.attributes.set_stat(*stat, *value),
                    Some(value) => warn!("ignoring {} = {} for {}", key, value, runner.full_name),
                    None => {}
                }
            }

            runner.progression = save.progression;
            restored += 1;
        }

        info!("restored {} of {} saved runners", restored, self.runners.len());

        restored
    }

    fn usable(stat: StatKind, value: f64) -> bool {
        match stat {
            StatKind::Vo2Max => value.is_finite() && value > 0.0,
            _ => value.is_finite(),
        }
    }
}
