use crate::config::SimulationTunables;
use crate::error::{SimulationError, SimulationResult};
use crate::runner::{Runner, RunnerId};
use crate::utils::Logging;
use chrono::{Days, NaiveDate};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Arena of every runner in the game, keyed by id.
#[derive(Debug, Clone)]
pub struct Roster {
    pub date: NaiveDate,
    runners: BTreeMap<RunnerId, Runner>,
}

impl Roster {
    pub fn new(date: NaiveDate) -> Self {
        Roster {
            date,
            runners: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, runner: Runner) -> SimulationResult<()> {
        if self.runners.contains_key(&runner.id) {
            return Err(SimulationError::DuplicateRunner(runner.id));
        }

        self.runners.insert(runner.id, runner);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    pub fn contains(&self, id: RunnerId) -> bool {
        self.runners.contains_key(&id)
    }

    pub fn by_id(&self, id: RunnerId) -> Option<&Runner> {
        self.runners.get(&id)
    }

    pub fn by_id_mut(&mut self, id: RunnerId) -> Option<&mut Runner> {
        self.runners.get_mut(&id)
    }

    pub fn by_name(&self, key: &str) -> Option<&Runner> {
        self.runners.values().find(|r| r.full_name.key() == key)
    }

    pub fn runners(&self) -> impl Iterator<Item = &Runner> {
        self.runners.values()
    }

    pub fn runners_mut(&mut self) -> impl Iterator<Item = &mut Runner> {
        self.runners.values_mut()
    }

    pub fn team(&self, team_name: &str) -> Vec<RunnerId> {
        self.runners
            .values()
            .filter(|r| r.team_name == team_name)
            .map(|r| r.id)
            .collect()
    }

    pub fn next_id(&self) -> RunnerId {
        RunnerId(self.runners.keys().last().map(|id| id.0 + 1).unwrap_or(1))
    }

    /// Copies of the entered runners, in entry order. Every id must be on
    /// the roster and appear once.
    pub fn participants(&self, ids: &[RunnerId]) -> SimulationResult<Vec<Runner>> {
        if ids.is_empty() {
            return Err(SimulationError::configuration("activity has no runners"));
        }

        let mut seen = BTreeSet::new();

        ids.iter()
            .map(|&id| {
                if !seen.insert(id) {
                    return Err(SimulationError::DuplicateRunner(id));
                }

                self.runners
                    .get(&id)
                    .cloned()
                    .ok_or(SimulationError::UnknownRunner(id))
            })
            .collect()
    }

    /// Writes back runners updated by a finished activity.
    pub fn merge<I: IntoIterator<Item = Runner>>(&mut self, runners: I) -> SimulationResult<()> {
        for runner in runners {
            match self.runners.get_mut(&runner.id) {
                Some(existing) => *existing = runner,
                None => return Err(SimulationError::UnknownRunner(runner.id)),
            }
        }

        Ok(())
    }

    /// Daily recovery for every runner, then move the calendar on.
    pub fn end_day(&mut self, tunables: &SimulationTunables) {
        let message = &format!("end day: {}", self.date);

        Logging::estimate_result(
            || {
                for runner in self.runners.values_mut() {
                    runner.on_end_day(tunables);
                }
            },
            message,
        );

        if let Some(next) = self.date.checked_add_days(Days::new(1)) {
            self.date = next;
        }

        debug!("roster advanced to {}", self.date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunnerAttributes;
    use crate::shared::FullName;

    fn runner(id: u32, team: &str) -> Runner {
        Runner::builder()
            .id(RunnerId(id))
            .full_name(FullName::new(format!("Runner{}", id), "Test".to_string()))
            .team_name(team.to_string())
            .attributes(RunnerAttributes::default())
            .build()
            .unwrap()
    }

    fn roster() -> Roster {
        let mut roster = Roster::new(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
        roster.add(runner(1, "Harriers")).unwrap();
        roster.add(runner(2, "Harriers")).unwrap();
        roster.add(runner(3, "Rivals")).unwrap();
        roster
    }

    #[test]
    fn test_participants_validation() {
        let roster = roster();

        assert_eq!(roster.participants(&[RunnerId(1), RunnerId(3)]).unwrap().len(), 2);
        assert_eq!(
            roster.participants(&[RunnerId(9)]).unwrap_err(),
            SimulationError::UnknownRunner(RunnerId(9))
        );
        assert_eq!(
            roster.participants(&[RunnerId(1), RunnerId(1)]).unwrap_err(),
            SimulationError::DuplicateRunner(RunnerId(1))
        );
        assert!(matches!(
            roster.participants(&[]),
            Err(SimulationError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut roster = roster();
        assert!(roster.add(runner(2, "Other")).is_err());
        assert_eq!(roster.next_id(), RunnerId(4));
    }

    #[test]
    fn test_merge_writes_back() {
        let mut roster = roster();
        let mut copies = roster.participants(&[RunnerId(2)]).unwrap();
        copies[0].progression.experience = 17;

        roster.merge(copies).unwrap();

        assert_eq!(roster.by_id(RunnerId(2)).unwrap().progression.experience, 17);
        assert!(roster.merge(vec![runner(42, "X")]).is_err());
    }

    #[test]
    fn test_end_day_advances_calendar() {
        let mut roster = roster();
        roster.end_day(&SimulationTunables::default());

        assert_eq!(roster.date, NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
    }

    #[test]
    fn test_team_and_name_lookup() {
        let roster = roster();

        assert_eq!(roster.team("Harriers"), vec![RunnerId(1), RunnerId(2)]);
        assert_eq!(roster.by_name("Runner3 Test").unwrap().id, RunnerId(3));
    }
}
