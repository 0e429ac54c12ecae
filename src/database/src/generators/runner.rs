use crate::loaders::{NamesEntity, RivalTeamEntity, RunnerEntity};
use crate::DatabaseError;
use rand::seq::SliceRandom;
use rand::Rng;
use running_core::{FullName, Runner, RunnerAttributes, RunnerId, RunnerProgression, StatKind};

const STRENGTH_RANGE: (f64, f64) = (30.0, 60.0);
const FORM_RANGE: (f64, f64) = (30.0, 60.0);
const GRIT_RANGE: (f64, f64) = (1.0, 2.0);
const RECOVERY_RANGE: (f64, f64) = (30.0, 60.0);

pub struct RunnerGenerator {
    names: NamesEntity,
}

impl RunnerGenerator {
    pub fn with_names(names: &NamesEntity) -> Self {
        RunnerGenerator { names: names.clone() }
    }

    /// Builds a runner exactly as listed in the data file.
    pub fn from_entity(id: RunnerId, entity: &RunnerEntity) -> Result<Runner, DatabaseError> {
        if entity.vo2_max <= 0.0 || !entity.vo2_max.is_finite() {
            return Err(DatabaseError::InvalidData(format!(
                "{} {} has vo2_max {}",
                entity.first_name, entity.last_name, entity.vo2_max
            )));
        }

        let mut attributes = RunnerAttributes::with_vo2_max(entity.vo2_max);
        attributes.set_stat(StatKind::Strength, entity.strength);
        attributes.set_stat(StatKind::Form, entity.form);
        attributes.set_stat(StatKind::Grit, entity.grit);
        attributes.set_stat(StatKind::Recovery, entity.recovery);

        Runner::builder()
            .id(id)
            .full_name(FullName::new(entity.first_name.clone(), entity.last_name.clone()))
            .team_name(entity.team.clone())
            .attributes(attributes)
            .progression(RunnerProgression {
                level: entity.level.max(1),
                experience: 0,
            })
            .build()
            .map_err(DatabaseError::InvalidData)
    }

    /// A random rival for `team`, with VO2max drawn from its range.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        id: RunnerId,
        team: &RivalTeamEntity,
        rng: &mut R,
    ) -> Result<Runner, DatabaseError> {
        let (min_vo2, max_vo2) = team.vo2_max_range;
        if !(min_vo2 > 0.0 && min_vo2 <= max_vo2) {
            return Err(DatabaseError::InvalidData(format!(
                "team '{}' has vo2_max range [{}, {}]",
                team.name, min_vo2, max_vo2
            )));
        }

        let mut attributes = RunnerAttributes::with_vo2_max(rng.gen_range(min_vo2..=max_vo2));
        attributes.set_stat(StatKind::Strength, rng.gen_range(STRENGTH_RANGE.0..=STRENGTH_RANGE.1));
        attributes.set_stat(StatKind::Form, rng.gen_range(FORM_RANGE.0..=FORM_RANGE.1));
        attributes.set_stat(StatKind::Grit, rng.gen_range(GRIT_RANGE.0..=GRIT_RANGE.1));
        attributes.set_stat(StatKind::Recovery, rng.gen_range(RECOVERY_RANGE.0..=RECOVERY_RANGE.1));

        Runner::builder()
            .id(id)
            .full_name(FullName::new(self.first_name(rng), self.last_name(rng)))
            .team_name(team.name.clone())
            .attributes(attributes)
            .build()
            .map_err(DatabaseError::InvalidData)
    }

    fn first_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.names
            .first_names
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "Runner".to_string())
    }

    fn last_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.names
            .last_names
            .choose(rng)
            .cloned()
            .unwrap_or_default()
    }
}
