use crate::runner::{ActivityHistory, Runner, RunnerAttributes, RunnerId, RunnerProgression};
use crate::shared::FullName;

// Builder for Runner
#[derive(Default)]
pub struct RunnerBuilder {
    id: Option<RunnerId>,
    full_name: Option<FullName>,
    team_name: Option<String>,
    attributes: Option<RunnerAttributes>,
    progression: Option<RunnerProgression>,
    history: Option<ActivityHistory>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: RunnerId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn full_name(mut self, full_name: FullName) -> Self {
        self.full_name = Some(full_name);
        self
    }

    pub fn team_name(mut self, team_name: String) -> Self {
        self.team_name = Some(team_name);
        self
    }

    pub fn attributes(mut self, attributes: RunnerAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn progression(mut self, progression: RunnerProgression) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn history(mut self, history: ActivityHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn build(self) -> Result<Runner, String> {
        let attributes = self.attributes.ok_or("attributes is required")?;

        attributes.validate()?;

        Ok(Runner {
            id: self.id.ok_or("id is required")?,
            full_name: self.full_name.ok_or("full_name is required")?,
            team_name: self.team_name.unwrap_or_default(),
            attributes,
            progression: self.progression.unwrap_or_default(),
            history: self.history.unwrap_or_else(ActivityHistory::new),
        })
    }
}
