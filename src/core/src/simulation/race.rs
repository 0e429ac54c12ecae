use crate::config::OpportunityTunables;
use crate::error::{SimulationError, SimulationResult};
use crate::runner::RunnerId;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OpportunityState {
    Normal,
    /// Zone open; the simulation ticks slowly until a player runner reaches it.
    ApproachingZone,
    AwaitingChoice(RunnerId),
    /// Every player runner has chosen; closes on the next frame.
    ZoneComplete,
}

/// Multiplier applied to the in-zone runner's desired VDOT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunityChoice {
    pub ease: f64,
}

impl OpportunityChoice {
    pub fn new(ease: f64) -> Self {
        OpportunityChoice { ease }
    }

    pub fn push(tunables: &OpportunityTunables) -> Self {
        Self::new(tunables.push_multiplier)
    }

    pub fn hold() -> Self {
        Self::new(1.0)
    }

    pub fn ease_off(tunables: &OpportunityTunables) -> Self {
        Self::new(tunables.ease_multiplier)
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if self.ease.is_finite() && self.ease > 0.0 {
            Ok(())
        } else {
            Err(SimulationError::configuration(format!(
                "opportunity ease must be positive, got {}",
                self.ease
            )))
        }
    }
}

/// What changed after looking at the field for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ZoneObservation {
    pub started: Option<f64>,
    pub skipped: Option<f64>,
    pub in_zone: Option<RunnerId>,
}

/// Walks a race's opportunity markers in order.
#[derive(Debug, Clone)]
pub struct OpportunityZones {
    markers: Vec<f64>,
    next: usize,
    lead_miles: f64,
    state: OpportunityState,
    pending: Vec<RunnerId>,
}

impl OpportunityZones {
    pub fn new(markers: Vec<f64>, lead_miles: f64) -> Self {
        OpportunityZones {
            markers,
            next: 0,
            lead_miles,
            state: OpportunityState::Normal,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> OpportunityState {
        self.state
    }

    pub fn current_marker(&self) -> Option<f64> {
        self.markers.get(self.next).copied()
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            OpportunityState::ApproachingZone | OpportunityState::AwaitingChoice(_)
        )
    }

    /// `players` lists the player-team runners still on the course, front
    /// runner first. Only consulted when a zone opens.
    pub fn observe<P, D>(&mut self, leader_distance: f64, players: P, distance_of: D) -> ZoneObservation
    where
        P: FnOnce() -> Vec<RunnerId>,
        D: Fn(RunnerId) -> f64,
    {
        let mut observation = ZoneObservation::default();

        let marker = match self.current_marker() {
            Some(marker) => marker,
            None => return observation,
        };
        let zone_start = marker - self.lead_miles;

        if self.state == OpportunityState::Normal && leader_distance >= zone_start {
            let players = players();

            if players.is_empty() {
                self.next += 1;
                observation.skipped = Some(marker);
                return observation;
            }

            debug!("opportunity zone at {:.2} mi opened for {} runners", marker, players.len());
            self.pending = players;
            self.state = OpportunityState::ApproachingZone;
            observation.started = Some(marker);
        }

        if self.state == OpportunityState::ApproachingZone {
            if let Some(&runner) = self.pending.iter().find(|&&id| distance_of(id) >= zone_start) {
                self.state = OpportunityState::AwaitingChoice(runner);
                observation.in_zone = Some(runner);
            }
        }

        observation
    }

    /// Records the choice for the runner in the zone.
    pub fn resolve(&mut self) -> SimulationResult<RunnerId> {
        let runner = match self.state {
            OpportunityState::AwaitingChoice(runner) => runner,
            _ => return Err(SimulationError::NotAwaitingChoice),
        };

        self.pending.retain(|&id| id != runner);
        self.state = if self.pending.is_empty() {
            OpportunityState::ZoneComplete
        } else {
            OpportunityState::ApproachingZone
        };

        Ok(runner)
    }

    /// Closes a completed zone and moves to the next marker.
    pub fn close(&mut self) -> Option<f64> {
        if self.state != OpportunityState::ZoneComplete {
            return None;
        }

        let marker = self.current_marker();
        self.next += 1;
        self.state = OpportunityState::Normal;
        marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(markers: Vec<f64>) -> OpportunityZones {
        OpportunityZones::new(markers, 0.05)
    }

    #[test]
    fn test_zone_opens_at_lead_distance() {
        let mut zones = zones(vec![3.0]);

        let early = zones.observe(2.9, || vec![RunnerId(1)], |_| 2.9);
        assert_eq!(early, ZoneObservation::default());
        assert_eq!(zones.state(), OpportunityState::Normal);

        let open = zones.observe(2.96, || vec![RunnerId(1)], |_| 2.96);
        assert_eq!(open.started, Some(3.0));
        assert_eq!(open.in_zone, Some(RunnerId(1)));
        assert_eq!(zones.state(), OpportunityState::AwaitingChoice(RunnerId(1)));
    }

    #[test]
    fn test_trailing_player_waits_for_own_arrival() {
        let mut zones = zones(vec![3.0]);

        // leader belongs to another team; player runner is behind
        let open = zones.observe(2.96, || vec![RunnerId(2)], |_| 2.7);
        assert_eq!(open.started, Some(3.0));
        assert_eq!(open.in_zone, None);
        assert!(zones.is_open());

        let arrived = zones.observe(3.1, || vec![RunnerId(2)], |_| 2.96);
        assert_eq!(arrived.started, None);
        assert_eq!(arrived.in_zone, Some(RunnerId(2)));
    }

    #[test]
    fn test_each_player_chooses_once_then_zone_closes() {
        let mut zones = zones(vec![3.0]);
        let players = vec![RunnerId(1), RunnerId(2)];

        zones.observe(3.0, || players.clone(), |_| 3.0);
        assert_eq!(zones.resolve().unwrap(), RunnerId(1));
        assert_eq!(zones.state(), OpportunityState::ApproachingZone);

        let next = zones.observe(3.0, Vec::new, |_| 3.0);
        assert_eq!(next.in_zone, Some(RunnerId(2)));
        assert_eq!(zones.resolve().unwrap(), RunnerId(2));
        assert_eq!(zones.state(), OpportunityState::ZoneComplete);

        assert_eq!(zones.close(), Some(3.0));
        assert_eq!(zones.state(), OpportunityState::Normal);
        assert_eq!(zones.current_marker(), None);
    }

    #[test]
    fn test_marker_skipped_without_players() {
        let mut zones = zones(vec![1.0, 2.0]);

        let observation = zones.observe(1.5, Vec::new, |_| 1.5);

        assert_eq!(observation.skipped, Some(1.0));
        assert_eq!(zones.current_marker(), Some(2.0));
        assert_eq!(zones.state(), OpportunityState::Normal);
    }

    #[test]
    fn test_resolve_without_choice_pending_fails() {
        let mut zones = zones(vec![3.0]);

        assert_eq!(zones.resolve(), Err(SimulationError::NotAwaitingChoice));
        assert_eq!(zones.close(), None);
    }

    #[test]
    fn test_choice_presets() {
        let tunables = OpportunityTunables::default();

        assert_eq!(OpportunityChoice::push(&tunables).ease, 1.05);
        assert_eq!(OpportunityChoice::hold().ease, 1.0);
        assert_eq!(OpportunityChoice::ease_off(&tunables).ease, 0.95);
        assert!(OpportunityChoice::new(0.0).validate().is_err());
    }
}
