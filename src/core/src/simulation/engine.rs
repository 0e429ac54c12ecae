use crate::config::ActivityTiming;
use crate::error::{SimulationError, SimulationResult};
use crate::physiology::PaceConverter;
use crate::route::Route;
use crate::runner::{ActivitySummary, Roster, Runner, RunnerId, RunnerUpdateRecord, WorkoutGoal};
use crate::simulation::{
    ActivityKind, ActivityReport, ActivityType, IntervalProgress, OpportunityChoice,
    OpportunityState, OpportunityZones, PackGravity, RunStepper, RunnerState, RunnerStateSnapshot,
    SimulationContext, SimulationEvent, SimulationSnapshot, StepContext, StepResult, StepStatus,
    VdotController,
};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    MacroStep,
    SubStep { remaining: f64 },
    Resting { remaining: f64 },
    Finished,
    Cancelled,
}

/// One run, race or workout group, advanced a frame at a time by
/// `advance`. Owns copies of its runners until `into_runners`.
pub struct Simulation {
    kind: ActivityKind,
    route: Route,
    context: SimulationContext,
    timing: ActivityTiming,
    converter: PaceConverter,
    rng: ChaCha8Rng,

    runners: Vec<Runner>,
    states: BTreeMap<RunnerId, RunnerState>,

    progress: IntervalProgress,
    zones: Option<OpportunityZones>,
    phase: Phase,
    started: bool,
    elapsed_seconds: f64,
    report: Option<ActivityReport>,
}

impl Simulation {
    pub fn new(
        kind: ActivityKind,
        route: Route,
        runners: Vec<Runner>,
        context: SimulationContext,
    ) -> SimulationResult<Self> {
        let tunables = &context.tunables;

        tunables.validate()?;
        kind.validate(&route, &tunables.controller)?;

        if runners.is_empty() {
            return Err(SimulationError::configuration(format!(
                "{} on '{}' has no runners",
                kind.activity_type(),
                route.name
            )));
        }

        for runner in &runners {
            runner.attributes.validate().map_err(|e| {
                SimulationError::configuration(format!("runner {} ({}): {}", runner.full_name, runner.id, e))
            })?;
        }

        let mut seen = BTreeSet::new();
        if let Some(duplicate) = runners.iter().find(|r| !seen.insert(r.id)) {
            return Err(SimulationError::DuplicateRunner(duplicate.id));
        }

        let converter = PaceConverter::new(tunables.grade_curve.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(context.seed);
        let start_grade = route.grade_at(0.0, tunables.grade_window);

        let mut states = BTreeMap::new();
        for runner in &runners {
            let desired_vdot = kind.seed_vdot(runner, &route, &tunables.controller, &mut rng)?;
            let economy = runner.economy(0.0, 0.0, &tunables.fuel);
            let desired_speed = converter.vdot_to_speed(desired_vdot * economy, start_grade)?;

            states.insert(runner.id, RunnerState::new(desired_vdot, desired_speed, economy));
        }

        let zones = match &kind {
            ActivityKind::Race { .. } => Some(OpportunityZones::new(
                route.markers().to_vec(),
                tunables.opportunity.lead_miles,
            )),
            _ => None,
        };

        Ok(Simulation {
            timing: tunables.timing(kind.activity_type()),
            progress: IntervalProgress::new(kind.intervals(&route)),
            kind,
            route,
            converter,
            rng,
            runners,
            states,
            zones,
            phase: Phase::MacroStep,
            started: false,
            elapsed_seconds: 0.0,
            report: None,
            context,
        })
    }

    /// Builds a simulation for roster runners; every id must be on the
    /// roster exactly once.
    pub fn from_roster(
        kind: ActivityKind,
        route: Route,
        roster: &Roster,
        runners: &[RunnerId],
        context: SimulationContext,
    ) -> SimulationResult<Self> {
        let participants = roster.participants(runners)?;
        Self::new(kind, route, participants, context)
    }

    pub fn activity_type(&self) -> ActivityType {
        self.kind.activity_type()
    }

    pub fn kind(&self) -> &ActivityKind {
        &self.kind
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn runners(&self) -> &[Runner] {
        &self.runners
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn report(&self) -> Option<&ActivityReport> {
        self.report.as_ref()
    }

    pub fn opportunity_state(&self) -> Option<OpportunityState> {
        self.zones.as_ref().map(|z| z.state())
    }

    pub fn awaiting_choice(&self) -> Option<RunnerId> {
        match self.opportunity_state() {
            Some(OpportunityState::AwaitingChoice(runner)) => Some(runner),
            _ => None,
        }
    }

    /// Gives the runners back, updated once the activity has finished.
    pub fn into_runners(self) -> Vec<Runner> {
        self.runners
    }

    pub fn runner_snapshot(&self, runner: RunnerId) -> Option<RunnerStateSnapshot> {
        let interval_length = self.progress.current().length;

        self.states
            .get(&runner)
            .map(|state| state.snapshot(runner, interval_length))
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let interval_length = self.progress.current().length;
        let (interval, repeat) = self.progress.position();

        SimulationSnapshot {
            activity: self.kind.activity_type(),
            elapsed_seconds: self.elapsed_seconds,
            interval,
            repeat,
            opportunity: self.opportunity_state(),
            runners: self
                .runners
                .iter()
                .filter_map(|r| {
                    self.states
                        .get(&r.id)
                        .map(|state| state.snapshot(r.id, interval_length))
                })
                .collect(),
        }
    }

    /// Runs one frame: a macro-step prelude plus a stepper tick, a plain
    /// tick, a rest frame, or nothing while a choice is pending.
    pub fn advance(&mut self) -> SimulationResult<StepResult> {
        match self.phase {
            Phase::Finished => return Err(SimulationError::AlreadyFinished),
            Phase::Cancelled => return Ok(StepResult::idle(StepStatus::Cancelled)),
            _ => {}
        }

        if self.context.cancellation.is_cancelled() {
            info!("{} on '{}' cancelled", self.kind.activity_type(), self.route.name);
            self.phase = Phase::Cancelled;
            return Ok(StepResult::idle(StepStatus::Cancelled));
        }

        if let Some(runner) = self.awaiting_choice() {
            return Ok(StepResult::idle(StepStatus::AwaitingChoice(runner)));
        }

        let mut events = Vec::new();

        if !self.started {
            self.start(&mut events);
        }

        if let Some(distance) = self.zones.as_mut().and_then(|z| z.close()) {
            info!("opportunity at {:.2} mi complete", distance);
            events.push(SimulationEvent::OpportunityEnded { distance });
        }

        match self.phase {
            Phase::Resting { remaining } => self.rest_frame(remaining, events),
            Phase::SubStep { remaining } => self.tick_frame(remaining, events),
            _ => {
                self.macro_step()?;
                self.tick_frame(self.timing.macro_step_seconds, events)
            }
        }
    }

    /// Applies the player's choice to the runner in the zone.
    pub fn submit_choice(&mut self, choice: OpportunityChoice) -> SimulationResult<()> {
        match self.phase {
            Phase::Finished => return Err(SimulationError::AlreadyFinished),
            Phase::Cancelled => return Err(SimulationError::Cancelled),
            _ => {}
        }

        choice.validate()?;

        let zones = self.zones.as_mut().ok_or(SimulationError::NotAwaitingChoice)?;
        let runner = zones.resolve()?;

        let grade = self.grade_for_total(self.states.get(&runner).map_or(0.0, |s| s.total_distance));
        let economy = self
            .runners
            .iter()
            .find(|r| r.id == runner)
            .zip(self.states.get(&runner))
            .map(|(r, s)| r.economy(s.hydration_cost, s.calorie_cost, &self.context.tunables.fuel))
            .ok_or(SimulationError::UnknownRunner(runner))?;

        if let Some(state) = self.states.get_mut(&runner) {
            state.desired_vdot *= choice.ease;
            state.desired_speed = self.converter.vdot_to_speed(state.desired_vdot * economy, grade)?;
            state.current_speed = state.desired_speed;

            info!(
                "runner {} takes opportunity choice x{:.2}, desired vdot {:.2}",
                runner, choice.ease, state.desired_vdot
            );
        }

        Ok(())
    }

    fn start(&mut self, events: &mut Vec<SimulationEvent>) {
        self.started = true;

        info!(
            "{} started on '{}' ({:.2} mi) with {} runners",
            self.kind.activity_type(),
            self.route.name,
            self.progress.total_length(),
            self.runners.len()
        );

        if let ActivityKind::Workout { .. } = self.kind {
            let (interval, repeat) = self.progress.position();
            events.push(SimulationEvent::IntervalStarted { interval, repeat });
        }
    }

    /// Controller then gravity for every unfinished runner.
    fn macro_step(&mut self) -> SimulationResult<()> {
        let tunables = &self.context.tunables;
        let target = self.kind.target_vdot_percent();
        let interval_length = self.progress.current().length;
        let lapping = matches!(self.kind, ActivityKind::Workout { .. });

        for runner in &self.runners {
            let state = match self.states.get_mut(&runner.id) {
                Some(state) if !state.is_finished(interval_length) => state,
                _ => continue,
            };

            state.desired_vdot = VdotController::step(
                state,
                &runner.attributes,
                target,
                &tunables.controller,
                &mut self.rng,
            )?;

            let economy = runner.economy(state.hydration_cost, state.calorie_cost, &tunables.fuel);
            let grade = if lapping {
                self.route.grade_at_lap(state.total_distance, tunables.grade_window)
            } else {
                self.route.grade_at(state.total_distance, tunables.grade_window)
            };

            state.desired_speed = self.converter.vdot_to_speed(state.desired_vdot * economy, grade)?;
            state.current_speed = state.desired_speed;
        }

        PackGravity::apply(
            &mut self.states,
            interval_length,
            target,
            self.timing.gravity_iterations,
        );

        debug!(
            "macro step at {:.1}s: leader {:.3} mi",
            self.elapsed_seconds,
            self.leader_distance()
        );

        Ok(())
    }

    fn tick_frame(&mut self, remaining: f64, mut events: Vec<SimulationEvent>) -> SimulationResult<StepResult> {
        let slowed = self.zones.as_ref().is_some_and(|z| z.is_open());
        let tick = if slowed {
            self.context.tunables.opportunity.slow_tick_seconds
        } else {
            self.context.tunables.tick_seconds
        };
        let dt = tick.min(remaining);

        self.step_runners(dt);
        self.elapsed_seconds += dt;
        events.push(SimulationEvent::Tick(self.snapshot()));

        let interval_length = self.progress.current().length;
        if self.states.values().all(|s| s.is_finished(interval_length)) {
            return self.complete_repeat(events);
        }

        let remaining = remaining - dt;
        self.phase = if remaining <= TIME_EPSILON {
            Phase::MacroStep
        } else {
            Phase::SubStep { remaining }
        };

        if let Some(runner) = self.observe_zones(&mut events) {
            return Ok(StepResult::new(events, StepStatus::AwaitingChoice(runner)));
        }

        let status = if self.zones.as_ref().is_some_and(|z| z.is_open()) {
            StepStatus::Slowed
        } else {
            StepStatus::Running
        };

        Ok(StepResult::new(events, status))
    }

    fn step_runners(&mut self, dt: f64) {
        let interval = self.progress.current();
        let context = StepContext {
            route: &self.route,
            converter: &self.converter,
            tunables: &self.context.tunables,
            interval_length: interval.length,
            total_length: self.progress.total_length(),
            lapping: matches!(self.kind, ActivityKind::Workout { .. }),
        };

        for runner in &self.runners {
            if let Some(state) = self.states.get_mut(&runner.id) {
                RunStepper::step(state, &runner.attributes, &context, dt);
            }
        }
    }

    fn rest_frame(&mut self, remaining: f64, mut events: Vec<SimulationEvent>) -> SimulationResult<StepResult> {
        let dt = self.context.tunables.tick_seconds.min(remaining);
        self.elapsed_seconds += dt;

        let remaining = remaining - dt;
        if remaining > TIME_EPSILON {
            self.phase = Phase::Resting { remaining };
            return Ok(StepResult::new(events, StepStatus::Resting));
        }

        self.begin_next_repeat(&mut events);
        Ok(StepResult::new(events, StepStatus::Running))
    }

    /// Every runner has covered the current repeat: rest, move on, or finish.
    fn complete_repeat(&mut self, mut events: Vec<SimulationEvent>) -> SimulationResult<StepResult> {
        if self.progress.is_last() {
            return self.finish(events);
        }

        let rest = self.progress.current().rest_seconds;
        if rest > TIME_EPSILON {
            debug!("resting {:.0}s after repeat {:?}", rest, self.progress.position());
            events.push(SimulationEvent::RestStarted { seconds: rest });
            self.phase = Phase::Resting { remaining: rest };
            return Ok(StepResult::new(events, StepStatus::Resting));
        }

        self.begin_next_repeat(&mut events);
        Ok(StepResult::new(events, StepStatus::Running))
    }

    fn begin_next_repeat(&mut self, events: &mut Vec<SimulationEvent>) {
        let finished_length = self.progress.current().length;

        if let Some((interval, repeat)) = self.progress.advance() {
            for state in self.states.values_mut() {
                state.start_repeat(finished_length);
            }

            debug!("interval {} repeat {} started", interval, repeat);
            events.push(SimulationEvent::IntervalStarted { interval, repeat });
        }

        self.phase = Phase::MacroStep;
    }

    fn observe_zones(&mut self, events: &mut Vec<SimulationEvent>) -> Option<RunnerId> {
        let leader = self.leader_distance();
        let interval_length = self.progress.current().length;
        let states = &self.states;
        let runners = &self.runners;

        let player_team = match &self.kind {
            ActivityKind::Race { player_team, .. } => player_team.as_str(),
            _ => return None,
        };
        let zones = self.zones.as_mut()?;

        let observation = zones.observe(
            leader,
            || {
                let mut players: Vec<(RunnerId, f64)> = runners
                    .iter()
                    .filter(|r| r.team_name == player_team)
                    .filter_map(|r| states.get(&r.id).map(|s| (r.id, s)))
                    .filter(|(_, s)| !s.is_finished(interval_length))
                    .map(|(id, s)| (id, s.total_distance))
                    .collect();

                players.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
                players.into_iter().map(|(id, _)| id).collect()
            },
            |id| states.get(&id).map_or(0.0, |s| s.total_distance),
        );

        if let Some(distance) = observation.skipped {
            info!("no player runners left for the zone at {:.2} mi, skipping it", distance);
        }

        if let Some(distance) = observation.started {
            info!("opportunity zone opened at {:.2} mi", distance);
            events.push(SimulationEvent::OpportunityStarted { distance });
        }

        let runner = observation.in_zone?;
        let state = self.runner_snapshot(runner)?;

        info!("runner {} reached the opportunity zone", runner);
        events.push(SimulationEvent::RunnerInZone { runner, state });

        Some(runner)
    }

    fn finish(&mut self, mut events: Vec<SimulationEvent>) -> SimulationResult<StepResult> {
        let tunables = &self.context.tunables;
        let activity = self.kind.activity_type();
        let length = self.route.length();
        let course_grade = self.route.grade_at(length / 2.0, length);

        let mut finish_order: Vec<(RunnerId, f64)> = self
            .states
            .iter()
            .map(|(id, state)| (*id, state.time_in_seconds))
            .collect();
        finish_order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let finish_order: Vec<RunnerId> = finish_order.into_iter().map(|(id, _)| id).collect();

        let field_size = self.runners.len();
        let mut updates: BTreeMap<RunnerId, RunnerUpdateRecord> = BTreeMap::new();

        for runner in self.runners.iter_mut() {
            let state = match self.states.get(&runner.id) {
                Some(state) => state,
                None => continue,
            };

            let economy = runner.economy(state.hydration_cost, state.calorie_cost, &tunables.fuel);
            let average_speed = if state.time_in_seconds > 0.0 {
                state.total_distance / state.time_in_seconds
            } else {
                0.0
            };
            let run_vdot = (self.converter.speed_to_vdot(average_speed, course_grade) / economy).max(0.0);

            let place = match activity {
                ActivityType::Race => finish_order
                    .iter()
                    .position(|id| *id == runner.id)
                    .map(|index| (index + 1, field_size)),
                _ => None,
            };

            let summary = ActivitySummary {
                activity,
                date: self.context.date,
                run_vdot,
                distance: state.total_distance,
                time_in_seconds: state.time_in_seconds,
                hydration_cost: state.hydration_cost,
                calorie_cost: state.calorie_cost,
                place,
            };

            let record = match &self.kind {
                ActivityKind::Workout {
                    workout,
                    target_vdot_percent,
                } => {
                    let goal = WorkoutGoal {
                        goal_vdot: target_vdot_percent * runner.attributes.current_vo2_max,
                        effects: &workout.effects,
                    };
                    runner.post_workout_update(&summary, &goal, tunables)
                }
                _ => runner.post_run_update(&summary, tunables),
            };

            debug!(
                "{} finished {:.2} mi in {:.0}s, run vdot {:.2}, +{} xp",
                runner.full_name, summary.distance, summary.time_in_seconds, run_vdot, record.experience_change
            );

            updates.insert(runner.id, record);
        }

        let report = ActivityReport {
            kind: activity,
            date: self.context.date,
            updates,
            finish_order,
        };

        info!(
            "{} on '{}' finished after {:.0}s, {} level ups",
            activity,
            self.route.name,
            self.elapsed_seconds,
            report.level_ups()
        );

        self.phase = Phase::Finished;
        self.report = Some(report.clone());
        events.push(SimulationEvent::Finished(report));

        Ok(StepResult::new(events, StepStatus::Finished))
    }

    fn leader_distance(&self) -> f64 {
        self.states
            .values()
            .map(|s| s.total_distance)
            .fold(0.0, f64::max)
    }

    fn grade_for_total(&self, total_distance: f64) -> f64 {
        let window = self.context.tunables.grade_window;

        match self.kind {
            ActivityKind::Workout { .. } => self.route.grade_at_lap(total_distance, window),
            _ => self.route.grade_at(total_distance, window),
        }
    }
}
