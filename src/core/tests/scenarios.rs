use chrono::NaiveDate;
use running_core::{
    ActivityKind, ActivityReport, EventDispatcher, HoldPace, Interval, OpportunityChoice, Roster,
    Route, Runner, RunnerAttributes, RunnerId, RunnerStateSnapshot, FullName, Simulation,
    SimulationContext, SimulationDriver, SimulationError, SimulationEvent, SimulationListener,
    SimulationSnapshot, StatKind, StepStatus, Workout, WorkoutEffect, WorkoutGroup, WorkoutSession,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn runner(id: u32, team: &str, vo2_max: f64) -> Runner {
    Runner::builder()
        .id(RunnerId(id))
        .full_name(FullName::new(format!("Runner{}", id), "Scenario".to_string()))
        .team_name(team.to_string())
        .attributes(RunnerAttributes::with_vo2_max(vo2_max))
        .build()
        .unwrap()
}

fn roster(runners: Vec<Runner>) -> Roster {
    let mut roster = Roster::new(date());
    for runner in runners {
        roster.add(runner).unwrap();
    }
    roster
}

fn track_workout(repeats: u32, length: f64, rest_seconds: f64) -> Workout {
    Workout {
        name: "repeats".to_string(),
        intervals: vec![Interval {
            repeats,
            length,
            rest_seconds,
        }],
        effects: vec![WorkoutEffect {
            stat: StatKind::Strength,
            amount: 1.0,
        }],
    }
}

#[test]
fn single_runner_five_mile_run_finishes_with_documented_experience() {
    let route = Route::straight("five", 5.0, 0.0).unwrap();
    let kind = ActivityKind::Run {
        target_vdot_percent: 0.9,
    };
    let mut simulation =
        Simulation::new(kind, route, vec![runner(1, "Harriers", 55.0)], SimulationContext::new(date(), 42)).unwrap();

    let report = SimulationDriver::run_headless(&mut simulation).unwrap();

    assert_eq!(report.updates.len(), 1);
    let record = report.update(RunnerId(1)).unwrap();

    assert_eq!(record.distance, 5.0);
    assert!(record.time_in_seconds > 0.0);
    assert!(record.run_vdot > 0.0);

    let intensity = record.run_vdot / 55.0;
    let expected = (record.time_in_seconds / 60.0 * intensity * intensity * 1.0 * 1.0).round() as u32;
    assert_eq!(record.experience_change, expected);
    assert_eq!(record.ending_experience + levels_spent(record.level_ups.len()), expected);

    let runners = simulation.into_runners();
    assert_eq!(runners[0].history.items().len(), 1);
}

#[test]
fn lone_runner_settles_near_target_effort() {
    let vo2_max = 55.0;
    let target = 0.75;
    let tunables = running_core::ControllerTunables::default();
    let route = Route::straight("flat", 5.0, 0.0).unwrap();
    let kind = ActivityKind::Run {
        target_vdot_percent: target,
    };
    let mut simulation =
        Simulation::new(kind, route, vec![runner(1, "Harriers", vo2_max)], SimulationContext::new(date(), 2024))
            .unwrap();

    // last tick of every 30 s macro-step: (distance, effort spent, desired effort)
    let mut macro_steps: Vec<(f64, f64, f64)> = Vec::new();
    let mut bucket = None;

    loop {
        let step = simulation.advance().unwrap();

        for event in &step.events {
            if let SimulationEvent::Tick(snapshot) = event {
                let runner = &snapshot.runners[0];
                let sample = (
                    runner.total_distance,
                    runner.latest_vdot / vo2_max,
                    runner.desired_vdot / vo2_max,
                );
                let current = ((snapshot.elapsed_seconds - 1e-9) / 30.0).floor() as i64;

                if bucket == Some(current) {
                    if let Some(last) = macro_steps.last_mut() {
                        *last = sample;
                    }
                } else {
                    macro_steps.push(sample);
                    bucket = Some(current);
                }
            }
        }

        if step.status == StepStatus::Finished {
            break;
        }
    }

    let second_half: Vec<f64> = macro_steps
        .iter()
        .filter(|(distance, _, _)| *distance >= 2.5)
        .map(|(_, effort, _)| *effort)
        .collect();
    assert!(second_half.len() > 5);

    let mean = second_half.iter().sum::<f64>() / second_half.len() as f64;
    assert!((mean - target).abs() <= 0.1, "mean effort {:.3}", mean);

    let pinned = |effort: f64| {
        (effort - tunables.min_effort).abs() < 1e-9 || (effort - tunables.max_effort).abs() < 1e-9
    };
    for pair in macro_steps.windows(2) {
        assert!(
            !(pinned(pair[0].2) && pinned(pair[1].2)),
            "desired effort stuck at a bound: {:.3}, {:.3}",
            pair[0].2,
            pair[1].2
        );
    }
}

/// Experience consumed by `levels` level-ups from level 1 with the
/// default table.
fn levels_spent(levels: usize) -> u32 {
    [40, 60, 90, 135, 200, 300].iter().take(levels).sum()
}

#[test]
fn race_pauses_for_one_choice_at_the_marker() {
    let route = Route::straight("race", 5.0, 0.0).unwrap().with_markers(vec![3.0]).unwrap();
    let kind = ActivityKind::Race {
        target_vdot_percent: 0.9,
        player_team: "Harriers".to_string(),
    };
    let mut simulation = Simulation::new(
        kind,
        route,
        vec![runner(1, "Harriers", 52.0), runner(2, "Rivals", 54.0)],
        SimulationContext::new(date(), 7),
    )
    .unwrap();

    let mut awaiting = 0;
    let mut zone_open = false;
    let mut zone_closed = false;
    let mut leader_at_open = 0.0;
    let mut last_leader = 0.0;

    loop {
        let step = simulation.advance().unwrap();

        for event in &step.events {
            match event {
                SimulationEvent::Tick(snapshot) => {
                    last_leader = snapshot.leader().map_or(0.0, |l| l.total_distance);
                }
                SimulationEvent::OpportunityStarted { distance } => {
                    assert_eq!(*distance, 3.0);
                    zone_open = true;
                    leader_at_open = last_leader;
                }
                SimulationEvent::OpportunityEnded { distance } => {
                    assert_eq!(*distance, 3.0);
                    assert_eq!(awaiting, 1);
                    zone_closed = true;
                }
                _ => {}
            }
        }

        match step.status {
            StepStatus::AwaitingChoice(runner) => {
                assert_eq!(runner, RunnerId(1));
                awaiting += 1;

                // nothing moves until the choice is in
                let frozen = simulation.advance().unwrap();
                assert_eq!(frozen.status, StepStatus::AwaitingChoice(runner));
                assert!(frozen.events.is_empty());

                simulation.submit_choice(OpportunityChoice::new(1.05)).unwrap();
            }
            StepStatus::Running => {
                assert!(!zone_open || zone_closed, "normal speed resumed before the choice");
            }
            StepStatus::Finished => break,
            _ => {}
        }
    }

    assert_eq!(awaiting, 1);
    assert!(zone_closed);
    assert!(leader_at_open >= 2.95 - 1e-9 && leader_at_open < 3.0);

    let report = simulation.report().unwrap();
    assert_eq!(report.finish_order.len(), 2);
}

#[derive(Default)]
struct WorkoutRecorder {
    intervals: Vec<(usize, u32)>,
    rests: Vec<f64>,
    completions: usize,
    was_complete: bool,
    finished: usize,
}

impl SimulationListener for WorkoutRecorder {
    fn on_tick(&mut self, snapshot: &SimulationSnapshot) {
        let complete = snapshot.runners.iter().all(|r| r.finished);
        if complete && !self.was_complete {
            self.completions += 1;
        }
        self.was_complete = complete;
    }

    fn on_interval_started(&mut self, interval: usize, repeat: u32) {
        self.intervals.push((interval, repeat));
        self.was_complete = false;
    }

    fn on_rest_started(&mut self, seconds: f64) {
        self.rests.push(seconds);
    }

    fn on_finished(&mut self, _report: &ActivityReport) {
        self.finished += 1;
    }
}

#[test]
fn workout_runs_every_repeat_with_rest_between() {
    let route = Route::straight("track", 0.25, 0.0).unwrap();
    let kind = ActivityKind::Workout {
        workout: track_workout(4, 0.5, 120.0),
        target_vdot_percent: 0.85,
    };
    let mut simulation = Simulation::new(
        kind,
        route,
        vec![runner(1, "Harriers", 50.0), runner(2, "Harriers", 47.0)],
        SimulationContext::new(date(), 3),
    )
    .unwrap();

    let mut recorder = WorkoutRecorder::default();
    let report = {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(&mut recorder);
        SimulationDriver::run(&mut simulation, &mut dispatcher, &mut HoldPace).unwrap()
    };

    assert_eq!(recorder.intervals, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    assert_eq!(recorder.rests, vec![120.0, 120.0, 120.0]);
    assert_eq!(recorder.completions, 4);
    assert_eq!(recorder.finished, 1);

    for record in report.updates.values() {
        assert!((record.distance - 2.0).abs() < 1e-9);
    }

    let slowest = report
        .updates
        .values()
        .map(|r| r.time_in_seconds)
        .fold(0.0, f64::max);
    assert!(simulation.elapsed_seconds() >= slowest + 360.0 - 1e-6);
}

#[test]
fn workout_session_keeps_groups_apart() {
    let roster = roster(vec![
        runner(1, "Harriers", 50.0),
        runner(2, "Harriers", 48.0),
        runner(3, "Harriers", 60.0),
    ]);
    let route = Route::straight("track", 0.25, 0.0).unwrap();
    let workout = track_workout(2, 0.25, 30.0);
    let groups = vec![
        WorkoutGroup::new(vec![RunnerId(1), RunnerId(2)], 0.8),
        WorkoutGroup::new(vec![RunnerId(3)], 0.9),
    ];

    let mut session =
        WorkoutSession::new(&workout, &route, &groups, &roster, SimulationContext::new(date(), 11)).unwrap();

    let mut frames = [0usize; 2];
    while let Some((group, _)) = session.advance().unwrap() {
        frames[group] += 1;
    }

    assert!(session.is_finished());
    assert!(frames.iter().all(|&f| f > 0));
    assert_eq!(session.reports().len(), 2);

    let runners = session.into_runners();
    assert_eq!(runners.len(), 3);
}

#[test]
fn workout_session_parallel_matches_round_robin() {
    let roster = roster(vec![runner(1, "Harriers", 50.0), runner(2, "Harriers", 58.0)]);
    let route = Route::straight("track", 0.25, 0.01).unwrap();
    let workout = track_workout(3, 0.25, 45.0);
    let groups = vec![
        WorkoutGroup::new(vec![RunnerId(1)], 0.8),
        WorkoutGroup::new(vec![RunnerId(2)], 0.9),
    ];
    let context = SimulationContext::new(date(), 5);

    let mut parallel = WorkoutSession::new(&workout, &route, &groups, &roster, context.clone()).unwrap();
    let parallel_reports = parallel.run_parallel().unwrap();

    let mut sequential = WorkoutSession::new(&workout, &route, &groups, &roster, context).unwrap();
    while sequential.advance().unwrap().is_some() {}

    let sequential_reports: Vec<ActivityReport> = sequential.reports().into_iter().cloned().collect();
    assert_eq!(parallel_reports, sequential_reports);
}

#[test]
fn workout_session_rejects_runner_in_two_groups() {
    let roster = roster(vec![runner(1, "Harriers", 50.0)]);
    let route = Route::straight("track", 0.25, 0.0).unwrap();
    let groups = vec![
        WorkoutGroup::new(vec![RunnerId(1)], 0.8),
        WorkoutGroup::new(vec![RunnerId(1)], 0.9),
    ];

    let result = WorkoutSession::new(
        &track_workout(1, 0.25, 0.0),
        &route,
        &groups,
        &roster,
        SimulationContext::new(date(), 1),
    );

    assert!(matches!(result, Err(SimulationError::DuplicateRunner(RunnerId(1)))));
}

#[test]
fn zero_length_route_is_rejected_before_simulating() {
    assert!(matches!(
        Route::straight("nowhere", 0.0, 0.0),
        Err(SimulationError::Configuration(_))
    ));
}

#[test]
fn driver_consults_chooser_for_each_player_runner() {
    let route = Route::straight("race", 4.0, 0.0).unwrap().with_markers(vec![1.0, 2.5]).unwrap();
    let kind = ActivityKind::Race {
        target_vdot_percent: 0.9,
        player_team: "Harriers".to_string(),
    };
    let mut simulation = Simulation::new(
        kind,
        route,
        vec![
            runner(1, "Harriers", 50.0),
            runner(2, "Harriers", 51.0),
            runner(3, "Rivals", 53.0),
        ],
        SimulationContext::new(date(), 19),
    )
    .unwrap();

    let mut asked: Vec<RunnerId> = Vec::new();
    let mut chooser = |runner: RunnerId, _state: &RunnerStateSnapshot| {
        asked.push(runner);
        OpportunityChoice::hold()
    };

    let report = SimulationDriver::run(&mut simulation, &mut EventDispatcher::new(), &mut chooser).unwrap();

    // two markers, two player runners each
    assert_eq!(asked.len(), 4);
    assert_eq!(report.updates.len(), 3);
}

#[test]
fn same_seed_same_report() {
    let race = |seed: u64| {
        let route = Route::straight("race", 2.0, 0.0).unwrap().with_markers(vec![1.0]).unwrap();
        let kind = ActivityKind::Race {
            target_vdot_percent: 0.92,
            player_team: "Harriers".to_string(),
        };
        let mut simulation = Simulation::new(
            kind,
            route,
            vec![runner(1, "Harriers", 50.0), runner(2, "Rivals", 50.0)],
            SimulationContext::new(date(), seed),
        )
        .unwrap();

        SimulationDriver::run_headless(&mut simulation).unwrap()
    };

    assert_eq!(race(77), race(77));
}
