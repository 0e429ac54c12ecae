use color_eyre::eyre::{eyre, Result};
use database::{DatabaseGenerator, DatabaseLoader, GameData, RunnerSaveStore};
use env_logger::Env;
use log::{debug, info};
use running_core::utils::TimeEstimation;
use running_core::{
    ActivityKind, ActivityReport, EventDispatcher, OpportunityChoice, PaceFormatter, RunnerId,
    RunnerStateSnapshot, Simulation, SimulationContext, SimulationDriver, SimulationListener,
    WorkoutGroup, WorkoutSession,
};
use std::env;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DAILY_ROUTE: &str = "River Loop";
const RACE_ROUTE: &str = "County Championship";
const WORKOUT_ROUTE: &str = "Track";
const WORKOUT: &str = "Mile Repeats";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Run,
    Race,
    Workout,
    Day,
}

impl Mode {
    fn from_env() -> Self {
        match env::var("MODE").as_deref() {
            Ok("RUN") => Mode::Run,
            Ok("RACE") => Mode::Race,
            Ok("WORKOUT") => Mode::Workout,
            _ => Mode::Day,
        }
    }
}

/// Logs the race as it unfolds.
struct Commentary;

impl SimulationListener for Commentary {
    fn on_opportunity_started(&mut self, distance: f64) {
        info!("opportunity zone opens at mile {:.2}", distance);
    }

    fn on_opportunity_ended(&mut self, distance: f64) {
        debug!("opportunity zone at mile {:.2} closed", distance);
    }

    fn on_rest_started(&mut self, seconds: f64) {
        debug!("rest {:.0}s", seconds);
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mode = Mode::from_env();
    let seed = env::var("SEED").ok().and_then(|s| s.parse().ok()).unwrap_or(2024);

    let (database, estimated) = TimeEstimation::estimate(DatabaseLoader::load);
    info!("database loaded: {} ms", estimated);

    let start = chrono::Utc::now().date_naive();
    let mut game = DatabaseGenerator::generate(&database?, start, seed)?;

    if let Ok(path) = env::var("SAVE_PATH") {
        if let Ok(json) = std::fs::read_to_string(&path) {
            RunnerSaveStore::from_json(&json)?.restore(&mut game.roster);
        }
    }

    if matches!(mode, Mode::Run | Mode::Day) {
        daily_run(&mut game, seed)?;
    }

    if matches!(mode, Mode::Workout | Mode::Day) {
        workout(&mut game, seed.wrapping_add(1))?;
    }

    if matches!(mode, Mode::Race | Mode::Day) {
        race(&mut game, seed.wrapping_add(2))?;
    }

    game.roster.end_day(&game.tunables);

    let store = RunnerSaveStore::save(&game.roster, &game.player_team);
    match env::var("SAVE_PATH") {
        Ok(path) => {
            std::fs::write(&path, store.to_json()?)?;
            info!("saved {} runners to {}", store.len(), path);
        }
        Err(_) => debug!("{}", store.to_json()?),
    }

    Ok(())
}

fn context(game: &GameData, seed: u64) -> SimulationContext {
    SimulationContext::new(game.roster.date, seed).with_tunables(game.tunables.clone())
}

fn daily_run(game: &mut GameData, seed: u64) -> Result<()> {
    let team = game.roster.team(&game.player_team);
    let kind = ActivityKind::Run {
        target_vdot_percent: 0.75,
    };

    let mut simulation = Simulation::from_roster(
        kind,
        game.route(DAILY_ROUTE)?.clone(),
        &game.roster,
        &team,
        context(game, seed),
    )?;

    let report = SimulationDriver::run_headless(&mut simulation)?;
    summarize(game, &report);

    game.roster.merge(simulation.into_runners())?;

    Ok(())
}

fn workout(game: &mut GameData, seed: u64) -> Result<()> {
    let team = game.roster.team(&game.player_team);
    let (fast, steady) = team.split_at(team.len() / 2);

    let groups: Vec<WorkoutGroup> = [(fast, 0.95), (steady, 0.9)]
        .into_iter()
        .filter(|(runners, _)| !runners.is_empty())
        .map(|(runners, target)| WorkoutGroup::new(runners.to_vec(), target))
        .collect();

    let mut session = WorkoutSession::new(
        game.workout(WORKOUT)?,
        game.route(WORKOUT_ROUTE)?,
        &groups,
        &game.roster,
        context(game, seed),
    )?;

    for report in session.run_parallel()? {
        summarize(game, &report);
    }

    game.roster.merge(session.into_runners())?;

    Ok(())
}

fn race(game: &mut GameData, seed: u64) -> Result<()> {
    let field: Vec<RunnerId> = game.roster.runners().map(|r| r.id).collect();
    let kind = ActivityKind::Race {
        target_vdot_percent: 0.95,
        player_team: game.player_team.clone(),
    };

    let mut simulation = Simulation::from_roster(
        kind,
        game.route(RACE_ROUTE)?.clone(),
        &game.roster,
        &field,
        context(game, seed),
    )?;

    // push when the last stretch went better than the recent average
    let mut chooser = |_runner: RunnerId, state: &RunnerStateSnapshot| {
        if state.latest_vdot >= state.recent_vdot {
            OpportunityChoice::new(1.03)
        } else {
            OpportunityChoice::hold()
        }
    };

    let mut commentary = Commentary;
    let report = {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(&mut commentary);
        SimulationDriver::run(&mut simulation, &mut dispatcher, &mut chooser)?
    };

    let winner = report
        .winner()
        .and_then(|id| game.roster.by_id(id))
        .ok_or_else(|| eyre!("race finished without a winner"))?;
    info!("{} wins for {}", winner.full_name, winner.team_name);

    summarize(game, &report);
    game.roster.merge(simulation.into_runners())?;

    Ok(())
}

fn summarize(game: &GameData, report: &ActivityReport) {
    for id in &report.finish_order {
        let (Some(record), Some(runner)) = (report.update(*id), game.roster.by_id(*id)) else {
            continue;
        };

        if runner.team_name != game.player_team {
            continue;
        }

        let speed = record.distance / record.time_in_seconds;
        info!(
            "{} {}: {:.2} mi in {:.0}s ({}/mi), vdot {:.1}, +{} xp{}",
            report.kind,
            runner.full_name,
            record.distance,
            record.time_in_seconds,
            PaceFormatter::mile_pace(speed),
            record.run_vdot,
            record.experience_change,
            if record.leveled_up() {
                format!(", level {}", record.ending_level)
            } else {
                String::new()
            }
        );
    }

    info!("{}: {} level-ups", report.kind, report.level_ups());
}
