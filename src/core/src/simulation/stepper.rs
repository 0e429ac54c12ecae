use crate::config::SimulationTunables;
use crate::physiology::{PaceConverter, PhysiologyCosts, SECONDS_PER_MINUTE};
use crate::route::Route;
use crate::runner::RunnerAttributes;
use crate::simulation::{RunnerState, SimulationIntervalData};

/// Everything a stepper tick reads besides the runner.
pub struct StepContext<'a> {
    pub route: &'a Route,
    pub converter: &'a PaceConverter,
    pub tunables: &'a SimulationTunables,
    pub interval_length: f64,
    /// Full activity distance, for `total_percent_done`.
    pub total_length: f64,
    /// Workouts lap the course, so grade lookups wrap.
    pub lapping: bool,
}

impl StepContext<'_> {
    pub fn grade(&self, total_distance: f64) -> f64 {
        if self.lapping {
            self.route.grade_at_lap(total_distance, self.tunables.grade_window)
        } else {
            self.route.grade_at(total_distance, self.tunables.grade_window)
        }
    }
}

pub struct RunStepper;

impl RunStepper {
    /// Advances one runner by `dt` seconds at its current speed. Finished
    /// runners are left alone.
    pub fn step(
        state: &mut RunnerState,
        attributes: &RunnerAttributes,
        context: &StepContext<'_>,
        dt: f64,
    ) {
        if state.is_finished(context.interval_length) || dt <= 0.0 {
            return;
        }

        // a runner crossing the line mid-tick is only charged up to the line
        let remaining = context.interval_length - state.interval_distance;
        let crossing = state.current_speed > 0.0 && state.current_speed * dt >= remaining;
        let dt = if crossing { remaining / state.current_speed } else { dt };

        // distance, then time, then percents, then the vdot sample
        state.interval_distance = if crossing {
            context.interval_length
        } else {
            state.interval_distance + state.current_speed * dt
        };
        state.total_distance = state.completed_distance + state.interval_distance;

        let from_minutes = state.time_in_seconds / SECONDS_PER_MINUTE;
        state.time_in_seconds += dt;
        let to_minutes = state.time_in_seconds / SECONDS_PER_MINUTE;

        state.interval_percent_done = state.interval_distance / context.interval_length;
        state.total_percent_done = (state.total_distance / context.total_length).min(1.0);

        let grade = context.grade(state.total_distance);
        let economy = attributes.economy(state.hydration_cost, state.calorie_cost, &context.tunables.fuel);

        let last = state.last_interval();
        let elapsed = state.time_in_seconds - last.time_in_seconds;
        let covered = state.total_distance - last.distance_in_miles;
        let sample_speed = if elapsed > 0.0 { covered / elapsed } else { 0.0 };

        // oxygen actually spent, economy not divided out
        let vdot = context.converter.speed_to_vdot(sample_speed, grade).max(0.0);

        state.intervals.push(SimulationIntervalData {
            time_in_seconds: state.time_in_seconds,
            distance_in_miles: state.total_distance,
            vdot,
            economy,
        });

        let vo2_max = attributes.current_vo2_max;
        let tick_minutes = to_minutes - from_minutes;

        state.short_term_soreness += PhysiologyCosts::short_term_soreness_accrual(
            from_minutes,
            to_minutes,
            vdot,
            vo2_max,
            &context.tunables.soreness,
        );
        state.hydration_cost +=
            PhysiologyCosts::hydration_cost(vdot, vo2_max, tick_minutes, &context.tunables.fuel);
        state.calorie_cost += PhysiologyCosts::calorie_cost(vdot, vo2_max, tick_minutes, &context.tunables.fuel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        route: Route,
        converter: PaceConverter,
        tunables: SimulationTunables,
    }

    impl Fixture {
        fn new(length: f64) -> Self {
            let tunables = SimulationTunables::default();
            Fixture {
                route: Route::straight("flat", length, 0.0).unwrap(),
                converter: PaceConverter::new(tunables.grade_curve.clone()),
                tunables,
            }
        }

        fn context(&self, lapping: bool) -> StepContext<'_> {
            StepContext {
                route: &self.route,
                converter: &self.converter,
                tunables: &self.tunables,
                interval_length: self.route.length(),
                total_length: self.route.length(),
                lapping,
            }
        }
    }

    #[test]
    fn test_constant_speed_conserves_distance_and_time() {
        let fixture = Fixture::new(5.0);
        let context = fixture.context(false);
        let attributes = RunnerAttributes::with_vo2_max(55.0);
        let mut state = RunnerState::new(45.0, 0.003, 0.9);

        for _ in 0..100 {
            RunStepper::step(&mut state, &attributes, &context, 1.0);
        }

        assert!((state.total_distance - 0.3).abs() < 1e-9);
        assert!((state.time_in_seconds - 100.0).abs() < 1e-9);
        assert_eq!(state.intervals.len(), 101);
        assert!((state.total_percent_done - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_distance_clamped_at_interval_end() {
        let fixture = Fixture::new(0.1);
        let context = fixture.context(false);
        let attributes = RunnerAttributes::with_vo2_max(55.0);
        let mut state = RunnerState::new(45.0, 0.003, 0.9);

        for _ in 0..100 {
            RunStepper::step(&mut state, &attributes, &context, 1.0);
        }

        assert_eq!(state.total_distance, 0.1);
        assert!(state.is_finished(0.1));
        // the last tick is cut at the line: 0.1 / 0.003 seconds, not 34
        assert!((state.time_in_seconds - 0.1 / 0.003).abs() < 1e-9);
        assert_eq!(state.interval_percent_done, 1.0);

        let last = state.last_interval();
        assert!((last.vdot - fixture.converter.speed_to_vdot(0.003, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_samples_track_speed_and_costs_accrue() {
        let fixture = Fixture::new(5.0);
        let context = fixture.context(false);
        let attributes = RunnerAttributes::with_vo2_max(55.0);
        let mut state = RunnerState::new(45.0, 0.003, 0.9);

        for _ in 0..600 {
            RunStepper::step(&mut state, &attributes, &context, 1.0);
        }

        let last = state.last_interval();
        let expected = fixture.converter.speed_to_vdot(0.003, 0.0);

        assert!((last.vdot - expected).abs() < 1e-6);
        assert!(last.economy < 1.0);
        assert!(state.hydration_cost > 0.0);
        assert!(state.calorie_cost > 0.0);
        assert!(state.short_term_soreness >= 0.0);
    }

    #[test]
    fn test_faster_runner_crossing_mid_tick_gets_faster_time() {
        let fixture = Fixture::new(0.1);
        let context = fixture.context(false);
        let attributes = RunnerAttributes::with_vo2_max(55.0);
        let mut slow = RunnerState::new(45.0, 0.00300, 0.9);
        let mut quick = RunnerState::new(45.0, 0.00301, 0.9);

        for _ in 0..40 {
            RunStepper::step(&mut slow, &attributes, &context, 1.0);
            RunStepper::step(&mut quick, &attributes, &context, 1.0);
        }

        // both cross during the 34th tick
        assert!(slow.time_in_seconds > 33.0 && slow.time_in_seconds < 34.0);
        assert!(quick.time_in_seconds < slow.time_in_seconds);
    }

    #[test]
    fn test_easy_running_still_accrues_some_soreness() {
        let fixture = Fixture::new(5.0);
        let context = fixture.context(false);
        let attributes = RunnerAttributes::with_vo2_max(60.0);
        // about half of VO2max, well under the threshold
        let speed = fixture.converter.vdot_to_speed(30.0, 0.0).unwrap();
        let mut state = RunnerState::new(30.0, speed, 1.0);

        let mut previous = 0.0;
        for _ in 0..20 {
            for _ in 0..60 {
                RunStepper::step(&mut state, &attributes, &context, 1.0);
            }
            assert!(state.short_term_soreness >= previous);
            previous = state.short_term_soreness;
        }

        assert!(state.short_term_soreness > 0.0);
        assert!(state.short_term_soreness < 1.0);
    }

    #[test]
    fn test_lapping_grade_wraps() {
        let tunables = SimulationTunables::default();
        let route = Route::straight("hill", 1.0, 0.05).unwrap();
        let converter = PaceConverter::new(tunables.grade_curve.clone());
        let context = StepContext {
            route: &route,
            converter: &converter,
            tunables: &tunables,
            interval_length: 0.5,
            total_length: 2.0,
            lapping: true,
        };

        assert!((context.grade(1.5) - 0.05).abs() < 1e-9);
    }
}
