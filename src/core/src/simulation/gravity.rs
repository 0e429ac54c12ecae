use crate::runner::RunnerId;
use crate::simulation::RunnerState;
use crate::utils::FloatUtils;
use std::collections::BTreeMap;

const CLOSE_DENOMINATOR: f64 = 0.001;
const CLOSE_WEIGHT: f64 = 1_000_000.0;

/// Pack cohesion: pulls each unfinished runner's speed toward a weighted
/// average of the others, weighting close runners heavily.
pub struct PackGravity;

impl PackGravity {
    /// Runs `iterations` passes. Each pass reads the speeds from before the
    /// pass, so runner order never matters.
    pub fn apply(
        states: &mut BTreeMap<RunnerId, RunnerState>,
        interval_length: f64,
        target_vdot_percent: f64,
        iterations: u32,
    ) {
        for _ in 0..iterations {
            Self::pass(states, interval_length, target_vdot_percent);
        }
    }

    fn pass(
        states: &mut BTreeMap<RunnerId, RunnerState>,
        interval_length: f64,
        target_vdot_percent: f64,
    ) {
        let pack: Vec<(RunnerId, f64, f64)> = states
            .iter()
            .filter(|(_, state)| !state.is_finished(interval_length))
            .map(|(id, state)| (*id, state.current_speed, state.interval_distance))
            .collect();

        let pull = 1.0 - 0.75 * target_vdot_percent;

        let updated: Vec<(RunnerId, f64)> = pack
            .iter()
            .filter_map(|&(id, speed, distance)| {
                let (weighted, total) = pack
                    .iter()
                    .filter(|(other, _, _)| *other != id)
                    .fold((0.0, 0.0), |(weighted, total), &(_, other_speed, other_distance)| {
                        let weight = Self::weight(speed - other_speed, distance - other_distance);
                        (weighted + other_speed * weight, total + weight)
                    });

                if total <= 0.0 {
                    return None;
                }

                Some((id, FloatUtils::lerp(speed, weighted / total, pull)))
            })
            .collect();

        for (id, speed) in updated {
            if let Some(state) = states.get_mut(&id) {
                state.current_speed = speed;
            }
        }
    }

    #[inline]
    fn weight(speed_gap: f64, distance_gap: f64) -> f64 {
        let denominator = (speed_gap.abs() + distance_gap.abs()).powi(2);

        if denominator < CLOSE_DENOMINATOR {
            CLOSE_WEIGHT
        } else {
            1.0 / denominator
        }
    }
}
