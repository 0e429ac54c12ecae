use crate::config::ControllerTunables;
use crate::error::{SimulationError, SimulationResult};
use crate::runner::RunnerAttributes;
use crate::simulation::RunnerState;
use crate::utils::FloatUtils;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Stochastic feedback on a runner's desired VDOT: pulled toward the target
/// effort, pushed down by soreness, steadied by confidence.
pub struct VdotController;

impl VdotController {
    /// New desired VDOT for the next macro-step. Returns the current value
    /// untouched before the runner has covered any distance.
    pub fn step<R: Rng + ?Sized>(
        state: &RunnerState,
        attributes: &RunnerAttributes,
        target_vdot_percent: f64,
        tunables: &ControllerTunables,
        rng: &mut R,
    ) -> SimulationResult<f64> {
        if state.interval_distance == 0.0 {
            return Ok(state.desired_vdot);
        }

        let mean = Self::pace_change_mean(state, attributes, target_vdot_percent, tunables);

        let roll = Normal::new(mean, tunables.stddev)
            .map_err(|e| SimulationError::configuration(format!("controller roll: {}", e)))?
            .sample(rng);

        let last = state.last_interval();
        let vo2_max = attributes.current_vo2_max;
        let desired = (last.vdot + roll * vo2_max) / last.economy;

        Ok(desired.clamp(tunables.min_effort * vo2_max, tunables.max_effort * vo2_max))
    }

    /// Mean of the Gaussian roll, as a fraction of VO2max.
    pub fn pace_change_mean(
        state: &RunnerState,
        attributes: &RunnerAttributes,
        target_vdot_percent: f64,
        tunables: &ControllerTunables,
    ) -> f64 {
        let soreness = state.short_term_soreness + attributes.long_term_soreness;
        let soreness_feel = FloatUtils::clamp01(FloatUtils::inverse_lerp(
            0.0,
            tunables.max_soreness,
            soreness,
        ))
        .powf(attributes.current_grit);

        let soreness_factor =
            FloatUtils::lerp(-1.0, 1.0, soreness_feel).powi(5) - attributes.confidence * 0.1;

        let interval_percent = state.last_interval().vdot / attributes.current_vo2_max;
        let vdot_factor = interval_percent - target_vdot_percent - attributes.confidence * 0.01;

        tunables.magnitude * (-0.45 * (soreness_factor + 0.35).powi(3) - 2.2 * vdot_factor)
    }
}
