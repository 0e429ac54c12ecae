use crate::config::{FuelTunables, SorenessTunables};

/// Physiological cost formulas. All pure; callers clamp accumulated values.
pub struct PhysiologyCosts;

impl PhysiologyCosts {
    /// `t ^ ((vdot / (vo2max · threshold) - 1) · scale)`.
    ///
    /// Above the threshold the exponent is positive and soreness compounds
    /// with time; below it the power is negative and the value decays.
    pub fn short_term_soreness(
        time_in_minutes: f64,
        vdot: f64,
        vo2_max: f64,
        tunables: &SorenessTunables,
    ) -> f64 {
        let exponent = Self::short_term_exponent(vdot, vo2_max, tunables);

        time_in_minutes.max(0.0).powf(exponent)
    }

    /// Change of short-term soreness while the clock moves from
    /// `from_minutes` to `to_minutes` at a constant effort. Time is floored
    /// at one minute so the negative-exponent branch never divides by zero.
    pub fn short_term_soreness_delta(
        from_minutes: f64,
        to_minutes: f64,
        vdot: f64,
        vo2_max: f64,
        tunables: &SorenessTunables,
    ) -> f64 {
        let exponent = Self::short_term_exponent(vdot, vo2_max, tunables);

        to_minutes.max(1.0).powf(exponent) - from_minutes.max(1.0).powf(exponent)
    }

    /// Soreness gained over one step. Above the threshold this is the
    /// compounding growth of `short_term_soreness`; below it the power
    /// decays from 1 and the runner accrues what it sheds, which stays
    /// under one unit however long the easy running lasts.
    pub fn short_term_soreness_accrual(
        from_minutes: f64,
        to_minutes: f64,
        vdot: f64,
        vo2_max: f64,
        tunables: &SorenessTunables,
    ) -> f64 {
        Self::short_term_soreness_delta(from_minutes, to_minutes, vdot, vo2_max, tunables).abs()
    }

    fn short_term_exponent(vdot: f64, vo2_max: f64, tunables: &SorenessTunables) -> f64 {
        (vdot / (vo2_max * tunables.short_term_threshold) - 1.0) * tunables.short_term_exponent_scale
    }

    /// Long-term soreness added by an activity.
    pub fn long_term_soreness_delta(
        time_in_minutes: f64,
        vdot: f64,
        vo2_max: f64,
        tunables: &SorenessTunables,
    ) -> f64 {
        let gap = vdot / (vo2_max * tunables.long_term_threshold) - 1.0;
        let t = time_in_minutes;

        tunables.cubic_slope * t * gap.powi(3)
            + tunables.linear_slope * t * (gap + tunables.linear_offset)
            + tunables.time_slope * (t + tunables.time_offset)
    }

    /// Liters of fluid lost.
    pub fn hydration_cost(
        vdot: f64,
        vo2_max: f64,
        time_in_minutes: f64,
        tunables: &FuelTunables,
    ) -> f64 {
        Self::relative_intensity(vdot, vo2_max, tunables)
            * time_in_minutes
            * tunables.hydration_liters_per_minute
    }

    /// Kilocalories burned.
    pub fn calorie_cost(
        vdot: f64,
        vo2_max: f64,
        time_in_minutes: f64,
        tunables: &FuelTunables,
    ) -> f64 {
        Self::relative_intensity(vdot, vo2_max, tunables)
            * time_in_minutes
            * tunables.calories_per_minute
    }

    #[inline]
    fn relative_intensity(vdot: f64, vo2_max: f64, tunables: &FuelTunables) -> f64 {
        vdot / (vo2_max * tunables.reference_intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_term_soreness_threshold_flips_growth() {
        let tunables = SorenessTunables::default();

        // 90% effort: grows with time
        let hard_10 = PhysiologyCosts::short_term_soreness(10.0, 45.0, 50.0, &tunables);
        let hard_40 = PhysiologyCosts::short_term_soreness(40.0, 45.0, 50.0, &tunables);
        assert!(hard_40 > hard_10);
        assert!(hard_10 > 1.0);

        // 50% effort: decays with time
        let easy_10 = PhysiologyCosts::short_term_soreness(10.0, 25.0, 50.0, &tunables);
        let easy_40 = PhysiologyCosts::short_term_soreness(40.0, 25.0, 50.0, &tunables);
        assert!(easy_40 < easy_10);
        assert!(easy_10 < 1.0);
    }

    #[test]
    fn test_short_term_delta_telescopes() {
        let tunables = SorenessTunables::default();

        let mut total = 0.0;
        for minute in 0..30 {
            total += PhysiologyCosts::short_term_soreness_delta(
                minute as f64,
                (minute + 1) as f64,
                45.0,
                50.0,
                &tunables,
            );
        }

        let direct = PhysiologyCosts::short_term_soreness(30.0, 45.0, 50.0, &tunables) - 1.0;
        assert!((total - direct).abs() < 1e-9);
    }

    #[test]
    fn test_accrual_never_negative_below_threshold() {
        let tunables = SorenessTunables::default();

        let delta = PhysiologyCosts::short_term_soreness_delta(10.0, 11.0, 25.0, 50.0, &tunables);
        let accrual = PhysiologyCosts::short_term_soreness_accrual(10.0, 11.0, 25.0, 50.0, &tunables);

        assert!(delta < 0.0);
        assert_eq!(accrual, -delta);
    }

    #[test]
    fn test_long_term_delta_grows_with_effort() {
        let tunables = SorenessTunables::default();

        let easy = PhysiologyCosts::long_term_soreness_delta(40.0, 30.0, 50.0, &tunables);
        let hard = PhysiologyCosts::long_term_soreness_delta(40.0, 48.0, 50.0, &tunables);

        assert!(hard > easy);
    }

    #[test]
    fn test_fuel_costs_at_reference_intensity() {
        let tunables = FuelTunables::default();

        let liters = PhysiologyCosts::hydration_cost(35.0, 50.0, 10.0, &tunables);
        let kcal = PhysiologyCosts::calorie_cost(35.0, 50.0, 10.0, &tunables);

        assert!((liters - 0.2).abs() < 1e-12);
        assert!((kcal - 100.0).abs() < 1e-9);
    }
}
