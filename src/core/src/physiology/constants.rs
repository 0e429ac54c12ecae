pub const METERS_PER_MILE: f64 = 1609.34;
pub const SECONDS_PER_MINUTE: f64 = 60.0;

// Oxygen cost model: a·v² + b·v + c, v in meters per minute
pub const VDOT_A: f64 = 0.000104;
pub const VDOT_B: f64 = 0.182258;
pub const VDOT_C: f64 = -4.6;

pub const MIN_ECONOMY: f64 = 0.05;
pub const FORM_ECONOMY_SPAN: f64 = 0.25;
pub const STRENGTH_ECONOMY_SPAN: f64 = 0.1;
pub const ECONOMY_STAT_SCALE: f64 = 50.0;
pub const HYDRATION_ECONOMY_SPAN: f64 = 0.15;
pub const FUEL_ECONOMY_SPAN: f64 = 0.2;
