// Glicko-2 scale
pub const SCALING_FACTOR: f64 = 173.7178;
pub const BASE_RATING: f64 = 1500.0;

// Default player state
pub const DEFAULT_RATING: f64 = 1500.0;
pub const DEFAULT_DEVIATION: f64 = 350.0;
pub const DEFAULT_VOLATILITY: f64 = 0.06;

// Bounds applied after every update
pub const MIN_DEVIATION: f64 = 30.0;
pub const MAX_DEVIATION: f64 = 350.0;
pub const MIN_VOLATILITY: f64 = 0.03;
pub const MAX_VOLATILITY: f64 = 0.15;

// System constant constraining volatility change
pub const DEFAULT_TAU: f64 = 0.5;

// Volatility solver
pub const CONVERGENCE_TOLERANCE: f64 = 0.000_001;
pub const MAX_SOLVER_ITERATIONS: u32 = 100;

/// Largest rating movement (public scale) a single full update may produce.
pub const MAX_RATING_CHANGE: f64 = 250.0;

// Placement curve scoring
pub const PLACEMENT_CURVE_EXPONENT: f64 = 0.7;
pub const ALL_TIED_SCORE: f64 = 0.5;

pub const DAYS_PER_WEEK: i64 = 7;
