use chrono::NaiveDate;

use crate::model::{
    constants,
    error::ConfigError,
    structures::{
        cap_scope::CapScope, decay_resolution::DecayResolution, outcome_scoring::OutcomeScoring,
        same_day_mode::SameDayMode
    }
};

#[derive(Debug, Clone)]
pub struct RatingConfigBuilder {
    decay_resolution: DecayResolution,
    tau: f64,

    rating_change_cap: f64,
    cap_scope: CapScope,

    min_volatility: f64,
    max_volatility: f64,
    min_deviation: f64,
    max_deviation: f64,

    same_day_mode: SameDayMode,
    tie_variance_inflation: bool,
    outcome_scoring: OutcomeScoring,
    field_size_scaling: bool,
    rd_spread_damping: Option<f64>,

    convergence_tolerance: f64,
    max_solver_iterations: u32,

    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    season_start: Option<NaiveDate>
}

impl Default for RatingConfigBuilder {
    fn default() -> RatingConfigBuilder {
        RatingConfigBuilder::new()
    }
}

impl RatingConfigBuilder {
    pub fn new() -> RatingConfigBuilder {
        RatingConfigBuilder {
            decay_resolution: DecayResolution::default(),
            tau: constants::DEFAULT_TAU,

            rating_change_cap: constants::MAX_RATING_CHANGE,
            cap_scope: CapScope::default(),

            min_volatility: constants::MIN_VOLATILITY,
            max_volatility: constants::MAX_VOLATILITY,
            min_deviation: constants::MIN_DEVIATION,
            max_deviation: constants::MAX_DEVIATION,

            same_day_mode: SameDayMode::default(),
            tie_variance_inflation: false,
            outcome_scoring: OutcomeScoring::default(),
            field_size_scaling: false,
            rd_spread_damping: None,

            convergence_tolerance: constants::CONVERGENCE_TOLERANCE,
            max_solver_iterations: constants::MAX_SOLVER_ITERATIONS,

            default_rating: constants::DEFAULT_RATING,
            default_deviation: constants::DEFAULT_DEVIATION,
            default_volatility: constants::DEFAULT_VOLATILITY,

            season_start: None
        }
    }

    pub fn decay_resolution(&mut self, decay_resolution: DecayResolution) -> &mut Self {
        self.decay_resolution = decay_resolution;
        self
    }

    pub fn tau(&mut self, tau: f64) -> &mut Self {
        self.tau = tau;
        self
    }

    pub fn rating_change_cap(&mut self, rating_change_cap: f64) -> &mut Self {
        self.rating_change_cap = rating_change_cap;
        self
    }

    pub fn cap_scope(&mut self, cap_scope: CapScope) -> &mut Self {
        self.cap_scope = cap_scope;
        self
    }

    pub fn volatility_bounds(&mut self, min: f64, max: f64) -> &mut Self {
        self.min_volatility = min;
        self.max_volatility = max;
        self
    }

    pub fn deviation_bounds(&mut self, min: f64, max: f64) -> &mut Self {
        self.min_deviation = min;
        self.max_deviation = max;
        self
    }

    pub fn same_day_mode(&mut self, same_day_mode: SameDayMode) -> &mut Self {
        self.same_day_mode = same_day_mode;
        self
    }

    pub fn tie_variance_inflation(&mut self, enabled: bool) -> &mut Self {
        self.tie_variance_inflation = enabled;
        self
    }

    pub fn outcome_scoring(&mut self, outcome_scoring: OutcomeScoring) -> &mut Self {
        self.outcome_scoring = outcome_scoring;
        self
    }

    pub fn field_size_scaling(&mut self, enabled: bool) -> &mut Self {
        self.field_size_scaling = enabled;
        self
    }

    pub fn rd_spread_damping(&mut self, damping: Option<f64>) -> &mut Self {
        self.rd_spread_damping = damping;
        self
    }

    pub fn convergence_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn max_solver_iterations(&mut self, iterations: u32) -> &mut Self {
        self.max_solver_iterations = iterations;
        self
    }

    pub fn default_rating(&mut self, rating: f64) -> &mut Self {
        self.default_rating = rating;
        self
    }

    pub fn default_deviation(&mut self, deviation: f64) -> &mut Self {
        self.default_deviation = deviation;
        self
    }

    pub fn default_volatility(&mut self, volatility: f64) -> &mut Self {
        self.default_volatility = volatility;
        self
    }

    pub fn season_start(&mut self, season_start: Option<NaiveDate>) -> &mut Self {
        self.season_start = season_start;
        self
    }

    pub fn build(&self) -> Result<RatingConfig, ConfigError> {
        check_bounds("volatility", self.min_volatility, self.max_volatility)?;
        check_bounds("deviation", self.min_deviation, self.max_deviation)?;
        check_positive("minimum volatility", self.min_volatility)?;
        check_positive("tau", self.tau)?;
        check_positive("rating change cap", self.rating_change_cap)?;
        check_positive("convergence tolerance", self.convergence_tolerance)?;
        check_positive("default volatility", self.default_volatility)?;

        if !self.default_rating.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "default rating",
                value: self.default_rating
            });
        }

        if !self.default_deviation.is_finite() || self.default_deviation < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "default deviation",
                value: self.default_deviation
            });
        }

        if self.max_solver_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        if let Some(damping) = self.rd_spread_damping {
            if !(damping > 0.0 && damping <= 1.0) {
                return Err(ConfigError::InvalidDamping(damping));
            }
        }

        Ok(self.assemble())
    }

    fn assemble(&self) -> RatingConfig {
        RatingConfig {
            decay_resolution: self.decay_resolution,
            tau: self.tau,
            rating_change_cap: self.rating_change_cap,
            cap_scope: self.cap_scope,
            min_volatility: self.min_volatility,
            max_volatility: self.max_volatility,
            min_deviation: self.min_deviation,
            max_deviation: self.max_deviation,
            same_day_mode: self.same_day_mode,
            tie_variance_inflation: self.tie_variance_inflation,
            outcome_scoring: self.outcome_scoring,
            field_size_scaling: self.field_size_scaling,
            rd_spread_damping: self.rd_spread_damping,
            convergence_tolerance: self.convergence_tolerance,
            max_solver_iterations: self.max_solver_iterations,
            default_rating: self.default_rating,
            default_deviation: self.default_deviation,
            default_volatility: self.default_volatility,
            season_start: self.season_start
        }
    }
}

fn check_bounds(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds { name, min, max })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Every tunable of the rating engine, selected once and passed into each call.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingConfig {
    decay_resolution: DecayResolution,
    tau: f64,

    rating_change_cap: f64,
    cap_scope: CapScope,

    min_volatility: f64,
    max_volatility: f64,
    min_deviation: f64,
    max_deviation: f64,

    same_day_mode: SameDayMode,
    tie_variance_inflation: bool,
    outcome_scoring: OutcomeScoring,
    field_size_scaling: bool,
    rd_spread_damping: Option<f64>,

    convergence_tolerance: f64,
    max_solver_iterations: u32,

    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    season_start: Option<NaiveDate>
}

impl Default for RatingConfig {
    fn default() -> RatingConfig {
        RatingConfigBuilder::new().assemble()
    }
}

impl RatingConfig {
    pub fn builder() -> RatingConfigBuilder {
        RatingConfigBuilder::default()
    }

    pub fn decay_resolution(&self) -> DecayResolution {
        self.decay_resolution
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn rating_change_cap(&self) -> f64 {
        self.rating_change_cap
    }

    pub fn cap_scope(&self) -> CapScope {
        self.cap_scope
    }

    pub fn min_volatility(&self) -> f64 {
        self.min_volatility
    }

    pub fn max_volatility(&self) -> f64 {
        self.max_volatility
    }

    pub fn min_deviation(&self) -> f64 {
        self.min_deviation
    }

    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    pub fn same_day_mode(&self) -> SameDayMode {
        self.same_day_mode
    }

    pub fn tie_variance_inflation(&self) -> bool {
        self.tie_variance_inflation
    }

    pub fn outcome_scoring(&self) -> OutcomeScoring {
        self.outcome_scoring
    }

    pub fn field_size_scaling(&self) -> bool {
        self.field_size_scaling
    }

    pub fn rd_spread_damping(&self) -> Option<f64> {
        self.rd_spread_damping
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn max_solver_iterations(&self) -> u32 {
        self.max_solver_iterations
    }

    pub fn default_rating(&self) -> f64 {
        self.default_rating
    }

    pub fn default_deviation(&self) -> f64 {
        self.clamp_deviation(self.default_deviation)
    }

    pub fn default_volatility(&self) -> f64 {
        self.clamp_volatility(self.default_volatility)
    }

    pub fn season_start(&self) -> Option<NaiveDate> {
        self.season_start
    }

    pub fn clamp_deviation(&self, deviation: f64) -> f64 {
        deviation.clamp(self.min_deviation, self.max_deviation)
    }

    pub fn clamp_volatility(&self, volatility: f64) -> f64 {
        volatility.clamp(self.min_volatility, self.max_volatility)
    }
}
