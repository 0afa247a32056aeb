use thiserror::Error;

use crate::model::config::RatingConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("no convergence after {iterations} iterations")]
    NonConvergence { iterations: u32 },

    #[error("iterate became non-finite at iteration {iteration}")]
    NonFinite { iteration: u32 }
}

/// Newton iteration on the log-volatility posterior mode.
///
/// With `a = ln(sigma^2)` and `d(x) = phi^2 + v + e^x`, the iteration starts
/// at `x0 = a` and stops once successive iterates differ by less than the
/// configured tolerance. The result is `e^(x/2)` clamped to the volatility
/// bounds.
#[derive(Debug, Clone, Copy)]
pub struct VolatilitySolver {
    tau: f64,
    tolerance: f64,
    max_iterations: u32,
    min_volatility: f64,
    max_volatility: f64
}

impl VolatilitySolver {
    pub fn new(config: &RatingConfig) -> VolatilitySolver {
        VolatilitySolver {
            tau: config.tau(),
            tolerance: config.convergence_tolerance(),
            max_iterations: config.max_solver_iterations(),
            min_volatility: config.min_volatility(),
            max_volatility: config.max_volatility()
        }
    }

    /// `phi` is the prior internal deviation, `v` the estimated variance and
    /// `delta` the estimated improvement.
    pub fn solve(&self, phi: f64, volatility: f64, v: f64, delta: f64) -> Result<f64, SolverError> {
        let a = (volatility * volatility).ln();
        let tau_sq = self.tau * self.tau;
        let phi_sq = phi * phi;

        let mut x0 = a;
        for iteration in 1..=self.max_iterations {
            let ex = x0.exp();
            let d = phi_sq + v + ex;

            let h1 = -(x0 - a) / tau_sq - 0.5 * ex / d + 0.5 * ex * (delta / d).powi(2);
            let h2 = -1.0 / tau_sq - 0.5 * ex * (phi_sq + v) / d.powi(2)
                + 0.5 * delta.powi(2) * ex * (phi_sq + v - ex) / d.powi(3);

            let x1 = x0 - h1 / h2;
            if !x1.is_finite() {
                return Err(SolverError::NonFinite { iteration });
            }

            if (x1 - x0).abs() < self.tolerance {
                return Ok((x1 / 2.0).exp().clamp(self.min_volatility, self.max_volatility));
            }

            x0 = x1;
        }

        Err(SolverError::NonConvergence {
            iterations: self.max_iterations
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SolverError, VolatilitySolver};
    use crate::model::config::RatingConfig;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_glickman_example() {
        // Step 5 of Glickman's worked example
        let solver = VolatilitySolver::new(&RatingConfig::default());
        let sigma = solver.solve(1.1513, 0.06, 1.7785, -0.4834).unwrap();

        assert_abs_diff_eq!(sigma, 0.05999, epsilon = 1e-5);
    }

    #[test]
    fn test_no_surprise_keeps_volatility() {
        let solver = VolatilitySolver::new(&RatingConfig::default());
        let sigma = solver.solve(1.0, 0.06, 2.0, 0.0).unwrap();

        assert!(sigma <= 0.06);
        assert!(sigma > 0.059);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let config = RatingConfig::builder().volatility_bounds(0.03, 0.05).build().unwrap();
        let solver = VolatilitySolver::new(&config);
        let sigma = solver.solve(1.0, 0.06, 2.0, 0.0).unwrap();

        assert_eq!(sigma, 0.05);
    }

    #[test]
    fn test_reports_non_convergence() {
        let config = RatingConfig::builder()
            .max_solver_iterations(1)
            .convergence_tolerance(1e-300)
            .build()
            .unwrap();
        let solver = VolatilitySolver::new(&config);

        assert_eq!(
            solver.solve(1.1513, 0.06, 1.7785, -0.4834),
            Err(SolverError::NonConvergence { iterations: 1 })
        );
    }

    #[test]
    fn test_reports_non_finite() {
        let solver = VolatilitySolver::new(&RatingConfig::default());

        assert_eq!(
            solver.solve(1.0, 0.06, f64::NAN, 0.0),
            Err(SolverError::NonFinite { iteration: 1 })
        );
    }
}
