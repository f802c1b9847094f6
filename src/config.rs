use crate::error::{FerrikError, Result};
use log::error;

pub const DEFAULT_TOLERANCE: f32 = 0.01;
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// How hard a solver tries before giving up.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SolverConfig {
    tolerance: f32,
    max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(tolerance: f32, max_iterations: usize) -> Result<Self> {
        SolverConfig::default()
            .with_tolerance(tolerance)?
            .with_max_iterations(max_iterations)
    }

    /// Effector-to-target distance, in world units, that counts as solved.
    pub fn with_tolerance(mut self, tolerance: f32) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            error!("The solve tolerance must be greater than zero, got {}.", tolerance);
            return Err(FerrikError::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        if max_iterations == 0 {
            error!("The maximum number of attempts to solve an IK chain must be at least 1.");
            return Err(FerrikError::InvalidIterationBudget);
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance(), 0.01);
        assert_eq!(config.max_iterations(), 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(SolverConfig::new(0.0, 10), Err(FerrikError::InvalidTolerance(0.0)));
        assert_eq!(SolverConfig::new(-1.0, 10), Err(FerrikError::InvalidTolerance(-1.0)));
        assert!(SolverConfig::new(f32::NAN, 10).is_err());
        assert_eq!(SolverConfig::new(0.001, 0), Err(FerrikError::InvalidIterationBudget));
    }

    #[test]
    fn accepts_long_chain_budgets() {
        let config = SolverConfig::new(0.001, 50).unwrap();
        assert_eq!(config.tolerance(), 0.001);
        assert_eq!(config.max_iterations(), 50);
    }
}
