//! Objective contract consumed by the swarm engine.

use ndarray::Array1;

use crate::error::{PsoError, Result};

/// Optimisation direction; decides which of two fitness values is "fitter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    /// Strict comparison: `a` is fitter than `b`. NaN is never fitter.
    pub fn fitter(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Minimize => a < b,
            Direction::Maximize => a > b,
        }
    }

    /// The less fit of `a` and `b`.
    pub fn worst_of(self, a: f64, b: f64) -> f64 {
        if self.fitter(a, b) { b } else { a }
    }

    /// Sign applied to fitness differences so that improvements are positive.
    pub fn improvement_sign(self) -> f64 {
        match self {
            Direction::Minimize => -1.0,
            Direction::Maximize => 1.0,
        }
    }
}

/// A black-box scalar objective over a box-bounded domain.
pub trait Objective {
    /// Evaluate the objective at `x`.
    fn evaluate(&self, x: &Array1<f64>) -> f64;

    /// Per-dimension `(lower, upper)` bounds.
    fn bounds(&self) -> (&Array1<f64>, &Array1<f64>);

    fn dimension(&self) -> usize {
        self.bounds().0.len()
    }

    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    fn fitter(&self, a: f64, b: f64) -> bool {
        self.direction().fitter(a, b)
    }

    /// Known optimal value, when the problem has one.
    fn optimum(&self) -> Option<f64> {
        None
    }

    /// Distance from `value` to the known optimum.
    fn error_to_optimum(&self, value: f64) -> Option<f64> {
        self.optimum().map(|opt| (value - opt).abs())
    }
}

/// Check that bounds are non-empty, equally sized, finite and strictly ordered.
pub fn validate_bounds(lower: &Array1<f64>, upper: &Array1<f64>) -> Result<()> {
    if lower.len() != upper.len() {
        return Err(PsoError::BoundsMismatch { lower_len: lower.len(), upper_len: upper.len() });
    }
    if lower.is_empty() {
        return Err(PsoError::EmptyBounds);
    }
    for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(PsoError::InvalidBounds { index, lower: lo, upper: hi });
        }
    }
    Ok(())
}

/// Closure-backed objective with explicit bounds.
///
/// ```rust
/// use ndarray::Array1;
/// use swarmbench_pso::Problem;
///
/// let sphere = Problem::new(|x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>(), &[(-5.0, 5.0); 3])
///     .unwrap()
///     .with_optimum(0.0);
/// assert_eq!(sphere.dimension(), 3);
/// ```
pub struct Problem<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    func: F,
    lower: Array1<f64>,
    upper: Array1<f64>,
    direction: Direction,
    optimum: Option<f64>,
}

impl<F> Problem<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    /// Build from a slice of `(lower, upper)` pairs.
    pub fn new(func: F, bounds: &[(f64, f64)]) -> Result<Self> {
        let lower = bounds.iter().map(|b| b.0).collect::<Array1<f64>>();
        let upper = bounds.iter().map(|b| b.1).collect::<Array1<f64>>();
        Self::from_arrays(func, lower, upper)
    }

    pub fn from_arrays(func: F, lower: Array1<f64>, upper: Array1<f64>) -> Result<Self> {
        validate_bounds(&lower, &upper)?;
        Ok(Self { func, lower, upper, direction: Direction::Minimize, optimum: None })
    }

    /// Switch to maximisation.
    pub fn maximize(mut self) -> Self {
        self.direction = Direction::Maximize;
        self
    }

    /// Record the known optimal value, enabling convergence traces.
    pub fn with_optimum(mut self, value: f64) -> Self {
        self.optimum = Some(value);
        self
    }

    pub fn dimension(&self) -> usize {
        self.lower.len()
    }
}

impl<F> Objective for Problem<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    fn evaluate(&self, x: &Array1<f64>) -> f64 {
        (self.func)(x)
    }

    fn bounds(&self) -> (&Array1<f64>, &Array1<f64>) {
        (&self.lower, &self.upper)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn optimum(&self) -> Option<f64> {
        self.optimum
    }
}
