//! Evaluation counting and convergence sampling.
//!
//! Every objective call in a run goes through [`EvaluationBudget::evaluate`].
//! Checkpoints are given as fractions of the evaluation budget and converted
//! to absolute counts once, at construction. A checkpoint fires on the first
//! evaluation whose count reaches it, exactly once, in increasing order.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PsoError, Result};
use crate::objective::{Direction, Objective};

/// One convergence-trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSample {
    /// Evaluation count at which the checkpoint fired.
    pub evaluations: usize,
    /// Generation in progress.
    pub generation: usize,
    /// Best personal-best fitness known at that point.
    pub best: f64,
    /// Distance of `best` to the known optimum.
    pub error: f64,
}

const CHECKPOINT_TOLERANCE: f64 = 1e-9;

/// Convert checkpoint fractions of `max` into sorted, distinct absolute counts.
pub fn checkpoint_counts(max: usize, fractions: &[f64]) -> Result<Vec<usize>> {
    if fractions.is_empty() {
        return Err(PsoError::EmptyCheckpoints);
    }
    let mut counts = Vec::with_capacity(fractions.len());
    for &fraction in fractions {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PsoError::InvalidCheckpoint { value: fraction });
        }
        let target = fraction * max as f64;
        // 0.7 * 10000 is 7000.000000000001 in floating point
        let count = (target - CHECKPOINT_TOLERANCE * target.max(1.0)).ceil().max(1.0) as usize;
        counts.push(count.min(max));
    }
    counts.sort_unstable();
    counts.dedup();
    Ok(counts)
}

/// Evaluation counter with optional cap and checkpoint schedule.
#[derive(Debug, Clone)]
pub struct EvaluationBudget {
    count: usize,
    max: Option<usize>,
    checkpoints: Vec<usize>,
    next: usize,
    incumbent: Option<f64>,
    direction: Direction,
    trace: Vec<ConvergenceSample>,
}

impl EvaluationBudget {
    /// Unlimited budget with no sampling (generation-capped runs).
    pub fn unlimited(direction: Direction) -> Self {
        Self {
            count: 0,
            max: None,
            checkpoints: Vec::new(),
            next: 0,
            incumbent: None,
            direction,
            trace: Vec::new(),
        }
    }

    /// Budget of `max` evaluations sampled at the given fractions.
    pub fn with_checkpoints(max: usize, fractions: &[f64], direction: Direction) -> Result<Self> {
        if max == 0 {
            return Err(PsoError::InvalidParameter {
                name: "max_evaluations",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        let checkpoints = checkpoint_counts(max, fractions)?;
        Ok(Self { max: Some(max), checkpoints, ..Self::unlimited(direction) })
    }

    /// Evaluate `x`, count it, and sample the trace if a checkpoint is reached.
    pub fn evaluate(&mut self, objective: &dyn Objective, x: &Array1<f64>, generation: usize) -> f64 {
        let f = objective.evaluate(x);
        self.count += 1;
        while self.next < self.checkpoints.len() && self.count >= self.checkpoints[self.next] {
            // before any personal best exists, the point just evaluated is the best known
            let best = self.incumbent.unwrap_or(f);
            if let Some(error) = objective.error_to_optimum(best) {
                self.trace.push(ConvergenceSample { evaluations: self.count, generation, best, error });
            }
            self.next += 1;
        }
        f
    }

    /// Report a personal-best fitness; the incumbent keeps the fittest seen.
    pub fn observe(&mut self, fpbest: f64) {
        match self.incumbent {
            Some(current) if !self.direction.fitter(fpbest, current) => {}
            _ => self.incumbent = Some(fpbest),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    pub fn exhausted(&self) -> bool {
        self.max.is_some_and(|m| self.count >= m)
    }

    pub fn trace(&self) -> &[ConvergenceSample] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<ConvergenceSample> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Problem;

    #[test]
    fn test_checkpoint_conversion_crosses_float_noise() {
        let counts = checkpoint_counts(10_000, &[0.01, 0.1, 0.3, 0.7, 1.0]).unwrap();
        assert_eq!(counts, vec![100, 1_000, 3_000, 7_000, 10_000]);
        // non-integer targets round up, duplicates collapse
        assert_eq!(checkpoint_counts(7, &[0.5, 0.5, 0.01]).unwrap(), vec![1, 4]);
    }

    #[test]
    fn test_checkpoint_validation() {
        assert_eq!(checkpoint_counts(10, &[]), Err(PsoError::EmptyCheckpoints));
        assert_eq!(checkpoint_counts(10, &[0.0]), Err(PsoError::InvalidCheckpoint { value: 0.0 }));
        assert!(checkpoint_counts(10, &[1.5]).is_err());
        assert!(EvaluationBudget::with_checkpoints(0, &[0.5], Direction::Minimize).is_err());
    }

    #[test]
    fn test_each_checkpoint_fires_once_in_order() {
        let p = Problem::new(|x: &Array1<f64>| x[0] * x[0], &[(-2.0, 2.0)]).unwrap().with_optimum(0.0);
        let mut budget = EvaluationBudget::with_checkpoints(10, &[0.2, 0.5, 1.0], Direction::Minimize).unwrap();
        let x = Array1::from(vec![1.5]);
        for g in 0..12 {
            let f = budget.evaluate(&p, &x, g);
            budget.observe(f - g as f64 * 0.1);
        }
        assert_eq!(budget.count(), 12);
        let trace = budget.trace();
        assert_eq!(trace.iter().map(|s| s.evaluations).collect::<Vec<_>>(), vec![2, 5, 10]);
        assert_eq!(trace.iter().map(|s| s.generation).collect::<Vec<_>>(), vec![1, 4, 9]);
        // the incumbent only ever improves, so the error never grows
        assert!(trace.windows(2).all(|w| w[1].error <= w[0].error));
        assert!(budget.exhausted());
        let owned = budget.into_trace();
        assert_eq!(owned.len(), 3);
        assert_eq!(owned[2].evaluations, 10);
    }

    #[test]
    fn test_unlimited_budget_never_samples() {
        let p = Problem::new(|x: &Array1<f64>| x[0], &[(-1.0, 1.0)]).unwrap();
        let mut budget = EvaluationBudget::unlimited(Direction::Minimize);
        for _ in 0..5 {
            budget.evaluate(&p, &Array1::zeros(1), 0);
        }
        assert_eq!(budget.count(), 5);
        assert!(budget.trace().is_empty());
        assert!(!budget.exhausted());
    }
}
