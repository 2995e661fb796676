use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::objective::Direction;
use crate::PsoIntermediate;

/// Records per-generation progress through the PSO callback
#[derive(Debug, Clone)]
pub struct OptimizationRecorder {
    /// Label of the recorded run
    name: String,
    direction: Direction,
    /// Shared records storage
    records: Arc<Mutex<Vec<RecordedGeneration>>>,
    /// Best fitness seen so far
    best_value: Arc<Mutex<Option<f64>>>,
}

/// One generation of a recorded run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedGeneration {
    pub iteration: usize,
    /// Evaluations consumed so far
    pub evaluations: usize,
    /// Best position found so far
    pub x: Vec<f64>,
    /// Best fitness found so far
    pub best_result: f64,
    /// Standard deviation of the personal-best fitness across the swarm
    pub spread: f64,
    /// Whether this generation improved the best known result
    pub is_improvement: bool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl OptimizationRecorder {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            records: Arc::new(Mutex::new(Vec::new())),
            best_value: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Callback storing a [`RecordedGeneration`] for every generation it observes
    pub fn create_callback(&self) -> Box<dyn FnMut(&PsoIntermediate<'_>)> {
        let records = Arc::clone(&self.records);
        let best_value = Arc::clone(&self.best_value);
        let direction = self.direction;

        Box::new(move |intermediate: &PsoIntermediate<'_>| {
            let is_improvement = {
                let mut best = lock(&best_value);
                let improved = best.is_none_or(|b| direction.fitter(intermediate.fun, b));
                if improved {
                    *best = Some(intermediate.fun);
                }
                improved
            };

            let fitness = intermediate.swarm.personal_best_fitness();
            let spread = fitness.std(0.0);
            lock(&records).push(RecordedGeneration {
                iteration: intermediate.iter,
                evaluations: intermediate.nfev,
                x: intermediate.x.to_vec(),
                best_result: intermediate.fun,
                spread,
                is_improvement,
            });
        })
    }

    /// Copy of all recorded generations
    pub fn get_records(&self) -> Vec<RecordedGeneration> {
        lock(&self.records).clone()
    }

    pub fn num_iterations(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
        *lock(&self.best_value) = None;
    }

    /// Best position and fitness of the last recorded generation
    pub fn get_best_solution(&self) -> Option<(Vec<f64>, f64)> {
        lock(&self.records).last().map(|r| (r.x.clone(), r.best_result))
    }
}
