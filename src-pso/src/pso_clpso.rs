use log::debug;
use rand::Rng;

use crate::distinct_indices::distinct_indices;
use crate::error::{PsoError, Result};
use crate::inertia::Inertia;
use crate::kernel::learning_move;
use crate::objective::Direction;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};
use crate::swarm::Memory;

/// Comprehensive-learning PSO: every dimension learns from the personal
/// best of a tournament-selected particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClpsoParams {
    pub c: f64,
    pub w_min: f64,
    pub w_max: f64,
    /// Generations without improvement before the exemplars are redrawn.
    pub refreshing_gap: usize,
    pub vmax_fraction: f64,
}

impl Default for ClpsoParams {
    fn default() -> Self {
        Self { c: 2.0, w_min: 0.4, w_max: 0.9, refreshing_gap: 7, vmax_fraction: 0.2 }
    }
}

impl ClpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c", self.c)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        if self.refreshing_gap == 0 {
            return Err(PsoError::InvalidParameter { name: "refreshing_gap", value: 0.0, reason: "must be at least 1" });
        }
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

/// Learning probability of particle `i` out of `n`, from 0.05 up to 0.5.
pub fn learning_probability(i: usize, n: usize) -> f64 {
    let denom = (n.max(2) - 1) as f64;
    0.05 + 0.45 * ((10.0 * i as f64 / denom).exp() - 1.0) / (10f64.exp() - 1.0)
}

/// Draw per-dimension exemplars for particle `i`.
fn draw_exemplars<R: Rng + ?Sized>(
    i: usize,
    pc: f64,
    dimension: usize,
    memory: &Memory,
    direction: Direction,
    rng: &mut R,
) -> Vec<usize> {
    let n = memory.len();
    let mut exemplars = vec![i; dimension];
    let mut learns_from_others = false;
    for slot in exemplars.iter_mut() {
        if rng.random::<f64>() < pc {
            let pair = distinct_indices(i, 2, n, rng);
            if let [a, b] = pair[..] {
                *slot = if direction.fitter(memory.fitness[a], memory.fitness[b]) { a } else { b };
                learns_from_others = true;
            }
        }
    }
    if !learns_from_others {
        let d = rng.random_range(0..dimension);
        if let Some(&other) = distinct_indices(i, 1, n, rng).first() {
            exemplars[d] = other;
        }
    }
    exemplars
}

pub struct Clpso {
    params: ClpsoParams,
    inertia: Inertia,
}

impl Clpso {
    pub fn new(params: ClpsoParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia }
    }
}

impl SwarmStrategy for Clpso {
    fn name(&self) -> &'static str {
        "clpso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        3
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        let n = state.population();
        let memory = state.swarm.memory();
        let direction = state.direction();
        let dimension = state.dimension();
        for i in 0..n {
            let pc = learning_probability(i, n);
            let exemplars = draw_exemplars(i, pc, dimension, &memory, direction, &mut state.rng);
            let p = &mut state.swarm.particles[i];
            p.learning_probability = pc;
            p.exemplars = exemplars;
            p.stagnation = 0;
        }
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let memory = state.swarm.memory();
        let direction = state.direction();
        let dimension = state.dimension();
        for i in 0..state.population() {
            let p = &mut state.swarm.particles[i];
            if p.stagnation >= self.params.refreshing_gap {
                p.exemplars = draw_exemplars(i, p.learning_probability, dimension, &memory, direction, &mut state.rng);
                p.stagnation = 0;
                debug!("clpso: exemplars of particle {} refreshed", i);
            }
            let exemplars = std::mem::take(&mut p.exemplars);
            learning_move(p, w, self.params.c, |d| memory.pbest[exemplars[d]][d], &state.limits, &mut state.rng);
            p.exemplars = exemplars;
            p.stagnation += 1;
            if state.evaluate_particle(i) {
                state.swarm.particles[i].stagnation = 0;
            }
        }
        state.refresh_best();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_learning_probability_range() {
        assert!((learning_probability(0, 20) - 0.05).abs() < 1e-12);
        assert!((learning_probability(19, 20) - 0.5).abs() < 1e-12);
        assert!(learning_probability(5, 20) < learning_probability(6, 20));
    }

    #[test]
    fn test_exemplars_never_all_self() {
        let memory = Memory {
            pbest: vec![array![0.0, 0.0], array![1.0, 1.0], array![2.0, 2.0], array![3.0, 3.0]],
            fitness: vec![0.0, 2.0, 8.0, 18.0],
        };
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let ex = draw_exemplars(2, 0.0, 2, &memory, Direction::Minimize, &mut rng);
            assert_eq!(ex.iter().filter(|&&e| e != 2).count(), 1);
        }
    }

    #[test]
    fn test_tournament_prefers_fitter_memory() {
        let memory = Memory {
            pbest: vec![array![0.0], array![1.0], array![2.0]],
            fitness: vec![5.0, 1.0, 3.0],
        };
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            // the only two others are 1 and 2
            assert_eq!(draw_exemplars(0, 1.0, 1, &memory, Direction::Minimize, &mut rng), vec![1]);
        }
    }
}
