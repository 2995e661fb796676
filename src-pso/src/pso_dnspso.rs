use log::trace;
use ndarray::{Array1, Array2};
use rand::Rng;

use crate::distinct_indices::distinct_indices;
use crate::error::{PsoError, Result};
use crate::kernel::canonical_move;
use crate::particle::{Coefficients, Particle};
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, check_probability, SwarmStrategy};
use crate::topology::ring_neighbours;

/// PSO with diversity-enhancing trials and local plus global neighbourhood search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DnspsoParams {
    pub w: f64,
    pub c1: f64,
    pub c2: f64,
    /// Ring radius of the local neighbourhood.
    pub k: usize,
    /// Per-dimension probability that the trial takes the new coordinate.
    pub pr: f64,
    /// Probability of running the neighbourhood search for a particle.
    pub pns: f64,
    pub vmax_fraction: f64,
}

impl Default for DnspsoParams {
    fn default() -> Self {
        Self { w: 0.7298, c1: 1.49618, c2: 1.49618, k: 2, pr: 0.9, pns: 0.6, vmax_fraction: 0.2 }
    }
}

impl DnspsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("w", self.w)?;
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        if self.k == 0 {
            return Err(PsoError::InvalidParameter { name: "k", value: 0.0, reason: "must be at least 1" });
        }
        check_probability("pr", self.pr)?;
        check_probability("pns", self.pns)?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

/// Three random weights summing to one.
fn simplex_weights<R: Rng + ?Sized>(rng: &mut R) -> [f64; 3] {
    let r: [f64; 3] = [rng.random(), rng.random(), rng.random()];
    let sum: f64 = r.iter().sum();
    if sum > 0.0 { r.map(|v| v / sum) } else { [1.0 / 3.0; 3] }
}

/// Keep `candidate` in place of the current position when strictly fitter.
fn accept_if_fitter(state: &mut SearchState<'_>, i: usize, candidate: Array1<f64>, f: f64) -> bool {
    let direction = state.direction();
    let p: &mut Particle = &mut state.swarm.particles[i];
    if direction.fitter(f, p.fx) {
        p.x = candidate;
        p.record(f, direction);
        true
    } else {
        false
    }
}

pub struct Dnspso {
    params: DnspsoParams,
}

impl Dnspso {
    pub fn new(params: DnspsoParams) -> Self {
        Self { params }
    }

    fn neighbourhood_search(&self, state: &mut SearchState<'_>) {
        let n = state.population();
        let positions: Array2<f64> = state.swarm.positions();
        let memory = state.swarm.memory();
        let gbest = state.swarm.best;
        for i in 0..n {
            if state.rng.random::<f64>() >= self.params.pns {
                continue;
            }
            let local_w = simplex_weights(&mut state.rng);
            let global_w = simplex_weights(&mut state.rng);
            let ring = ring_neighbours(i, n, self.params.k);
            let pick = rand::seq::index::sample(&mut state.rng, ring.len(), 2);
            let (c, d) = (ring[pick.index(0)], ring[pick.index(1)]);
            let others = distinct_indices(i, 2, n, &mut state.rng);
            let (e, f) = (others[0], others[1]);

            let p = &state.swarm.particles[i];
            let local = Array1::from_shape_fn(p.dimension(), |k| {
                let v = local_w[0] * p.x[k] + local_w[1] * p.pbest[k] + local_w[2] * (positions[[c, k]] - positions[[d, k]]);
                state.limits.clamp_position(k, v)
            });
            let global = Array1::from_shape_fn(p.dimension(), |k| {
                let v = global_w[0] * p.x[k]
                    + global_w[1] * memory.pbest[gbest][k]
                    + global_w[2] * (positions[[e, k]] - positions[[f, k]]);
                state.limits.clamp_position(k, v)
            });

            let f_local = state.evaluate(&local);
            let f_global = state.evaluate(&global);
            let took_local = accept_if_fitter(state, i, local, f_local);
            let took_global = accept_if_fitter(state, i, global, f_global);
            if took_local || took_global {
                trace!("dns-pso: particle {} moved by neighbourhood search", i);
            }
        }
    }
}

impl SwarmStrategy for Dnspso {
    fn name(&self) -> &'static str {
        "dns-pso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        (2 * self.params.k + 1).max(3)
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let c = Coefficients { w: self.params.w, c1: self.params.c1, c2: self.params.c2 };
        let gbest = state.best().pbest.clone();
        for i in 0..state.population() {
            let before = state.swarm.particles[i].x.clone();
            canonical_move(&mut state.swarm.particles[i], c, gbest.view(), &state.limits, &mut state.rng);
            state.evaluate_particle(i);

            let mut trial = before;
            for d in 0..trial.len() {
                if state.rng.random::<f64>() < self.params.pr {
                    trial[d] = state.swarm.particles[i].x[d];
                }
            }
            let f_trial = state.evaluate(&trial);
            accept_if_fitter(state, i, trial, f_trial);
        }
        state.refresh_best();
        self.neighbourhood_search(state);
        state.refresh_best();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_simplex_weights_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let w = simplex_weights(&mut rng);
            assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            assert!(w.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_minimum_population() {
        assert_eq!(Dnspso::new(DnspsoParams::default()).min_population(), 5);
        let narrow = DnspsoParams { k: 1, ..DnspsoParams::default() };
        assert_eq!(Dnspso::new(narrow).min_population(), 3);
    }
}
