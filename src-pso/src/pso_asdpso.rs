use log::trace;
use ndarray::Array1;
use rand::Rng;

use crate::error::Result;
use crate::particle::DimCoefficients;
use crate::sampling::uniform;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_range, SwarmStrategy};

const SHRINK_ATTEMPTS: usize = 64;
const STUCK_FITNESS: f64 = 1e-10;
const STUCK_DISTANCE: f64 = 1e-5;

/// Adaptive search diversification: per-dimension coefficients shaped by
/// each particle's distance to the best particle, with a random restart for
/// particles that stop moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsdpsoParams {
    pub c1_max: f64,
    pub c2_min: f64,
    pub c2_max: f64,
    pub w_min: f64,
    pub w_max: f64,
}

impl Default for AsdpsoParams {
    fn default() -> Self {
        Self { c1_max: 3.0, c2_min: 0.5, c2_max: 3.0, w_min: 0.4, w_max: 0.9 }
    }
}

impl AsdpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1_max", self.c1_max)?;
        check_non_negative("c2_min", self.c2_min)?;
        check_range("c2_min", self.c2_min, self.c2_max)?;
        check_non_negative("w_min", self.w_min)?;
        check_range("w_min", self.w_min, self.w_max)
    }

    /// `(w, c1, c2)` for a particle at distance `dis` when the farthest
    /// particle is at `dmax`.
    pub fn shape(&self, dis: f64, dmax: f64) -> (f64, f64, f64) {
        if !(dmax > 0.0) {
            return (self.w_min, 0.0, self.c2_max);
        }
        let ratio2 = (dis / dmax).powi(2);
        let c1 = if dis > dmax / 2.0 { self.c1_max } else { 4.0 * self.c1_max * ratio2 };
        let c2 = if dis > dmax / 3.0 {
            let beta = (self.c2_max - self.c2_min) / (2.0 / 3.0 * dmax).powi(2);
            self.c2_min + beta * (dmax - dis).powi(2)
        } else {
            self.c2_max
        };
        let w = self.w_min + (self.w_max - self.w_min) * ratio2;
        (w, c1, c2)
    }
}

pub struct Asdpso {
    params: AsdpsoParams,
}

impl Asdpso {
    pub fn new(params: AsdpsoParams) -> Self {
        Self { params }
    }

    fn shape_coefficients(&self, state: &mut SearchState<'_>) {
        let n = state.dimension();
        let leader = state.best().x.clone();
        let distances: Vec<Array1<f64>> =
            state.swarm.particles.iter().map(|p| (&p.x - &leader).mapv(f64::abs)).collect();
        let dmax: Vec<f64> =
            (0..n).map(|d| distances.iter().map(|dist| dist[d]).fold(0.0, f64::max)).collect();
        for (p, dist) in state.swarm.particles.iter_mut().zip(&distances) {
            let coefficients = p.dim_coefficients.get_or_insert_with(|| DimCoefficients::zeros(n));
            for d in 0..n {
                let (w, c1, c2) = self.params.shape(dist[d], dmax[d]);
                coefficients.w[d] = w;
                coefficients.c1[d] = c1;
                coefficients.c2[d] = c2;
            }
        }
    }

    /// Re-seed the best particle after a change of leadership.
    fn perturb_new_best(&self, state: &mut SearchState<'_>) {
        let best = state.swarm.best;
        let p = &mut state.swarm.particles[best];
        let base = p.previous.as_ref().map(|(x, _)| x.clone()).unwrap_or_else(|| p.x.clone());
        p.v.fill(0.0);
        for d in 0..p.dimension() {
            let factor = uniform(&mut state.rng, 0.9, 1.1);
            p.x[d] = state.limits.clamp_position(d, base[d] * factor);
        }
        state.evaluate_particle(best);
        trace!("asd-pso: perturbed new best particle {}", best);
    }
}

impl SwarmStrategy for Asdpso {
    fn name(&self) -> &'static str {
        "asd-pso"
    }

    fn random_velocity(&self) -> bool {
        false
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        let n = state.dimension();
        for p in state.swarm.particles.iter_mut() {
            p.dim_coefficients = Some(DimCoefficients::zeros(n));
            p.previous = None;
        }
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        self.shape_coefficients(state);
        let memory = state.swarm.memory();
        let gbest = state.swarm.best;
        let c1_max = self.params.c1_max;
        let n = state.dimension();
        for i in 0..state.population() {
            let rng = &mut state.rng;
            let limits = &state.limits;
            let p = &mut state.swarm.particles[i];
            let coefficients = p.dim_coefficients.get_or_insert_with(|| DimCoefficients::zeros(n)).clone();
            let mut next = Array1::zeros(n);
            for d in 0..n {
                let r1 = if coefficients.c1[d] == c1_max { uniform(rng, -1.0, 1.0) } else { rng.random::<f64>() };
                let r2 = rng.random::<f64>();
                p.v[d] = coefficients.w[d] * p.v[d]
                    + coefficients.c1[d] * r1 * (p.pbest[d] - p.x[d])
                    + coefficients.c2[d] * r2 * (memory.pbest[gbest][d] - p.x[d]);
                next[d] = p.x[d] + p.v[d];
                let mut attempts = 0;
                while !limits.contains(d, next[d]) && attempts < SHRINK_ATTEMPTS {
                    p.v[d] *= 0.9 * rng.random::<f64>();
                    next[d] = p.x[d] + p.v[d];
                    attempts += 1;
                }
                next[d] = limits.clamp_position(d, next[d]);
            }

            let stuck = p.previous.as_ref().is_some_and(|(last_x, last_fx)| {
                (last_fx - p.fx).abs() <= STUCK_FITNESS
                    && (last_x - &p.x).mapv(|v| v * v).sum().sqrt() <= STUCK_DISTANCE
            });
            if stuck {
                for d in 0..n {
                    next[d] = uniform(rng, limits.lower[d], limits.upper[d]);
                }
                trace!("asd-pso: particle {} stuck, re-sampled", i);
            }

            let last = std::mem::replace(&mut p.x, next);
            p.previous = Some((last, p.fx));
            state.evaluate_particle(i);
        }

        let before = state.swarm.best;
        if state.refresh_best() != before {
            self.perturb_new_best(state);
            state.refresh_best();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Problem;
    use crate::particle::Particle;
    use crate::PsoConfig;
    use ndarray::array;

    fn flat(_: &Array1<f64>) -> f64 {
        0.0
    }

    #[test]
    fn test_stuck_particle_is_resampled_only_with_history() {
        let problem = Problem::new(flat, &[(-5.0, 5.0); 2]).unwrap();
        // both particles rest on the leader, so the move leaves them in place
        let fresh = Particle::at_rest(array![1.0, 1.0], 0.0);
        let mut stuck = Particle::at_rest(array![1.0, 1.0], 0.0);
        stuck.previous = Some((array![1.0, 1.0], 0.0));
        let config = PsoConfig {
            popsize: 2,
            seed: Some(17),
            initial_swarm: Some(vec![fresh, stuck]),
            ..PsoConfig::default()
        };
        let mut state = SearchState::new(&problem, &config, 0.2, false).unwrap();
        let mut asd = Asdpso::new(AsdpsoParams::default());
        asd.step(&mut state);

        let particles = &state.swarm.particles;
        assert_eq!(state.swarm.best, 0);
        // no previous sample: never counted as stuck
        assert_eq!(particles[0].x, array![1.0, 1.0]);
        // zero delta against the previous sample: re-sampled inside the box
        assert_ne!(particles[1].x, array![1.0, 1.0]);
        assert!(particles[1].x.iter().all(|v| (-5.0..=5.0).contains(v)));
        for p in particles {
            assert_eq!(p.previous, Some((array![1.0, 1.0], 0.0)));
        }
        assert_eq!(state.budget.count(), 2);
    }

    #[test]
    fn test_shape_piecewise() {
        let params = AsdpsoParams::default();
        let (w, c1, c2) = params.shape(0.0, 3.0);
        assert_eq!((w, c1, c2), (0.4, 0.0, 3.0));
        let (w, c1, c2) = params.shape(3.0, 3.0);
        assert!((w - 0.9).abs() < 1e-12);
        assert_eq!(c1, 3.0);
        assert!((c2 - 0.5).abs() < 1e-12);
        // inner third keeps c2 at its maximum; c1 grows quadratically
        let (_, c1, c2) = params.shape(0.75, 3.0);
        assert!((c1 - 4.0 * 3.0 * (0.25f64).powi(2)).abs() < 1e-12);
        assert_eq!(c2, 3.0);
    }

    #[test]
    fn test_coincident_swarm_uses_limit_coefficients() {
        let params = AsdpsoParams::default();
        assert_eq!(params.shape(0.0, 0.0), (0.4, 0.0, 3.0));
    }
}
