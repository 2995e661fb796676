use rand::Rng;

use crate::error::Result;
use crate::sampling::uniform;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_probability, SwarmStrategy};

/// Velocity-less extraordinary PSO: each particle either steps toward one
/// of the top-ranked personal bests or is re-sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsoParams {
    /// Share of the swarm, by rank, that can serve as a target.
    pub alpha: f64,
    /// Step fraction toward the target.
    pub c: f64,
}

impl Default for EpsoParams {
    fn default() -> Self {
        Self { alpha: 0.8, c: 0.3 }
    }
}

impl EpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_probability("alpha", self.alpha)?;
        check_non_negative("c", self.c)
    }
}

pub struct Epso {
    params: EpsoParams,
}

impl Epso {
    pub fn new(params: EpsoParams) -> Self {
        Self { params }
    }
}

impl SwarmStrategy for Epso {
    fn name(&self) -> &'static str {
        "epso"
    }

    fn random_velocity(&self) -> bool {
        false
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let n = state.population();
        let ranking = state.swarm.ranking(state.direction());
        let top = (self.params.alpha * n as f64).round() as usize;
        let memory = state.swarm.memory();
        for i in 0..n {
            let idx = (state.rng.random::<f64>() * n as f64).round() as usize;
            let p = &mut state.swarm.particles[i];
            if idx < top {
                let target = &memory.pbest[ranking[idx]];
                for d in 0..p.dimension() {
                    let x = p.x[d] + self.params.c * (target[d] - p.x[d]);
                    p.x[d] = state.limits.clamp_position(d, x);
                }
            } else {
                for d in 0..p.dimension() {
                    p.x[d] = uniform(&mut state.rng, state.limits.lower[d], state.limits.upper[d]);
                }
            }
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}
