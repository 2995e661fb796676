use rand::Rng;

use crate::error::Result;
use crate::sampling::gaussian;
use crate::state::SearchState;
use crate::strategy::{check_probability, SwarmStrategy};

/// Bare-bones PSO: positions are sampled, there is no velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BareBonesParams {
    /// Probability that a dimension is drawn from the Gaussian rather than
    /// copied from the personal best.
    pub interaction_probability: f64,
}

impl Default for BareBonesParams {
    fn default() -> Self {
        Self { interaction_probability: 0.5 }
    }
}

impl BareBonesParams {
    pub fn validate(&self) -> Result<()> {
        check_probability("interaction_probability", self.interaction_probability)
    }
}

pub struct BareBonesPso {
    params: BareBonesParams,
}

impl BareBonesPso {
    pub fn new(params: BareBonesParams) -> Self {
        Self { params }
    }
}

impl SwarmStrategy for BareBonesPso {
    fn name(&self) -> &'static str {
        "bare-bones"
    }

    fn random_velocity(&self) -> bool {
        false
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let gbest = state.best().pbest.clone();
        for i in 0..state.population() {
            let p = &mut state.swarm.particles[i];
            for d in 0..p.dimension() {
                let x = if state.rng.random::<f64>() < self.params.interaction_probability {
                    let mean = 0.5 * (p.pbest[d] + gbest[d]);
                    let sigma = (p.pbest[d] - gbest[d]).abs();
                    gaussian(&mut state.rng, mean, sigma)
                } else {
                    p.pbest[d]
                };
                p.x[d] = state.limits.clamp_position(d, x);
            }
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}
