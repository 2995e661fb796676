use crate::error::Result;
use crate::inertia::Inertia;
use crate::kernel::{canonical_move, drift};
use crate::particle::Coefficients;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};

/// Relaxed-velocity-update PSO: a particle keeps its velocity while moving
/// along it does not make things worse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RvupsoParams {
    pub c1: f64,
    pub c2: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub vmax_fraction: f64,
}

impl Default for RvupsoParams {
    fn default() -> Self {
        Self { c1: 2.0, c2: 2.0, w_min: 0.4, w_max: 0.9, vmax_fraction: 1.0 }
    }
}

impl RvupsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct Rvupso {
    params: RvupsoParams,
    inertia: Inertia,
}

impl Rvupso {
    pub fn new(params: RvupsoParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia }
    }
}

impl SwarmStrategy for Rvupso {
    fn name(&self) -> &'static str {
        "rvu-pso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        for p in state.swarm.particles.iter_mut() {
            p.update_velocity = false;
        }
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let c = Coefficients { w, c1: self.params.c1, c2: self.params.c2 };
        let memory = state.swarm.memory();
        let gbest = state.swarm.best;
        let direction = state.direction();
        for i in 0..state.population() {
            let p = &mut state.swarm.particles[i];
            let before = p.fx;
            if p.update_velocity {
                canonical_move(p, c, memory.pbest[gbest].view(), &state.limits, &mut state.rng);
            } else {
                drift(p, &state.limits);
            }
            state.evaluate_particle(i);
            let p = &mut state.swarm.particles[i];
            p.update_velocity = direction.fitter(before, p.fx);
        }
        state.refresh_best();
    }
}
