use crate::error::Result;
use crate::kernel::canonical_move;
use crate::particle::Coefficients;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};

/// Fixed-coefficient global-best PSO.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalParams {
    pub c1: f64,
    pub c2: f64,
    pub w: f64,
    pub vmax_fraction: f64,
}

impl Default for CanonicalParams {
    fn default() -> Self {
        Self { c1: 2.0, c2: 2.0, w: 0.9, vmax_fraction: 0.2 }
    }
}

impl CanonicalParams {
    /// Kennedy & Eberhart's original setting: no inertia damping.
    pub fn original() -> Self {
        Self { w: 1.0, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        check_non_negative("w", self.w)?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct CanonicalPso {
    params: CanonicalParams,
    name: &'static str,
}

impl CanonicalPso {
    pub fn new(params: CanonicalParams) -> Self {
        Self { params, name: "canonical" }
    }

    pub fn original(params: CanonicalParams) -> Self {
        Self { params, name: "original" }
    }
}

impl SwarmStrategy for CanonicalPso {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let c = Coefficients { w: self.params.w, c1: self.params.c1, c2: self.params.c2 };
        let gbest = state.best().pbest.clone();
        for i in 0..state.population() {
            canonical_move(&mut state.swarm.particles[i], c, gbest.view(), &state.limits, &mut state.rng);
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}
