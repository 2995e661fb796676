use log::trace;
use rand::Rng;

use crate::error::Result;
use crate::inertia::Inertia;
use crate::kernel::canonical_move;
use crate::particle::Coefficients;
use crate::sampling::gaussian;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};

/// Adaptive-inertia PSO: the weight tracks the share of particles that
/// improved last generation, and the worst memory is replaced by a mutated
/// copy of the best when that is fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiwpsoParams {
    pub c1: f64,
    pub c2: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub vmax_fraction: f64,
}

impl Default for AiwpsoParams {
    fn default() -> Self {
        Self { c1: 1.49445, c2: 1.49445, w_min: 0.0, w_max: 1.0, vmax_fraction: 0.2 }
    }
}

impl AiwpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        Inertia::SuccessRate { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct Aiwpso {
    params: AiwpsoParams,
    inertia: Inertia,
    w: f64,
}

impl Aiwpso {
    pub fn new(params: AiwpsoParams) -> Self {
        let inertia = Inertia::SuccessRate { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia, w: inertia.initial() }
    }

    pub fn inertia_weight(&self) -> f64 {
        self.w
    }

    /// Perturb one coordinate of the best memory; the step shrinks as the run progresses.
    fn mutate_worst(&self, state: &mut SearchState<'_>) {
        let direction = state.direction();
        let worst = state.swarm.worst(direction);
        let mut mutant = state.best().pbest.clone();
        let n = state.dimension();
        let d = state.rng.random_range(0..n);
        let sigma = (1.0 - state.progress()) * state.limits.span(d);
        mutant[d] = state.limits.clamp_position(d, gaussian(&mut state.rng, mutant[d], sigma));
        let f = state.evaluate(&mutant);
        if state.swarm.particles[worst].offer_memory(&mutant, f, direction) {
            trace!("aiwpso: mutant {:.6e} replaces memory of particle {}", f, worst);
        }
    }
}

impl SwarmStrategy for Aiwpso {
    fn name(&self) -> &'static str {
        "aiwpso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let c = Coefficients { w: self.w, c1: self.params.c1, c2: self.params.c2 };
        let gbest = state.best().pbest.clone();
        let mut successes = 0usize;
        for i in 0..state.population() {
            canonical_move(&mut state.swarm.particles[i], c, gbest.view(), &state.limits, &mut state.rng);
            if state.evaluate_particle(i) {
                successes += 1;
            }
        }
        state.refresh_best();
        self.w = self.inertia.update(state.progress(), successes as f64 / state.population() as f64);
        self.mutate_worst(state);
        state.refresh_best();
    }
}
