use log::debug;

use crate::error::{PsoError, Result};
use crate::inertia::Inertia;
use crate::kernel::canonical_move;
use crate::particle::Coefficients;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, check_probability, SwarmStrategy};
use crate::topology::{assign_groups, local_best, random_groups};

/// Dynamic multi-swarm PSO: small sub-swarms reshuffled every few
/// generations, switching to a single global swarm near the end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmspsoParams {
    pub sub_swarm_size: usize,
    /// Generations between regroupings.
    pub regroup_period: usize,
    /// Fraction of the horizon after which all particles follow the global best.
    pub global_phase: f64,
    pub c1: f64,
    pub c2: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub vmax_fraction: f64,
}

impl Default for DmspsoParams {
    fn default() -> Self {
        Self {
            sub_swarm_size: 3,
            regroup_period: 5,
            global_phase: 0.9,
            c1: 1.49445,
            c2: 1.49445,
            w_min: 0.2,
            w_max: 0.9,
            vmax_fraction: 0.2,
        }
    }
}

impl DmspsoParams {
    pub fn validate(&self) -> Result<()> {
        if self.sub_swarm_size < 2 {
            return Err(PsoError::TopologySize {
                pop_size: self.sub_swarm_size,
                reason: "sub-swarms need at least 2 particles".into(),
            });
        }
        if self.regroup_period == 0 {
            return Err(PsoError::InvalidParameter { name: "regroup_period", value: 0.0, reason: "must be at least 1" });
        }
        check_probability("global_phase", self.global_phase)?;
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct Dmspso {
    params: DmspsoParams,
    inertia: Inertia,
    global: bool,
}

impl Dmspso {
    pub fn new(params: DmspsoParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia, global: false }
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    fn regroup(&self, state: &mut SearchState<'_>) {
        let groups = random_groups(state.population(), self.params.sub_swarm_size, &mut state.rng);
        assign_groups(&mut state.swarm, &groups);
    }
}

impl SwarmStrategy for Dmspso {
    fn name(&self) -> &'static str {
        "dms-pso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        self.params.sub_swarm_size
    }

    fn check_population(&self, pop_size: usize) -> Result<()> {
        if pop_size < self.params.sub_swarm_size || pop_size % self.params.sub_swarm_size != 0 {
            return Err(PsoError::TopologySize {
                pop_size,
                reason: format!("population must be a multiple of the sub-swarm size {}", self.params.sub_swarm_size),
            });
        }
        Ok(())
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        self.regroup(state);
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let c = Coefficients { w, c1: self.params.c1, c2: self.params.c2 };
        let memory = state.swarm.memory();
        let direction = state.direction();
        let gbest = state.swarm.best;
        for i in 0..state.population() {
            let guide = if self.global {
                gbest
            } else {
                local_best(i, &state.swarm.particles[i].neighbours, &memory, direction)
            };
            canonical_move(&mut state.swarm.particles[i], c, memory.pbest[guide].view(), &state.limits, &mut state.rng);
            state.evaluate_particle(i);
        }
        state.refresh_best();

        let next = state.generation + 1;
        if !self.global && next as f64 >= self.params.global_phase * state.max_generations as f64 {
            self.global = true;
            debug!("dms-pso: switching to global best at generation {}", next);
        } else if !self.global && next % self.params.regroup_period == 0 {
            self.regroup(state);
            debug!("dms-pso: regrouped at generation {}", next);
        }
    }
}
