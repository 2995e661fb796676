use crate::error::{PsoError, Result};
use crate::inertia::Inertia;
use crate::kernel::canonical_move;
use crate::particle::Coefficients;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};
use crate::topology::{lattice_neighbours, local_best};

/// Local-best PSO on a toroidal lattice with linearly decaying inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VonNeumannParams {
    pub rows: usize,
    pub cols: usize,
    pub c1: f64,
    pub c2: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub vmax_fraction: f64,
}

impl Default for VonNeumannParams {
    fn default() -> Self {
        Self { rows: 5, cols: 4, c1: 1.49445, c2: 1.49445, w_min: 0.4, w_max: 0.9, vmax_fraction: 0.2 }
    }
}

impl VonNeumannParams {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PsoError::TopologySize {
                pop_size: self.rows * self.cols,
                reason: "lattice needs at least one row and one column".into(),
            });
        }
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct VonNeumannPso {
    params: VonNeumannParams,
    inertia: Inertia,
}

impl VonNeumannPso {
    pub fn new(params: VonNeumannParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia }
    }
}

impl SwarmStrategy for VonNeumannPso {
    fn name(&self) -> &'static str {
        "von-neumann"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        self.params.rows * self.params.cols
    }

    fn check_population(&self, pop_size: usize) -> Result<()> {
        let cells = self.params.rows * self.params.cols;
        if pop_size != cells {
            return Err(PsoError::TopologySize {
                pop_size,
                reason: format!("a {}x{} lattice holds exactly {} particles", self.params.rows, self.params.cols, cells),
            });
        }
        Ok(())
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        for (p, n) in state.swarm.particles.iter_mut().zip(lattice_neighbours(self.params.rows, self.params.cols)) {
            p.neighbours = n;
        }
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let c = Coefficients { w, c1: self.params.c1, c2: self.params.c2 };
        let memory = state.swarm.memory();
        let direction = state.direction();
        for i in 0..state.population() {
            let lbest = local_best(i, &state.swarm.particles[i].neighbours, &memory, direction);
            canonical_move(&mut state.swarm.particles[i], c, memory.pbest[lbest].view(), &state.limits, &mut state.rng);
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}
