use ndarray::Array1;
use rand::Rng;

use crate::error::Result;
use crate::inertia::Inertia;
use crate::objective::Direction;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};
use crate::swarm::Memory;

/// Fitness-distance-ratio PSO: the canonical terms plus a third pull, per
/// dimension, toward the personal best with the best fitness gain per unit
/// distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FdrpsoParams {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub vmax_fraction: f64,
}

impl Default for FdrpsoParams {
    fn default() -> Self {
        Self { c1: 1.0, c2: 1.0, c3: 2.0, w_min: 0.4, w_max: 0.9, vmax_fraction: 0.2 }
    }
}

impl FdrpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        check_non_negative("c3", self.c3)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

/// Index whose personal best maximises the fitness-distance ratio for
/// dimension `d` of a particle at `x` with fitness `fx`.
///
/// Candidates at zero distance in `d` are skipped. The particle follows
/// itself unless a candidate beats its own ratio, counted as zero when the
/// particle sits on its memory.
pub(crate) fn fdr_neighbour(i: usize, d: usize, x: &Array1<f64>, fx: f64, memory: &Memory, direction: Direction) -> usize {
    let sign = direction.improvement_sign();
    let ratio = |j: usize| {
        let distance = (memory.pbest[j][d] - x[d]).abs();
        (distance > 0.0).then(|| sign * (memory.fitness[j] - fx) / distance)
    };
    let mut chosen = i;
    let mut best = ratio(i).unwrap_or(0.0);
    for j in (0..memory.len()).filter(|&j| j != i) {
        if let Some(r) = ratio(j) {
            if r > best {
                chosen = j;
                best = r;
            }
        }
    }
    chosen
}

pub struct Fdrpso {
    params: FdrpsoParams,
    inertia: Inertia,
}

impl Fdrpso {
    pub fn new(params: FdrpsoParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia }
    }
}

impl SwarmStrategy for Fdrpso {
    fn name(&self) -> &'static str {
        "fdr-pso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let FdrpsoParams { c1, c2, c3, .. } = self.params;
        let memory = state.swarm.memory();
        let direction = state.direction();
        let gbest = state.swarm.best;
        for i in 0..state.population() {
            let p = &mut state.swarm.particles[i];
            for d in 0..p.dimension() {
                let nbest = fdr_neighbour(i, d, &p.x, p.fx, &memory, direction);
                let r1 = state.rng.random::<f64>();
                let r2 = state.rng.random::<f64>();
                let r3 = state.rng.random::<f64>();
                let v = w * p.v[d]
                    + c1 * r1 * (p.pbest[d] - p.x[d])
                    + c2 * r2 * (memory.pbest[gbest][d] - p.x[d])
                    + c3 * r3 * (memory.pbest[nbest][d] - p.x[d]);
                p.v[d] = state.limits.clamp_velocity(d, v);
                p.x[d] = state.limits.clamp_position(d, p.x[d] + p.v[d]);
            }
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_distance_falls_back_to_self() {
        let memory = Memory { pbest: vec![array![1.0], array![1.0]], fitness: vec![3.0, 0.5] };
        assert_eq!(fdr_neighbour(0, 0, &array![1.0], 3.0, &memory, Direction::Minimize), 0);
    }

    #[test]
    fn test_prefers_best_gain_per_distance() {
        let memory = Memory {
            pbest: vec![array![0.0], array![1.0], array![4.0]],
            fitness: vec![5.0, 4.0, 0.0],
        };
        // gains from x=0, fx=5: particle 1 -> 1/1, particle 2 -> 5/4
        assert_eq!(fdr_neighbour(0, 0, &array![0.0], 5.0, &memory, Direction::Minimize), 2);
        // maximising flips the sign: every neighbour is a loss, so none beats self
        assert_eq!(fdr_neighbour(0, 0, &array![0.0], 5.0, &memory, Direction::Maximize), 0);
    }

    #[test]
    fn test_worse_neighbour_never_beats_self_on_memory() {
        // particle 0 sits on its own memory, so its ratio is undefined
        let memory = Memory { pbest: vec![array![0.0], array![1.0]], fitness: vec![1.0, 5.0] };
        assert_eq!(fdr_neighbour(0, 0, &array![0.0], 1.0, &memory, Direction::Minimize), 0);
        // a fitter neighbour still wins
        let memory = Memory { pbest: vec![array![0.0], array![1.0]], fitness: vec![1.0, 0.5] };
        assert_eq!(fdr_neighbour(0, 0, &array![0.0], 1.0, &memory, Direction::Minimize), 1);
    }
}
