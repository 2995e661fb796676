use log::debug;
use ndarray::Array1;

use crate::distinct_indices::distinct_indices;
use crate::error::Result;
use crate::inertia::Inertia;
use crate::kernel::learning_move;
use crate::orthogonal::OrthogonalArray;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};

/// Orthogonal-learning PSO.
///
/// Each particle learns, per dimension, from either its own personal best
/// or an exemplar's. The per-dimension choice comes from an orthogonal
/// experiment over the two candidates and is rebuilt when the particle
/// stagnates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlpsoParams {
    pub c: f64,
    pub w_min: f64,
    pub w_max: f64,
    /// Rebuild the guide once stagnation exceeds this many generations.
    pub stagnation_limit: usize,
    pub vmax_fraction: f64,
}

impl Default for OlpsoParams {
    fn default() -> Self {
        Self { c: 2.0, w_min: 0.4, w_max: 0.9, stagnation_limit: 5, vmax_fraction: 0.2 }
    }
}

impl OlpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c", self.c)?;
        Inertia::LinearDecay { w_min: self.w_min, w_max: self.w_max }.validate()?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct Olpso {
    params: OlpsoParams,
    inertia: Inertia,
    array: Option<OrthogonalArray>,
}

impl Olpso {
    pub fn new(params: OlpsoParams) -> Self {
        let inertia = Inertia::LinearDecay { w_min: params.w_min, w_max: params.w_max };
        Self { params, inertia, array: None }
    }

    /// Rebuild the per-dimension guide of particle `i`.
    ///
    /// Costs one evaluation per array row plus one for the main-effect
    /// vector. The fittest of those constructions becomes the guide.
    fn construct_guidance(&self, state: &mut SearchState<'_>, oa: &OrthogonalArray, i: usize) {
        let n = state.dimension();
        let exemplar = if state.swarm.best != i {
            state.swarm.best
        } else {
            distinct_indices(i, 1, state.population(), &mut state.rng)
                .first()
                .copied()
                .unwrap_or(i)
        };
        let own = state.swarm.particles[i].pbest.clone();
        let other = state.swarm.particles[exemplar].pbest.clone();

        let mut trial_fitness = Vec::with_capacity(oa.rows());
        let mut best_row = 0;
        for row in 0..oa.rows() {
            let trial = Array1::from_shape_fn(n, |d| if oa.level(row, d) == 1 { own[d] } else { other[d] });
            let f = state.evaluate(&trial);
            if row > 0 && state.fitter(f, trial_fitness[best_row]) {
                best_row = row;
            }
            trial_fitness.push(f);
        }

        let mean = |rows: &[usize]| rows.iter().map(|&r| trial_fitness[r]).sum::<f64>() / rows.len().max(1) as f64;
        let mut guide = vec![i; n];
        let mut main_effect = Array1::zeros(n);
        for d in 0..n {
            if state.fitter(mean(oa.level_one(d)), mean(oa.level_two(d))) {
                main_effect[d] = own[d];
            } else {
                main_effect[d] = other[d];
                guide[d] = exemplar;
            }
        }
        let f_main = state.evaluate(&main_effect);
        if state.fitter(trial_fitness[best_row], f_main) {
            for (d, g) in guide.iter_mut().enumerate() {
                *g = if oa.level(best_row, d) == 1 { i } else { exemplar };
            }
        }
        debug!("olpso: particle {} guided by {} (row {})", i, exemplar, best_row);

        let p = &mut state.swarm.particles[i];
        p.exemplars = guide;
        p.stagnation = 0;
    }
}

impl SwarmStrategy for Olpso {
    fn name(&self) -> &'static str {
        "olpso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        2
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        let oa = OrthogonalArray::new(state.dimension());
        for i in 0..state.population() {
            self.construct_guidance(state, &oa, i);
        }
        state.refresh_best();
        self.array = Some(oa);
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let w = self.inertia.update(state.progress(), 0.0);
        let memory = state.swarm.memory();
        for i in 0..state.population() {
            let p = &mut state.swarm.particles[i];
            let exemplars = std::mem::take(&mut p.exemplars);
            learning_move(p, w, self.params.c, |d| memory.pbest[exemplars[d]][d], &state.limits, &mut state.rng);
            p.exemplars = exemplars;
            p.stagnation += 1;
            if state.evaluate_particle(i) {
                state.swarm.particles[i].stagnation = 0;
            }
        }
        state.refresh_best();

        if let Some(oa) = self.array.take() {
            for i in 0..state.population() {
                if state.swarm.particles[i].stagnation > self.params.stagnation_limit {
                    self.construct_guidance(state, &oa, i);
                }
            }
            self.array = Some(oa);
        }
        state.refresh_best();
    }
}
