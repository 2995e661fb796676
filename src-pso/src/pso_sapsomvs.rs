//! Self-adaptive PSO with multiple velocity strategies.
//!
//! Each particle carries its own `(w, c1, c2)`. After every generation the
//! coefficients are resampled from Cauchy distributions centred on the
//! fitness-weighted swarm average. The acceleration draws themselves come
//! either from the uniform distribution or from one of two Cauchy families
//! whose centres shrink over the run.

use log::trace;
use rand::Rng;

use crate::error::Result;
use crate::particle::Coefficients;
use crate::sampling::{uniform, CauchySampler};
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, check_probability, SwarmStrategy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SapsomvsParams {
    pub initial: Coefficients,
    /// Cauchy scales used when resampling `w`, `c1`, `c2`.
    pub scale_w: f64,
    pub scale_c1: f64,
    pub scale_c2: f64,
    /// Probability of drawing the accelerations from a Cauchy family.
    pub selection_probability: f64,
    /// Probability that an out-of-range coordinate is clamped rather than re-sampled.
    pub clamp_probability: f64,
    pub vmax_fraction: f64,
}

impl Default for SapsomvsParams {
    fn default() -> Self {
        Self {
            initial: Coefficients { w: 0.9, c1: 2.0, c2: 2.0 },
            scale_w: 0.2,
            scale_c1: 0.3,
            scale_c2: 0.3,
            selection_probability: 0.8,
            clamp_probability: 0.7,
            vmax_fraction: 0.2,
        }
    }
}

impl SapsomvsParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("w", self.initial.w)?;
        check_non_negative("c1", self.initial.c1)?;
        check_non_negative("c2", self.initial.c2)?;
        check_positive("scale_w", self.scale_w)?;
        check_positive("scale_c1", self.scale_c1)?;
        check_positive("scale_c2", self.scale_c2)?;
        check_probability("selection_probability", self.selection_probability)?;
        check_probability("clamp_probability", self.clamp_probability)?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

/// Out-of-range fallbacks for resampled coefficients.
fn repair_inertia<R: Rng + ?Sized>(w: f64, rng: &mut R) -> f64 {
    if w > 1.0 {
        uniform(rng, 0.0, 1.0)
    } else if w < 0.0 {
        uniform(rng, 0.0, 0.1)
    } else {
        w
    }
}

fn repair_acceleration<R: Rng + ?Sized>(c: f64, rng: &mut R) -> f64 {
    if c > 4.0 {
        uniform(rng, 0.0, 4.0)
    } else if c < 0.0 {
        uniform(rng, 0.0, 1.0)
    } else {
        c
    }
}

pub struct Sapsomvs {
    params: SapsomvsParams,
    cauchy: Option<CauchySampler>,
}

impl Sapsomvs {
    pub fn new(params: SapsomvsParams) -> Self {
        Self { params, cauchy: None }
    }

    /// Resample every particle's coefficients around the weighted mean.
    /// Skipped when all current fitness values are equal.
    fn update_coefficients(&self, cauchy: &CauchySampler, state: &mut SearchState<'_>) {
        let direction = state.direction();
        let Some(worst) = state.swarm.particles.iter().map(|p| p.fx).reduce(|a, b| direction.worst_of(a, b)) else {
            return;
        };
        let weights: Vec<f64> = state.swarm.particles.iter().map(|p| (p.fx - worst).abs()).collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            trace!("sapso-mvs: degenerate fitness weights, coefficients kept");
            return;
        }
        let initial = self.params.initial;
        let mut mean = Coefficients { w: 0.0, c1: 0.0, c2: 0.0 };
        for (p, weight) in state.swarm.particles.iter().zip(&weights) {
            let c = p.coefficients.unwrap_or(initial);
            mean.w += weight / total * c.w;
            mean.c1 += weight / total * c.c1;
            mean.c2 += weight / total * c.c2;
        }
        for p in state.swarm.particles.iter_mut() {
            let rng = &mut state.rng;
            let w = cauchy.sample(rng, mean.w, self.params.scale_w);
            let c1 = cauchy.sample(rng, mean.c1, self.params.scale_c1);
            let c2 = cauchy.sample(rng, mean.c2, self.params.scale_c2);
            p.coefficients = Some(Coefficients {
                w: repair_inertia(w, rng),
                c1: repair_acceleration(c1, rng),
                c2: repair_acceleration(c2, rng),
            });
        }
        trace!("sapso-mvs: mean w={:.3} c1={:.3} c2={:.3}", mean.w, mean.c1, mean.c2);
    }
}

impl SwarmStrategy for Sapsomvs {
    fn name(&self) -> &'static str {
        "sapso-mvs"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        let cauchy = CauchySampler::new()?;
        for p in state.swarm.particles.iter_mut() {
            p.coefficients = Some(self.params.initial);
        }
        self.update_coefficients(&cauchy, state);
        self.cauchy = Some(cauchy);
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let Some(cauchy) = self.cauchy else {
            return;
        };
        let t = state.progress();
        let families = [(0.1 * (1.0 - t * t) + 0.3, 0.1), (0.4 * (1.0 - t * t) + 0.2, 0.4)];
        let gbest = state.best().pbest.clone();
        let initial = self.params.initial;
        for i in 0..state.population() {
            let rng = &mut state.rng;
            let limits = &state.limits;
            let p = &mut state.swarm.particles[i];
            let c = p.coefficients.unwrap_or(initial);
            let cauchy_pair = if rng.random::<f64>() < self.params.selection_probability {
                let (location, scale) = families[usize::from(rng.random::<f64>() < 0.5)];
                Some((cauchy.sample(rng, location, scale), cauchy.sample(rng, location, scale)))
            } else {
                None
            };
            for d in 0..p.dimension() {
                let (r1, r2) = match cauchy_pair {
                    Some(pair) => pair,
                    None => (rng.random::<f64>(), rng.random::<f64>()),
                };
                let v = c.w * p.v[d] + c.c1 * r1 * (p.pbest[d] - p.x[d]) + c.c2 * r2 * (gbest[d] - p.x[d]);
                p.v[d] = limits.clamp_velocity(d, v);
                let x = p.x[d] + p.v[d];
                p.x[d] = if limits.contains(d, x) {
                    x
                } else if rng.random::<f64>() < self.params.clamp_probability {
                    limits.clamp_position(d, x)
                } else {
                    uniform(rng, limits.lower[d], limits.upper[d])
                };
            }
            state.evaluate_particle(i);
        }
        self.update_coefficients(&cauchy, state);
        state.refresh_best();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_repairs_keep_coefficients_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for raw in [-3.0, -0.1, 0.0, 0.5, 1.0, 1.7, 25.0] {
            let w = repair_inertia(raw, &mut rng);
            assert!((0.0..=1.0).contains(&w));
            let c = repair_acceleration(raw * 4.0, &mut rng);
            assert!((0.0..=4.0).contains(&c));
        }
    }
}
