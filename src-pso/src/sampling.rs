use rand::Rng;
use rand_distr::{Cauchy, Distribution, StandardNormal};

use crate::error::{PsoError, Result};

/// Uniform draw in `[lo, hi)`; a degenerate interval yields `lo`.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.random::<f64>()
}

/// Gaussian draw with the given mean and standard deviation.
pub(crate) fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sigma * z
}

/// Standard Cauchy sampler, shifted and scaled per draw.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CauchySampler {
    standard: Cauchy<f64>,
}

impl CauchySampler {
    pub(crate) fn new() -> Result<Self> {
        let standard = Cauchy::new(0.0, 1.0).map_err(|e| PsoError::Distribution(e.to_string()))?;
        Ok(Self { standard })
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R, location: f64, scale: f64) -> f64 {
        location + scale * self.standard.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = uniform(&mut rng, -3.0, 2.0);
            assert!((-3.0..2.0).contains(&u));
        }
        assert_eq!(uniform(&mut rng, 1.5, 1.5), 1.5);
    }

    #[test]
    fn test_cauchy_median_is_location() {
        let mut rng = StdRng::seed_from_u64(11);
        let sampler = CauchySampler::new().unwrap();
        let mut draws: Vec<f64> = (0..4001).map(|_| sampler.sample(&mut rng, 0.5, 0.1)).collect();
        draws.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((draws[2000] - 0.5).abs() < 0.02, "median {}", draws[2000]);
    }
}
