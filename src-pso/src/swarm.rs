//! Fixed-size, index-addressed collection of particles.

use ndarray::{Array1, Array2};

use crate::objective::Direction;
use crate::particle::Particle;

/// Personal-best snapshot taken at the start of a generation.
///
/// Guide selection reads from here so no particle sees another particle's
/// update from the same generation.
#[derive(Debug, Clone)]
pub struct Memory {
    pub pbest: Vec<Array1<f64>>,
    pub fitness: Vec<f64>,
}

impl Memory {
    pub fn len(&self) -> usize {
        self.fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fitness.is_empty()
    }

    /// Index of the fittest entry among `candidates`.
    pub fn fittest(&self, candidates: impl IntoIterator<Item = usize>, direction: Direction) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in candidates {
            match best {
                Some(b) if !direction.fitter(self.fitness[i], self.fitness[b]) => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

/// The swarm owns its particles; `best` indexes the particle with the
/// fittest personal best as of the last [`Swarm::refresh_best`].
#[derive(Debug, Clone)]
pub struct Swarm {
    pub particles: Vec<Particle>,
    pub best: usize,
}

impl Swarm {
    pub fn new(particles: Vec<Particle>, direction: Direction) -> Self {
        let mut swarm = Self { particles, best: 0 };
        swarm.refresh_best(direction);
        swarm
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Full scan for the fittest personal best; ties go to the lowest index.
    pub fn refresh_best(&mut self, direction: Direction) -> usize {
        let mut best = 0;
        for (i, p) in self.particles.iter().enumerate().skip(1) {
            if direction.fitter(p.fpbest, self.particles[best].fpbest) {
                best = i;
            }
        }
        self.best = best;
        best
    }

    /// Index of the least fit personal best; ties go to the lowest index.
    pub fn worst(&self, direction: Direction) -> usize {
        let mut worst = 0;
        for (i, p) in self.particles.iter().enumerate().skip(1) {
            if direction.fitter(self.particles[worst].fpbest, p.fpbest) {
                worst = i;
            }
        }
        worst
    }

    pub fn best_particle(&self) -> &Particle {
        &self.particles[self.best]
    }

    pub fn memory(&self) -> Memory {
        Memory {
            pbest: self.particles.iter().map(|p| p.pbest.clone()).collect(),
            fitness: self.particles.iter().map(|p| p.fpbest).collect(),
        }
    }

    /// Current positions as a `len x dim` matrix.
    pub fn positions(&self) -> Array2<f64> {
        let n = self.particles.first().map_or(0, |p| p.dimension());
        let mut out = Array2::zeros((self.len(), n));
        for (i, p) in self.particles.iter().enumerate() {
            out.row_mut(i).assign(&p.x);
        }
        out
    }

    /// Personal bests as a `len x dim` matrix.
    pub fn personal_bests(&self) -> Array2<f64> {
        let n = self.particles.first().map_or(0, |p| p.dimension());
        let mut out = Array2::zeros((self.len(), n));
        for (i, p) in self.particles.iter().enumerate() {
            out.row_mut(i).assign(&p.pbest);
        }
        out
    }

    pub fn personal_best_fitness(&self) -> Array1<f64> {
        self.particles.iter().map(|p| p.fpbest).collect()
    }

    /// Indices ordered by personal-best fitness, fittest first (stable).
    pub fn ranking(&self, direction: Direction) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            let (fa, fb) = (self.particles[a].fpbest, self.particles[b].fpbest);
            if direction.fitter(fa, fb) {
                std::cmp::Ordering::Less
            } else if direction.fitter(fb, fa) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn swarm_of(fitness: &[f64]) -> Swarm {
        let particles = fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| Particle::at_rest(array![i as f64], f))
            .collect();
        Swarm::new(particles, Direction::Minimize)
    }

    #[test]
    fn test_refresh_best_full_scan() {
        let mut s = swarm_of(&[3.0, 1.0, 2.0, 1.0]);
        assert_eq!(s.best, 1);
        // a stale index never survives a refresh
        s.best = 2;
        assert_eq!(s.refresh_best(Direction::Minimize), 1);
        assert_eq!(s.refresh_best(Direction::Maximize), 0);
    }

    #[test]
    fn test_worst_and_ranking() {
        let s = swarm_of(&[3.0, 1.0, 5.0, 1.0]);
        assert_eq!(s.worst(Direction::Minimize), 2);
        assert_eq!(s.ranking(Direction::Minimize), vec![1, 3, 0, 2]);
        assert_eq!(s.ranking(Direction::Maximize), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_memory_fittest() {
        let s = swarm_of(&[3.0, 1.0, 5.0, 0.5]);
        let m = s.memory();
        assert_eq!(m.fittest([0, 1, 2], Direction::Minimize), Some(1));
        assert_eq!(m.fittest([2, 0], Direction::Maximize), Some(2));
        assert_eq!(m.fittest(std::iter::empty(), Direction::Minimize), None);
        assert_eq!(s.positions().dim(), (4, 1));
    }
}
