//! Neighbourhood construction: toroidal lattice, ring, and randomly
//! regrouped sub-swarms.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::objective::Direction;
use crate::swarm::{Memory, Swarm};

/// Von Neumann neighbours on a `rows x cols` torus, row-major, self excluded.
pub fn lattice_neighbours(rows: usize, cols: usize) -> Vec<Vec<usize>> {
    let mut all = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let me = r * cols + c;
            let mut n = vec![
                ((r + rows - 1) % rows) * cols + c,
                ((r + 1) % rows) * cols + c,
                r * cols + (c + cols - 1) % cols,
                r * cols + (c + 1) % cols,
            ];
            n.retain(|&k| k != me);
            n.sort_unstable();
            n.dedup();
            all.push(n);
        }
    }
    all
}

/// Ring neighbours of `i` within radius `k` (self excluded).
pub fn ring_neighbours(i: usize, n: usize, k: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(2 * k);
    for off in 1..=k {
        out.push((i + n - off % n) % n);
        out.push((i + off) % n);
    }
    out.retain(|&j| j != i);
    out.sort_unstable();
    out.dedup();
    out
}

/// Random partition of `0..n` into groups of `size`.
pub fn random_groups<R: Rng + ?Sized>(n: usize, size: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}

/// Make every group member a neighbour of the others.
pub fn assign_groups(swarm: &mut Swarm, groups: &[Vec<usize>]) {
    for group in groups {
        for &i in group {
            swarm.particles[i].neighbours = group.iter().copied().filter(|&j| j != i).collect();
        }
    }
}

/// Fittest personal best among `i` and its neighbours; ties keep `i`.
pub fn local_best(i: usize, neighbours: &[usize], memory: &Memory, direction: Direction) -> usize {
    memory.fittest(std::iter::once(i).chain(neighbours.iter().copied()), direction).unwrap_or(i)
}
