use rand::Rng;

/// `count` distinct indices drawn from `0..n`, never `exclude`.
///
/// Callers validate `count < n` when the run is configured.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(exclude: usize, count: usize, n: usize, rng: &mut R) -> Vec<usize> {
    let available = n.saturating_sub(1);
    let count = count.min(available);
    rand::seq::index::sample(rng, available, count)
        .into_iter()
        .map(|k| if k >= exclude { k + 1 } else { k })
        .collect()
}
