//! Two-level orthogonal arrays for orthogonal-learning guidance.

/// Two-level orthogonal array with one column per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthogonalArray {
    /// `levels[row][col]` is 1 or 2.
    levels: Vec<Vec<u8>>,
    /// Rows at level 1 for each column.
    level_one: Vec<Vec<usize>>,
    /// Rows at level 2 for each column.
    level_two: Vec<Vec<usize>>,
}

impl OrthogonalArray {
    /// Taguchi-style array for `factors` columns with `2^ceil(log2(factors + 1))` rows.
    ///
    /// The level of row `i`, column `j` flips once for every set bit of
    /// `j + 1` whose matching bit (walking from the row's high bit down) is
    /// set in `i`.
    pub fn new(factors: usize) -> Self {
        let rows = (factors + 1).next_power_of_two();
        let mut levels = vec![vec![1u8; factors]; rows];
        for (i, row) in levels.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let mut level = 0u8;
                let mut k = j + 1;
                let mut mask = rows / 2;
                while k > 0 {
                    if k % 2 == 1 && i & mask != 0 {
                        level ^= 1;
                    }
                    k /= 2;
                    mask /= 2;
                }
                *cell = level + 1;
            }
        }
        let mut level_one = vec![Vec::new(); factors];
        let mut level_two = vec![Vec::new(); factors];
        for (i, row) in levels.iter().enumerate() {
            for (j, &l) in row.iter().enumerate() {
                if l == 1 { level_one[j].push(i) } else { level_two[j].push(i) }
            }
        }
        Self { levels, level_one, level_two }
    }

    pub fn rows(&self) -> usize {
        self.levels.len()
    }

    pub fn factors(&self) -> usize {
        self.level_one.len()
    }

    pub fn level(&self, row: usize, col: usize) -> u8 {
        self.levels[row][col]
    }

    pub fn level_one(&self, col: usize) -> &[usize] {
        &self.level_one[col]
    }

    pub fn level_two(&self, col: usize) -> &[usize] {
        &self.level_two[col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_for_five_factors() {
        let oa = OrthogonalArray::new(5);
        assert_eq!(oa.rows(), 8);
        assert_eq!(oa.factors(), 5);
        for col in 0..5 {
            let mut all: Vec<usize> = oa.level_one(col).iter().chain(oa.level_two(col)).copied().collect();
            all.sort_unstable();
            assert_eq!(all, (0..8).collect::<Vec<_>>());
            assert_eq!(oa.level_one(col).len(), 4);
            assert_eq!(oa.level_two(col).len(), 4);
        }
    }

    #[test]
    fn test_columns_are_orthogonal() {
        let oa = OrthogonalArray::new(7);
        assert_eq!(oa.rows(), 8);
        assert!((0..7).all(|c| oa.level(0, c) == 1));
        // every pair of columns sees each level combination equally often
        for a in 0..7 {
            for b in (a + 1)..7 {
                let mut counts = [[0usize; 2]; 2];
                for r in 0..8 {
                    counts[(oa.level(r, a) - 1) as usize][(oa.level(r, b) - 1) as usize] += 1;
                }
                assert_eq!(counts, [[2, 2], [2, 2]]);
            }
        }
    }

    #[test]
    fn test_single_factor() {
        let oa = OrthogonalArray::new(1);
        assert_eq!(oa.rows(), 2);
        assert_eq!(oa.level(0, 0), 1);
        assert_eq!(oa.level(1, 0), 2);
        assert_eq!(OrthogonalArray::new(8).rows(), 16);
    }
}
