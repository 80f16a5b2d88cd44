//! Compressed sparse row storage for square matrices.

use nalgebra::DMatrix;

/// A square matrix in compressed sparse row (CSR) form.
///
/// Built from `(row, col, value)` triplets; duplicate positions are
/// summed and exact zeros are dropped, so [`nnz()`](Self::nnz) counts
/// only structurally meaningful entries. Column indices within a row
/// are sorted.
///
/// # Examples
///
/// ```
/// use gapflow_generator::SparseMatrix;
///
/// let m = SparseMatrix::from_triplets(2, vec![(0, 0, 1.0), (0, 0, 1.0), (1, 0, -3.0)]);
/// assert_eq!(m.get(0, 0), 2.0);
/// assert_eq!(m.get(1, 1), 0.0);
/// assert_eq!(m.nnz(), 2);
///
/// let mut y = [0.0; 2];
/// m.mul_vec(&[1.0, 5.0], &mut y);
/// assert_eq!(y, [2.0, -3.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl SparseMatrix {
    /// Assemble an `n × n` matrix from unordered triplets.
    ///
    /// # Panics
    ///
    /// Panics if a row or column index is `>= n`.
    pub fn from_triplets(n: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        for &(i, j, _) in &triplets {
            assert!(i < n && j < n, "triplet ({i}, {j}) out of range for n={n}");
        }
        triplets.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row_ptr = vec![0usize; n + 1];
        let mut col_idx = Vec::with_capacity(triplets.len());
        let mut values = Vec::with_capacity(triplets.len());
        let mut rows = Vec::with_capacity(triplets.len());

        let mut iter = triplets.into_iter().peekable();
        while let Some((i, j, mut v)) = iter.next() {
            while let Some(&(ni, nj, nv)) = iter.peek() {
                if ni != i || nj != j {
                    break;
                }
                v += nv;
                iter.next();
            }
            if v != 0.0 {
                rows.push(i);
                col_idx.push(j);
                values.push(v);
            }
        }

        for &i in &rows {
            row_ptr[i + 1] += 1;
        }
        for i in 0..n {
            row_ptr[i + 1] += row_ptr[i];
        }

        Self {
            n,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored entries of row `i` as `(col, value)` pairs, ascending by column.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Entry `(i, j)`; zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        match self.col_idx[range.clone()].binary_search(&j) {
            Ok(k) => self.values[range.start + k],
            Err(_) => 0.0,
        }
    }

    /// `y = A·x`.
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.n);
        debug_assert_eq!(y.len(), self.n);
        for (i, yi) in y.iter_mut().enumerate() {
            let mut acc = 0.0;
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                acc += self.values[k] * x[self.col_idx[k]];
            }
            *yi = acc;
        }
    }

    /// Diagonal entries.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.get(i, i)).collect()
    }

    /// Signed column sums.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n];
        for (k, &j) in self.col_idx.iter().enumerate() {
            sums[j] += self.values[k];
        }
        sums
    }

    /// Maximum absolute column sum of `A - shift·I`.
    pub fn shifted_one_norm(&self, shift: f64) -> f64 {
        let mut sums = vec![0.0; self.n];
        let mut has_diag = vec![false; self.n];
        for i in 0..self.n {
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                let j = self.col_idx[k];
                if i == j {
                    sums[j] += (self.values[k] - shift).abs();
                    has_diag[j] = true;
                } else {
                    sums[j] += self.values[k].abs();
                }
            }
        }
        for (s, seen) in sums.iter_mut().zip(&has_diag) {
            if !seen {
                *s += shift.abs();
            }
        }
        sums.into_iter().fold(0.0, f64::max)
    }

    /// Copy into a dense nalgebra matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.n, self.n);
        for i in 0..self.n {
            for (j, v) in self.row(i) {
                m[(i, j)] = v;
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn duplicates_are_summed_and_zeros_dropped() {
        let m = SparseMatrix::from_triplets(
            3,
            vec![(2, 1, 1.0), (0, 0, 2.0), (2, 1, -1.0), (1, 2, 4.0), (0, 0, 3.0)],
        );
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(0, 0), 5.0);
        assert_eq!(m.get(1, 2), 4.0);
        assert_eq!(m.get(2, 1), 0.0);
    }

    #[test]
    fn empty_rows_are_valid() {
        let m = SparseMatrix::from_triplets(4, vec![(3, 0, 1.0)]);
        assert_eq!(m.row(0).count(), 0);
        assert_eq!(m.row(3).collect::<Vec<_>>(), vec![(0, 1.0)]);
        let mut y = [9.0; 4];
        m.mul_vec(&[2.0, 0.0, 0.0, 0.0], &mut y);
        assert_eq!(y, [0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn shifted_norm_accounts_for_missing_diagonal() {
        // [[-2, 0], [2, 0]]: column 1 has no stored diagonal.
        let m = SparseMatrix::from_triplets(2, vec![(0, 0, -2.0), (1, 0, 2.0)]);
        assert_eq!(m.shifted_one_norm(0.0), 4.0);
        // Shift by -2: column 0 -> |0| + 2 = 2, column 1 -> |0 + 2| = 2.
        assert_eq!(m.shifted_one_norm(-2.0), 2.0);
        assert_eq!(m.column_sums(), vec![0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn mul_vec_matches_dense(
            entries in prop::collection::vec((0usize..6, 0usize..6, -5.0f64..5.0), 0..30),
            x in prop::collection::vec(-3.0f64..3.0, 6),
        ) {
            let m = SparseMatrix::from_triplets(6, entries);
            let dense = m.to_dense();
            let mut y = vec![0.0; 6];
            m.mul_vec(&x, &mut y);
            let expected = &dense * nalgebra::DVector::from_vec(x.clone());
            for i in 0..6 {
                prop_assert!((y[i] - expected[i]).abs() < 1e-9);
            }
        }
    }
}
