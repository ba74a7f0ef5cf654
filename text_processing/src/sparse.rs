// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SparseError {
    #[error("Expected a vector of dimension {expected} but got {actual}!")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("The index {index} is out of bounds for dimension {dim}!")]
    IndexOutOfBounds { index: u32, dim: usize },
}

/// A sparse vector with a fixed dimension.
/// The indices are strictly increasing and every stored value is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVector {
    /// A vector without any non-zero entry.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a vector from `(index, value)` pairs in any order.
    /// Zeros are dropped, duplicated indices are summed up.
    pub fn from_entries<I: IntoIterator<Item=(u32, f64)>>(dim: usize, entries: I) -> Result<Self, SparseError> {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        let entries = entries
            .into_iter()
            .sorted_by_key(|(index, _)| *index)
            .coalesce(|a, b| if a.0 == b.0 { Ok((a.0, a.1 + b.1)) } else { Err((a, b)) });
        for (index, value) in entries {
            if index as usize >= dim {
                return Err(SparseError::IndexOutOfBounds { index, dim });
            }
            if value != 0.0 {
                indices.push(index);
                values.push(value);
            }
        }
        Ok(Self { dim, indices, values })
    }

    /// Creates a sparse vector from a dense one.
    pub fn from_dense(dense: &[f64]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0.0)
            .map(|(index, value)| (index as u32, *value))
            .unzip();
        Self { dim: dense.len(), indices, values }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// True if there is no non-zero entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The value at [index], zero if it is not stored.
    pub fn get(&self, index: u32) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(position) => self.values[position],
            Err(_) => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item=(u32, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (index, value) in self.iter() {
            dense[index as usize] = value;
        }
        dense
    }
}

/// A row major collection of [SparseVector]s with the same dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    n_cols: usize,
    rows: Vec<SparseVector>,
}

impl SparseMatrix {
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: SparseVector) -> Result<(), SparseError> {
        if row.dim() != self.n_cols {
            return Err(SparseError::DimensionMismatch { expected: self.n_cols, actual: row.dim() });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// The total number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }

    /// Copies the rows at [indices] into a new matrix.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            n_cols: self.n_cols,
            rows: indices.iter().filter_map(|index| self.rows.get(*index).cloned()).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{SparseError, SparseMatrix, SparseVector};

    #[test]
    fn builds_sorted_vectors() {
        let vector = SparseVector::from_entries(5, [(3, 1.5), (0, 2.0), (3, 0.5), (1, 0.0)]).unwrap();
        assert_eq!(&[0, 3], vector.indices());
        assert_eq!(&[2.0, 2.0], vector.values());
        assert_eq!(2, vector.nnz());
        assert_eq!(2.0, vector.get(3));
        assert_eq!(0.0, vector.get(1));
        assert_eq!(vec![2.0, 0.0, 0.0, 2.0, 0.0], vector.to_dense());
        assert_eq!(vector, SparseVector::from_dense(&vector.to_dense()));
        assert_eq!(
            Err(SparseError::IndexOutOfBounds { index: 5, dim: 5 }),
            SparseVector::from_entries(5, [(5, 1.0)])
        );
    }

    #[test]
    fn zeros_are_empty() {
        let vector = SparseVector::zeros(10);
        assert!(vector.is_empty());
        assert_eq!(10, vector.dim());
        assert_eq!(0.0, vector.get(4));
    }

    #[test]
    fn matrix_checks_dimensions() {
        let mut matrix = SparseMatrix::new(3);
        matrix.push(SparseVector::from_dense(&[1.0, 0.0, 0.0])).unwrap();
        matrix.push(SparseVector::zeros(3)).unwrap();
        matrix.push(SparseVector::from_dense(&[0.0, 4.0, 2.0])).unwrap();
        assert_eq!(
            Err(SparseError::DimensionMismatch { expected: 3, actual: 2 }),
            matrix.push(SparseVector::zeros(2))
        );
        assert_eq!(3, matrix.n_rows());
        assert_eq!(3, matrix.nnz());

        let selected = matrix.select(&[2, 0]);
        assert_eq!(2, selected.n_rows());
        assert_eq!(Some(&SparseVector::from_dense(&[0.0, 4.0, 2.0])), selected.row(0));
    }
}
