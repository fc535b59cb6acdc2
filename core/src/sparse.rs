use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sparse term-weight vector in the wire shape accepted by hybrid vector
/// indexes: parallel `indices`/`values` arrays of equal length. Indices are
/// unique and sorted ascending; values are non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Build from (index, weight) pairs. Pairs are sorted by index so the
    /// output is deterministic regardless of input order.
    pub fn from_weights(weights: impl IntoIterator<Item = (u32, f32)>) -> Self {
        let mut pairs: Vec<(u32, f32)> = weights.into_iter().collect();
        pairs.sort_by_key(|&(i, _)| i);
        let mut indices = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            indices.push(i);
            values.push(v);
        }
        Self { indices, values }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product by merge-join over the sorted index arrays.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_weights_sorts_by_index() {
        let v = SparseVector::from_weights(vec![(7, 0.5), (2, 1.0), (4, 0.25)]);
        assert_eq!(v.indices, vec![2, 4, 7]);
        assert_eq!(v.values, vec![1.0, 0.25, 0.5]);
    }

    #[test]
    fn dot_matches_only_shared_indices() {
        let a = SparseVector::from_weights(vec![(1, 2.0), (3, 1.0)]);
        let b = SparseVector::from_weights(vec![(3, 4.0), (5, 1.0)]);
        assert_eq!(a.dot(&b), 4.0);
    }

    #[test]
    fn serializes_as_parallel_arrays() {
        let v = SparseVector::from_weights(vec![(0, 1.5)]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["indices"][0], 0);
        assert_eq!(json["values"][0], 1.5);
    }
}
