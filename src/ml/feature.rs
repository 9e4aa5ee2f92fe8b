//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpamlensError};

/// A sparse vector over a fixed vocabulary.
///
/// Indices are strictly increasing and always below `dimension`. Only
/// nonzero entries are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureVector")]
pub struct FeatureVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

/// Unchecked serde form of a [`FeatureVector`].
#[derive(Deserialize)]
struct RawFeatureVector {
    dimension: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl TryFrom<RawFeatureVector> for FeatureVector {
    type Error = SpamlensError;

    fn try_from(raw: RawFeatureVector) -> Result<Self> {
        if raw.indices.len() != raw.values.len() {
            return Err(SpamlensError::serialization(format!(
                "{} indices but {} values",
                raw.indices.len(),
                raw.values.len()
            )));
        }
        if let Some(&index) = raw.indices.iter().find(|&&i| i >= raw.dimension) {
            return Err(SpamlensError::DimensionMismatch {
                expected: raw.dimension,
                actual: index + 1,
            });
        }
        if raw.indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SpamlensError::serialization(
                "indices are not strictly increasing",
            ));
        }
        Ok(Self {
            dimension: raw.dimension,
            indices: raw.indices,
            values: raw.values,
        })
    }
}

impl FeatureVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs in any order.
    ///
    /// Duplicate indices are summed and zero values dropped.
    pub fn from_pairs<I>(dimension: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut pairs: Vec<(usize, f64)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(index, _)| *index);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if index >= dimension {
                return Err(SpamlensError::DimensionMismatch {
                    expected: dimension,
                    actual: index + 1,
                });
            }
            match indices.last() {
                Some(&last) if last == index => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(index);
                    values.push(value);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, value)| *value != 0.0)
            .unzip();

        Ok(Self {
            dimension,
            indices,
            values,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index`, zero when not stored.
    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with a dense weight row of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> Result<f64> {
        if dense.len() != self.dimension {
            return Err(SpamlensError::DimensionMismatch {
                expected: dense.len(),
                actual: self.dimension,
            });
        }
        Ok(self.iter().map(|(index, value)| value * dense[index]).sum())
    }

    /// Scale every entry so the vector has unit norm. Zero vectors are left
    /// unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let vector = FeatureVector::from_pairs(5, vec![(3, 1.0), (1, 2.0), (3, 0.5)]).unwrap();
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(1, 2.0), (3, 1.5)]);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(0), 0.0);
    }

    #[test]
    fn test_from_pairs_rejects_out_of_range() {
        let result = FeatureVector::from_pairs(2, vec![(2, 1.0)]);
        assert!(matches!(
            result,
            Err(SpamlensError::DimensionMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn test_zero_entries_dropped() {
        let vector = FeatureVector::from_pairs(3, vec![(0, 0.0), (1, 1.0), (1, -1.0)]).unwrap();
        assert!(vector.is_zero());
        assert_eq!(vector.dimension(), 3);
    }

    #[test]
    fn test_normalize() {
        let mut vector = FeatureVector::from_pairs(4, vec![(0, 3.0), (2, 4.0)]).unwrap();
        vector.normalize();
        assert!((vector.norm() - 1.0).abs() < 1e-12);
        assert!((vector.get(0) - 0.6).abs() < 1e-12);

        let mut zero = FeatureVector::zeros(4);
        zero.normalize();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_deserialize_checks_indices() {
        let valid: FeatureVector =
            serde_json::from_str(r#"{"dimension":3,"indices":[0,2],"values":[1.0,2.0]}"#).unwrap();
        assert_eq!(valid.get(2), 2.0);

        for json in [
            r#"{"dimension":2,"indices":[5],"values":[1.0]}"#,
            r#"{"dimension":3,"indices":[2,1],"values":[1.0,1.0]}"#,
            r#"{"dimension":3,"indices":[1],"values":[]}"#,
        ] {
            assert!(serde_json::from_str::<FeatureVector>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_dot() {
        let vector = FeatureVector::from_pairs(3, vec![(0, 1.0), (2, 2.0)]).unwrap();
        assert_eq!(vector.dot(&[1.0, 5.0, 0.5]).unwrap(), 2.0);
        assert!(vector.dot(&[1.0]).is_err());
        assert_eq!(vector.to_dense(), vec![1.0, 0.0, 2.0]);
    }
}
