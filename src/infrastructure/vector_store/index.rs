use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::domain::{squared_l2, DomainError, Embedding};

/// Exact nearest-neighbor index under squared Euclidean distance.
///
/// Vectors are stored row-major in one buffer; row `i` is the `i`-th vector
/// added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rejects a zero dimension or a buffer holding a partial row, as a
    /// decoded artifact may.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dimension == 0 {
            return Err(DomainError::consistency("index dimension is zero"));
        }
        if self.data.len() % self.dimension != 0 {
            return Err(DomainError::consistency(format!(
                "index holds {} values, not a whole number of {}-dimensional rows",
                self.data.len(),
                self.dimension
            )));
        }
        Ok(())
    }

    pub fn add(&mut self, embedding: &Embedding) -> Result<(), DomainError> {
        if embedding.dimension() != self.dimension {
            return Err(DomainError::dimension(self.dimension, embedding.dimension()));
        }
        self.data.extend_from_slice(embedding.as_slice());
        Ok(())
    }

    /// Positions and distances of the `k` closest rows, ascending by distance
    /// with ties broken by position. `query` must match the index dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if k == 0 || self.dimension == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .map(|row| squared_l2(row, query))
            .enumerate()
            .collect();

        scored.sort_by(|a, b| match a.1.total_cmp(&b.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        scored.truncate(k);
        scored
    }
}
