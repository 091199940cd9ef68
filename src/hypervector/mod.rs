//! Bipolar hypervectors
//!
//! The value type shared by every layer of the crate: a fixed-length
//! sequence of coordinates in {-1, +1}.
//!
//! ## Invariants
//!
//! - Never empty
//! - Every coordinate is exactly `-1` or `+1`
//! - Immutable: operations return new vectors
//!
//! Vectors are compared by Hamming distance or cosine similarity. For
//! bipolar vectors of length D these are related by
//! `cosine = 1 - 2 * hamming / D`.

use std::fmt;

use candle_core::{DType, Device, Tensor};
use serde::{Deserialize, Serialize};

use crate::{HydraEdgeError, Result};

/// Multiplier of the linear congruential generator used for seeded vectors
const LCG_MUL: u64 = 6364136223846793005;
/// Increment of the linear congruential generator used for seeded vectors
const LCG_INC: u64 = 1442695040888963407;

/// A ±1 hypervector
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct Hypervector {
    data: Vec<i8>,
}

impl Hypervector {
    /// Build a hypervector from raw bipolar data
    ///
    /// Fails if `data` is empty or holds anything other than ±1.
    pub fn from_bipolar(data: Vec<i8>) -> Result<Self> {
        if data.is_empty() {
            return Err(HydraEdgeError::EmptyInput(
                "hypervector needs at least one coordinate".into(),
            ));
        }
        if let Some((idx, value)) = data.iter().enumerate().find(|(_, v)| **v != 1 && **v != -1) {
            return Err(HydraEdgeError::InvalidVector(format!(
                "coordinate {} is {}, expected -1 or +1",
                idx, value
            )));
        }
        Ok(Self { data })
    }

    /// Wrap data already known to be bipolar and non-empty
    pub(crate) fn from_vec_unchecked(data: Vec<i8>) -> Self {
        debug_assert!(!data.is_empty());
        debug_assert!(data.iter().all(|v| *v == 1 || *v == -1));
        Self { data }
    }

    /// All-`+1` vector of length `dim`
    pub fn ones(dim: usize) -> Result<Self> {
        Self::from_bipolar(vec![1; dim])
    }

    /// Deterministic pseudo-random vector
    ///
    /// The same `(dim, seed)` pair always yields the same vector.
    pub fn random(dim: usize, seed: u64) -> Result<Self> {
        if dim == 0 {
            return Err(HydraEdgeError::EmptyInput(
                "hypervector needs at least one coordinate".into(),
            ));
        }

        let mut state = scramble(seed);
        let data = (0..dim)
            .map(|_| {
                state = state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
                // High bit only: the low bits of an LCG have short periods
                if state >> 63 == 1 {
                    1
                } else {
                    -1
                }
            })
            .collect();

        Ok(Self { data })
    }

    /// Number of coordinates
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Borrow the coordinates
    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }

    /// Take ownership of the coordinates
    pub fn into_vec(self) -> Vec<i8> {
        self.data
    }

    /// Number of `+1` coordinates
    pub fn popcount(&self) -> usize {
        self.data.iter().filter(|v| **v == 1).count()
    }

    /// First `n` coordinates rendered as a `1`/`0` bit string
    pub fn bit_preview(&self, n: usize) -> String {
        self.data
            .iter()
            .take(n)
            .map(|v| if *v == 1 { '1' } else { '0' })
            .collect()
    }

    /// Inner product
    pub fn dot(&self, other: &Self) -> Result<i64> {
        ensure_same_dim(self.dim(), other.dim())?;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (*a as i64) * (*b as i64))
            .sum())
    }

    /// Number of coordinates that differ
    pub fn hamming(&self, other: &Self) -> Result<usize> {
        ensure_same_dim(self.dim(), other.dim())?;
        Ok(self.data.iter().zip(&other.data).filter(|(a, b)| a != b).count())
    }

    /// Cosine similarity in [-1, 1]
    pub fn cosine(&self, other: &Self) -> Result<f32> {
        let dot = self.dot(other)?;
        Ok(dot as f32 / self.dim() as f32)
    }

    /// Coordinates as `f32`, the layout ANN indexes expect
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.data.iter().map(|v| *v as f32).collect()
    }

    /// Export as a 1-D `f32` tensor of shape `(D,)`
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        Ok(Tensor::from_vec(self.to_f32_vec(), (self.dim(),), device)?)
    }

    /// Import from a 1-D tensor whose values are exactly ±1
    pub fn from_tensor(tensor: &Tensor) -> Result<Self> {
        let values: Vec<f32> = tensor.flatten_all()?.to_dtype(DType::F32)?.to_vec1()?;
        Self::from_f32(&values)
    }

    /// Import from `f32` coordinates that are exactly ±1
    pub fn from_f32(values: &[f32]) -> Result<Self> {
        let data = values
            .iter()
            .enumerate()
            .map(|(idx, v)| match *v {
                x if x == 1.0 => Ok(1),
                x if x == -1.0 => Ok(-1),
                x => Err(HydraEdgeError::InvalidVector(format!(
                    "coordinate {} is {}, expected -1 or +1",
                    idx, x
                ))),
            })
            .collect::<Result<Vec<i8>>>()?;
        Self::from_bipolar(data)
    }

    /// Stack vectors of equal length into an `(N, D)` `f32` matrix
    pub fn stack(vectors: &[Hypervector], device: &Device) -> Result<Tensor> {
        let first = vectors.first().ok_or_else(|| {
            HydraEdgeError::EmptyInput("cannot stack an empty list of vectors".into())
        })?;
        let dim = first.dim();

        let mut flat = Vec::with_capacity(vectors.len() * dim);
        for v in vectors {
            ensure_same_dim(dim, v.dim())?;
            flat.extend(v.data.iter().map(|x| *x as f32));
        }

        Ok(Tensor::from_vec(flat, (vectors.len(), dim), device)?)
    }
}

impl TryFrom<Vec<i8>> for Hypervector {
    type Error = HydraEdgeError;

    fn try_from(data: Vec<i8>) -> Result<Self> {
        Self::from_bipolar(data)
    }
}

impl From<Hypervector> for Vec<i8> {
    fn from(v: Hypervector) -> Self {
        v.data
    }
}

impl AsRef<[i8]> for Hypervector {
    fn as_ref(&self) -> &[i8] {
        &self.data
    }
}

impl fmt::Debug for Hypervector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hypervector(dim={}, popcount={}, head={})",
            self.dim(),
            self.popcount(),
            self.bit_preview(16)
        )
    }
}

/// SplitMix64 finalizer, so neighbouring seeds start far apart
fn scramble(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Cosine similarity between two hypervectors
pub fn cosine(a: &Hypervector, b: &Hypervector) -> Result<f32> {
    a.cosine(b)
}

/// Hamming distance between two hypervectors
pub fn hamming(a: &Hypervector, b: &Hypervector) -> Result<usize> {
    a.hamming(b)
}

/// Fail with `DimensionMismatch` unless the lengths agree
pub(crate) fn ensure_same_dim(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(HydraEdgeError::DimensionMismatch { expected, found });
    }
    Ok(())
}
