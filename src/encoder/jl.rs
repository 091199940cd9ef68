//! Johnson–Lindenstrauss projection
//!
//! Maps dense sentence embeddings (typically 768-d) into the CHV space so
//! they can sit in the same ANN index as composite vectors:
//!
//! ```text
//! v (n)  ──►  M · v  (D)  ──►  sign  (D, ±1)
//!             M ~ N(0, 1/n), D × n, seeded
//! ```
//!
//! The dense image keeps pairwise cosine to within a few hundredths at
//! D = 4096. After binarization the cosine of two outputs tracks
//! `1 - 2θ/π`, θ being the angle between the inputs.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use candle_core::{DType, Device, Tensor};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::hypervector::Hypervector;
use crate::{HydraEdgeError, Result};

/// Width of the upstream sentence embeddings
pub const DENSE_DIM: usize = 768;

/// Seed of the shared projection matrices
pub const JL_SEED: u64 = 0x4A4C_5345_4544;

/// Seeded standard-normal stream (SplitMix64 + Box–Muller)
struct Gaussian {
    state: u64,
    spare: Option<f64>,
}

impl Gaussian {
    fn new(seed: u64) -> Self {
        Self { state: seed, spare: None }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform in (0, 1]
    fn next_uniform(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 + 1.0) / (1u64 << 53) as f64
    }

    fn sample(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let r = (-2.0 * self.next_uniform().ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * self.next_uniform();
        self.spare = Some(r * theta.sin());
        r * theta.cos()
    }
}

/// Fixed random projection from `input_dim` to `dim`
#[derive(Debug, Clone)]
pub struct JlProjector {
    /// `(dim, input_dim)`, entries N(0, 1/input_dim)
    matrix: Tensor,
    input_dim: usize,
    dim: usize,
}

impl JlProjector {
    /// Build the projection for the given shape and seed
    pub fn new(input_dim: usize, dim: usize, seed: u64) -> Result<Self> {
        if input_dim == 0 || dim == 0 {
            return Err(HydraEdgeError::EmptyInput(format!(
                "projection shape must be non-zero (got {} → {})",
                input_dim, dim
            )));
        }

        let scale = 1.0 / (input_dim as f64).sqrt();
        let mut rng = Gaussian::new(seed);
        let entries: Vec<f32> = (0..dim * input_dim)
            .map(|_| (rng.sample() * scale) as f32)
            .collect();

        info!(input_dim, dim, seed, "built JL projection matrix");
        Ok(Self {
            matrix: Tensor::from_vec(entries, (dim, input_dim), &Device::Cpu)?,
            input_dim,
            dim,
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `M · v` before binarization, shape `(dim,)`
    pub fn project_dense(&self, dense: &Tensor) -> Result<Tensor> {
        let n = dense.dims1()?;
        if n != self.input_dim {
            return Err(HydraEdgeError::DimensionMismatch {
                expected: self.input_dim,
                found: n,
            });
        }

        let column = dense
            .to_device(&Device::Cpu)?
            .to_dtype(DType::F32)?
            .reshape((n, 1))?;
        Ok(self.matrix.matmul(&column)?.flatten_all()?)
    }

    /// Project one embedding and binarize it
    pub fn project(&self, dense: &Tensor) -> Result<Hypervector> {
        let values: Vec<f32> = self.project_dense(dense)?.to_vec1()?;
        Ok(binarize(&values))
    }

    /// Project an `(N, input_dim)` batch, one vector per row
    pub fn project_batch(&self, dense: &Tensor) -> Result<Vec<Hypervector>> {
        let (rows, n) = dense.dims2()?;
        if n != self.input_dim {
            return Err(HydraEdgeError::DimensionMismatch {
                expected: self.input_dim,
                found: n,
            });
        }

        let batch = dense.to_device(&Device::Cpu)?.to_dtype(DType::F32)?;
        let projected = self.matrix.matmul(&batch.t()?.contiguous()?)?; // (dim, N)
        let rows_out: Vec<Vec<f32>> = projected.t()?.contiguous()?.to_vec2()?;

        debug!(rows, dim = self.dim, "projected embedding batch");
        Ok(rows_out.iter().map(|row| binarize(row)).collect())
    }
}

/// Sign with zero resolving to `+1`
fn binarize(values: &[f32]) -> Hypervector {
    Hypervector::from_vec_unchecked(values.iter().map(|x| if *x < 0.0 { -1 } else { 1 }).collect())
}

static PROJECTORS: OnceLock<RwLock<HashMap<(usize, usize), Arc<JlProjector>>>> = OnceLock::new();

/// Projection with [`JL_SEED`], cached per shape
pub fn shared_projector(input_dim: usize, dim: usize) -> Result<Arc<JlProjector>> {
    let cache = PROJECTORS.get_or_init(|| RwLock::new(HashMap::new()));

    if let Some(p) = cache.read().get(&(input_dim, dim)) {
        return Ok(p.clone());
    }

    let mut guard = cache.write();
    if let Some(p) = guard.get(&(input_dim, dim)) {
        return Ok(p.clone());
    }
    let projector = Arc::new(JlProjector::new(input_dim, dim, JL_SEED)?);
    guard.insert((input_dim, dim), projector.clone());
    Ok(projector)
}

/// Project a 1-D dense embedding to a sign-binarized vector of length `dim`
///
/// The input width is taken from the tensor; the matrix is shared across
/// calls with the same shape.
pub fn jl_project(dense: &Tensor, dim: usize) -> Result<Hypervector> {
    let n = dense.dims1()?;
    shared_projector(n, dim)?.project(dense)
}
