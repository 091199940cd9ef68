//! Bundling operators
//!
//! Both operators binarize through the same rule: the sign of the
//! coordinate, with exact zero resolving to `+1`.

use tracing::debug;

use crate::hypervector::{ensure_same_dim, Hypervector};
use crate::{HydraEdgeError, Result};

/// Sign with ties broken toward `+1`
#[inline]
fn sign_tie_positive<T: PartialOrd + Default>(x: T) -> i8 {
    if x < T::default() {
        -1
    } else {
        1
    }
}

/// Bit-wise majority vote (superposition)
///
/// Coordinates are summed as integers and the output takes the sign of each
/// sum. A zero sum (only possible for an even count) resolves to `+1`.
///
/// # Example
/// ```rust,ignore
/// let chv = majority_vote(&[bound_subject, bound_predicate, bound_object])?;
/// ```
pub fn majority_vote(vectors: &[Hypervector]) -> Result<Hypervector> {
    let first = vectors.first().ok_or_else(|| {
        HydraEdgeError::EmptyInput("majority_vote needs at least one vector".into())
    })?;
    let dim = first.dim();

    let mut sums = vec![0i32; dim];
    for v in vectors {
        ensure_same_dim(dim, v.dim())?;
        for (sum, x) in sums.iter_mut().zip(v.as_slice()) {
            *sum += *x as i32;
        }
    }

    debug!(count = vectors.len(), dim, "majority vote");
    Ok(Hypervector::from_vec_unchecked(
        sums.into_iter().map(sign_tie_positive).collect(),
    ))
}

/// γ-gate: binarized convex blend `(1 - γ)·bound + γ·filler`
///
/// `γ = 0` returns `bound`, `γ = 1` returns `filler`. Moving γ from 0 to 1
/// never decreases similarity to `filler` nor increases similarity to
/// `bound`. Fails with `Range` unless `0 ≤ γ ≤ 1`.
pub fn gamma_gate(bound: &Hypervector, filler: &Hypervector, gamma: f64) -> Result<Hypervector> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(HydraEdgeError::Range(format!(
            "gamma must be in [0, 1] (got {})",
            gamma
        )));
    }
    ensure_same_dim(bound.dim(), filler.dim())?;

    let mixed = bound
        .as_slice()
        .iter()
        .zip(filler.as_slice())
        .map(|(b, f)| sign_tie_positive((1.0 - gamma) * *b as f64 + gamma * *f as f64))
        .collect();

    Ok(Hypervector::from_vec_unchecked(mixed))
}
