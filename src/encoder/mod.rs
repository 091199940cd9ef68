//! # Composite encoder
//!
//! Turns the `(role, filler)` tuples of one sentence into a single CHV.
//!
//! ## Pipeline
//!
//! ```text
//! (role, filler text) ──► filler_vector(text)        sha256 → seeded ±1
//!                     ──► bind(role vector, filler)  cyclic-shift ⊗
//!                     ──► [γ-gate toward filler]     optional
//! all pairs           ──► majority_vote              one CHV
//! ```
//!
//! Majority vote is order-independent, so tuple order never changes the
//! result. An empty tuple list encodes to the all-`+1` vector, which
//! downstream stub-sentence handling relies on.

pub mod config;
pub mod jl;

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::basis::{shared_basis, standard_basis, RoleBasis};
use crate::hypervector::Hypervector;
use crate::kernel::{bind, canonicalize, gamma_gate, majority_vote, unbind, RoleRef};
use crate::schema::SentencePayload;
use crate::{HydraEdgeError, Result};

pub use config::EncoderConfig;
pub use jl::{jl_project, JlProjector};

/// Deterministic filler vector for a piece of text
///
/// SHA-256 of the UTF-8 text seeds the generator, so identical text always
/// yields an identical vector. The header is canonical, which makes
/// `unbind(bind(r, f), r) == f` exact.
pub fn filler_vector(text: &str, dim: usize) -> Result<Hypervector> {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    let seed = u64::from_le_bytes(seed_bytes);

    Ok(canonicalize(&Hypervector::random(dim, seed)?))
}

/// Sentence → CHV encoder over a fixed role basis
#[derive(Debug, Clone)]
pub struct ChvEncoder {
    basis: Arc<RoleBasis>,
    gamma: f64,
}

impl ChvEncoder {
    /// Encoder over the process-wide standard basis (D = 4096, γ = 0)
    pub fn standard() -> Self {
        Self {
            basis: standard_basis(),
            gamma: 0.0,
        }
    }

    /// Encoder over an explicit basis
    pub fn new(basis: Arc<RoleBasis>) -> Self {
        Self { basis, gamma: 0.0 }
    }

    /// Encoder built from validated settings
    ///
    /// The standard registry is served from the shared per-dimension cache;
    /// custom registries get their own basis.
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        config.validate()?;

        let basis = if config.uses_standard_roles() {
            shared_basis(config.dim)?
        } else {
            Arc::new(RoleBasis::new(&config.roles, config.dim)?)
        };

        Ok(Self {
            basis,
            gamma: config.gamma,
        })
    }

    /// Same encoder with a different γ-gate strength
    pub fn with_gamma(mut self, gamma: f64) -> Result<Self> {
        check_gamma(gamma)?;
        self.gamma = gamma;
        Ok(self)
    }

    /// CHV dimensionality
    pub fn dim(&self) -> usize {
        self.basis.dim()
    }

    /// Configured γ-gate strength
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The role basis in use
    pub fn basis(&self) -> &RoleBasis {
        &self.basis
    }

    /// Filler vector at this encoder's dimensionality
    pub fn filler_vector(&self, text: &str) -> Result<Hypervector> {
        filler_vector(text, self.dim())
    }

    /// Encode a sentence's `(role, filler)` tuples into one CHV
    ///
    /// Fails with `UnknownRole` if a role is not in the basis.
    pub fn encode_sentence<R, F>(&self, tuples: &[(R, F)]) -> Result<Hypervector>
    where
        R: AsRef<str>,
        F: AsRef<str>,
    {
        self.encode_sentence_gated(tuples, 0.0)
    }

    /// Encode with each bound pair γ-gated toward its filler before bundling
    ///
    /// `gamma = 0` is identical to [`ChvEncoder::encode_sentence`].
    pub fn encode_sentence_gated<R, F>(&self, tuples: &[(R, F)], gamma: f64) -> Result<Hypervector>
    where
        R: AsRef<str>,
        F: AsRef<str>,
    {
        check_gamma(gamma)?;
        if tuples.is_empty() {
            debug!("empty tuple list, using all-ones CHV");
            return Hypervector::ones(self.dim());
        }

        let bound = tuples
            .iter()
            .map(|(role, filler)| {
                let role_vec = self.basis.get_vector(role.as_ref())?;
                let filler_vec = self.filler_vector(filler.as_ref())?;
                let b = bind(role_vec, &filler_vec)?;
                if gamma > 0.0 {
                    gamma_gate(&b, &filler_vec, gamma)
                } else {
                    Ok(b)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(pairs = bound.len(), gamma, "encoded sentence");
        majority_vote(&bound)
    }

    /// Encode with the configured γ
    pub fn encode<R, F>(&self, tuples: &[(R, F)]) -> Result<Hypervector>
    where
        R: AsRef<str>,
        F: AsRef<str>,
    {
        self.encode_sentence_gated(tuples, self.gamma)
    }

    /// Encode many sentences in parallel
    ///
    /// Returns one result per input, in input order. A failing sentence does
    /// not affect the others.
    pub fn encode_batch<R, F>(&self, sentences: &[Vec<(R, F)>]) -> Vec<Result<Hypervector>>
    where
        R: AsRef<str> + Sync,
        F: AsRef<str> + Sync,
    {
        let results: Vec<Result<Hypervector>> =
            sentences.par_iter().map(|tuples| self.encode(tuples)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = sentences.len(), "some sentences failed to encode");
        }

        results
    }

    /// Tuples carried by a payload, then encoded
    pub fn encode_payload(&self, payload: &SentencePayload) -> Result<Hypervector> {
        self.encode(&tuples_from_payload(payload))
    }

    /// Rank candidate fillers for `role` in a CHV
    ///
    /// Unbinds the role and scores each candidate's filler vector by cosine
    /// similarity to the recovered vector, best first.
    pub fn probe<'a, S: AsRef<str>>(
        &'a self,
        chv: &Hypervector,
        role: impl Into<RoleRef<'a>>,
        candidates: &[S],
    ) -> Result<Vec<(String, f32)>> {
        let role_vec = role.into().resolve(&self.basis)?;
        let recovered = unbind(chv, role_vec)?;

        let mut scored = candidates
            .iter()
            .map(|c| {
                let score = recovered.cosine(&self.filler_vector(c.as_ref())?)?;
                Ok((c.as_ref().to_string(), score))
            })
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        Ok(scored)
    }
}

fn check_gamma(gamma: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(HydraEdgeError::Range(format!(
            "gamma must be in [0, 1] (got {})",
            gamma
        )));
    }
    Ok(())
}

/// `(role, filler)` tuples of a payload
///
/// Each node with a non-empty filler contributes one tuple per role it
/// carries, in node order.
pub fn tuples_from_payload(payload: &SentencePayload) -> Vec<(String, String)> {
    payload
        .nodes
        .iter()
        .filter(|n| !n.filler.trim().is_empty())
        .flat_map(|n| n.roles.iter().map(move |r| (r.clone(), n.filler.clone())))
        .collect()
}
