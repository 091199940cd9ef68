//! # hydraedge
//!
//! Composite hyper-vector (CHV) encoding for sentence-level semantic tuples.
//!
//! ## Overview
//!
//! An upstream extraction pipeline turns a sentence into a nested-event graph
//! payload and a list of `(role, filler)` tuples. This crate holds the core
//! that sits between that pipeline and an approximate-nearest-neighbor index:
//!
//! - **Basis**: deterministic ±1 role vectors from a tiled Sylvester Hadamard matrix
//! - **Kernel**: header-encoded cyclic-shift binding, majority-vote and γ-gate bundling
//! - **Encoder**: `(role, filler)` tuples → one CHV per sentence
//! - **Schema**: shape and semantic validation of the sentence-graph payload (v2.4)
//! - **Storage**: safetensors round-trip of encoded vectors for external indexing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hydraedge::prelude::*;
//!
//! let payload = schema::load_str(&raw_json)?;
//! let report = validate(&payload)?;
//! if !report.ok {
//!     for err in &report.errors {
//!         eprintln!("{err}");
//!     }
//! }
//!
//! let encoder = ChvEncoder::standard();
//! let chv = encoder.encode_sentence(&[("Subject", "dog"), ("Predicate", "chase")])?;
//! println!("popcount={} /{}", chv.popcount(), chv.dim());
//! ```
//!
//! ## Concurrency
//!
//! Everything here is a pure function over immutable values. The only shared
//! state is the role basis, built once per dimensionality and read-only after
//! that. Batch helpers ([`ChvEncoder::encode_batch`], [`schema::validate_batch`])
//! run units in parallel and isolate per-unit failures.

pub mod basis;
pub mod encoder;
pub mod hypervector;
pub mod kernel;
pub mod schema;
pub mod storage;

pub use hypervector::Hypervector;

// Re-export candle types for convenience
pub use candle_core::{DType, Device, Tensor};

/// Error types for CHV operations
#[derive(Debug, thiserror::Error)]
pub enum HydraEdgeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown role '{role}'. Valid roles: {valid:?}")]
    UnknownRole { role: String, valid: Vec<String> },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Out of range: {0}")]
    Range(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid hypervector: {0}")]
    InvalidVector(String),

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),
}

/// Result type alias for CHV operations
pub type Result<T> = std::result::Result<T, HydraEdgeError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{DType, Device, Tensor};
    pub use crate::{HydraEdgeError, Result};

    pub use crate::hypervector::{cosine, hamming, Hypervector};

    pub use crate::basis::{
        role_basis_small, shared_basis, standard_basis, Role, RoleBasis, DEFAULT_DIM,
    };

    pub use crate::kernel::{bind, bind_role, gamma_gate, majority_vote, unbind, unbind_role, RoleRef};

    pub use crate::encoder::{filler_vector, jl_project, ChvEncoder, EncoderConfig};

    pub use crate::schema;
    pub use crate::schema::{validate, validate_str, SentencePayload, ValidationReport};

    pub use crate::storage::ChvStore;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let encoder = ChvEncoder::standard();
        assert_eq!(encoder.dim(), DEFAULT_DIM);
        assert_eq!(Role::ALL.len(), 11);
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = crate::HydraEdgeError::UnknownRole {
            role: "Agent".into(),
            valid: vec!["Subject".into(), "Object".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Agent"));
        assert!(msg.contains("Subject"));
    }
}
