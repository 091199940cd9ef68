//! # Binding and bundling kernel
//!
//! The algebra every CHV is built from.
//!
//! ## Key Concepts
//!
//! - **Bind (⊗)**: header-encoded cyclic shift. Associative, non-commutative,
//!   exactly invertible.
//! - **Unbind (⊘)**: the inverse shift, given the same role vector.
//! - **Majority vote (+)**: coordinate-wise sign of the sum, ties → +1.
//! - **γ-gate**: binarized convex blend between a bound vector and its filler.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hydraedge::kernel::*;
//!
//! let bound = bind(role, &filler)?;
//! assert_eq!(unbind(&bound, role)?, filler);
//!
//! let chv = majority_vote(&[b1, b2, b3])?;
//! let softened = gamma_gate(&bound, &filler, 0.3)?;
//! ```

pub mod bind;
pub mod bundle;

pub use bind::{bind, bind_role, canonicalize, decode_shift, header_params, unbind, unbind_role, RoleRef};
pub use bundle::{gamma_gate, majority_vote};
