//! # Role-vector basis
//!
//! Deterministic ±1 vectors, one per semantic role, built from a Sylvester
//! Hadamard matrix whose rows are tiled out to the working dimensionality.
//!
//! ## Construction
//!
//! ```text
//! R roles → order n = 2^ceil(log2 R) → H_n (n × n, ±1)
//!        → first R rows → each row repeated D / n times → R × D basis
//! ```
//!
//! Distinct Hadamard rows are exactly orthogonal, and tiling preserves that,
//! so every pair of distinct role vectors has a zero dot product.
//!
//! ## Sharing
//!
//! The basis is a pure function of the ordered role list and D. The standard
//! registry at [`DEFAULT_DIM`] lives behind a one-time initializer
//! ([`standard_basis`]); other dimensionalities are cached on first use
//! ([`shared_basis`]). Nothing is mutated after construction.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use candle_core::{DType, Device, Tensor};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hypervector::Hypervector;
use crate::{HydraEdgeError, Result};

/// Default CHV dimensionality
pub const DEFAULT_DIM: usize = 4096;

/// Hadamard order of the standard registry (next power of two ≥ 11)
const STANDARD_ORDER: usize = 16;

const _: () = assert!(STANDARD_ORDER.is_power_of_two() && DEFAULT_DIM % STANDARD_ORDER == 0);

// ============================================================================
// Role Registry
// ============================================================================

/// Semantic role in the standard registry (payload schema v2.4)
///
/// Declaration order is basis order; it is part of the encoding and must
/// not be reshuffled without a version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Subject,
    Predicate,
    Object,
    Event,
    Tense,
    Attr,
    IndirectObject,
    Type,
    Source,
    Date,
    Venue,
}

impl Role {
    /// Every role, in basis order
    pub const ALL: [Role; 11] = [
        Role::Subject,
        Role::Predicate,
        Role::Object,
        Role::Event,
        Role::Tense,
        Role::Attr,
        Role::IndirectObject,
        Role::Type,
        Role::Source,
        Role::Date,
        Role::Venue,
    ];

    /// Canonical name, as it appears in payloads and tuples
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::Predicate => "Predicate",
            Self::Object => "Object",
            Self::Event => "Event",
            Self::Tense => "Tense",
            Self::Attr => "Attr",
            Self::IndirectObject => "IndirectObject",
            Self::Type => "Type",
            Self::Source => "Source",
            Self::Date => "Date",
            Self::Venue => "Venue",
        }
    }

    /// Position of this role in the basis
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Standard role names, in basis order
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HydraEdgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| HydraEdgeError::UnknownRole {
                role: s.to_string(),
                valid: Self::names(),
            })
    }
}

// ============================================================================
// Hadamard Construction
// ============================================================================

/// Sylvester Hadamard matrix of order `n`
///
/// `n` must be a power of two.
pub fn hadamard(n: usize) -> Result<Vec<Vec<i8>>> {
    if n == 0 || !n.is_power_of_two() {
        return Err(HydraEdgeError::Configuration(format!(
            "Hadamard order must be a power of two (got {})",
            n
        )));
    }

    Ok(sylvester(n))
}

/// `[[H, H], [H, -H]]` doubling until the order reaches `n`
fn sylvester(n: usize) -> Vec<Vec<i8>> {
    let mut h: Vec<Vec<i8>> = vec![vec![1]];
    while h.len() < n {
        let mut next = Vec::with_capacity(h.len() * 2);
        for row in &h {
            let mut top = row.clone();
            top.extend_from_slice(row);
            next.push(top);
        }
        for row in &h {
            let mut bottom = row.clone();
            bottom.extend(row.iter().map(|x| -x));
            next.push(bottom);
        }
        h = next;
    }
    h
}

/// Smallest Hadamard order that fits `roles` rows
pub fn hadamard_order(roles: usize) -> usize {
    roles.max(1).next_power_of_two()
}

// ============================================================================
// Role Basis
// ============================================================================

/// Mapping from role name to its ±1 basis vector
#[derive(Debug, Clone)]
pub struct RoleBasis {
    dim: usize,
    order: usize,
    names: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Hypervector>,
}

impl RoleBasis {
    /// Build the basis for an ordered role list at dimensionality `dim`
    ///
    /// Fails with `Configuration` if the list is empty, holds duplicates, or
    /// `dim` is not a multiple of the Hadamard order.
    pub fn new<S: AsRef<str>>(roles: &[S], dim: usize) -> Result<Self> {
        if roles.is_empty() {
            return Err(HydraEdgeError::Configuration(
                "role basis needs at least one role".into(),
            ));
        }

        let order = hadamard_order(roles.len());
        if dim == 0 || dim % order != 0 {
            return Err(HydraEdgeError::Configuration(format!(
                "dimension {} must be a non-zero multiple of the base Hadamard order {}",
                dim, order
            )));
        }

        let mut index = HashMap::with_capacity(roles.len());
        let mut names = Vec::with_capacity(roles.len());
        for (i, role) in roles.iter().enumerate() {
            let name = role.as_ref().to_string();
            if index.insert(name.clone(), i).is_some() {
                return Err(HydraEdgeError::Configuration(format!(
                    "duplicate role '{}' in basis",
                    name
                )));
            }
            names.push(name);
        }

        let basis = Self::build(names, index, order, dim);
        info!(roles = basis.len(), dim, order, "built role basis");
        Ok(basis)
    }

    /// Tile the first `names.len()` Hadamard rows out to `dim`
    ///
    /// Callers guarantee `order` is a power of two dividing `dim`.
    fn build(names: Vec<String>, index: HashMap<String, usize>, order: usize, dim: usize) -> Self {
        let vectors = sylvester(order)
            .into_iter()
            .take(names.len())
            .map(|row| Hypervector::from_vec_unchecked(row.iter().copied().cycle().take(dim).collect()))
            .collect();

        Self {
            dim,
            order,
            names,
            index,
            vectors,
        }
    }

    /// Standard registry at dimensionality `dim`
    pub fn standard(dim: usize) -> Result<Self> {
        Self::new(&Role::names(), dim)
    }

    /// Vector length
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Hadamard order the basis was tiled from
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of roles
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the basis holds no roles (never, once constructed)
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Role names in basis order
    pub fn roles(&self) -> &[String] {
        &self.names
    }

    /// Look up the vector for a role name
    pub fn get_vector(&self, role: &str) -> Result<&Hypervector> {
        self.index
            .get(role)
            .map(|&i| &self.vectors[i])
            .ok_or_else(|| HydraEdgeError::UnknownRole {
                role: role.to_string(),
                valid: self.names.clone(),
            })
    }

    /// Look up the vector for a standard role
    pub fn get(&self, role: Role) -> Result<&Hypervector> {
        self.get_vector(role.as_str())
    }

    /// Iterate `(name, vector)` pairs in basis order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Hypervector)> {
        self.names.iter().map(String::as_str).zip(self.vectors.iter())
    }

    /// The operational basis as an `(R, D)` `f32` matrix scaled by `1/sqrt(D)`
    ///
    /// Rows are orthonormal in ℝ^D, so `M · Mᵀ` is the R × R identity.
    pub fn basis_matrix(&self, device: &Device) -> Result<Tensor> {
        let scale = 1.0 / (self.dim as f32).sqrt();
        let flat: Vec<f32> = self
            .vectors
            .iter()
            .flat_map(|v| v.as_slice().iter().map(move |x| *x as f32 * scale))
            .collect();
        Ok(Tensor::from_vec(flat, (self.len(), self.dim), device)?)
    }

    /// R × R identity used to test orthonormality in isolation
    ///
    /// This is not the operational basis; see [`RoleBasis::basis_matrix`].
    pub fn small(&self, device: &Device) -> Result<Tensor> {
        Ok(Tensor::eye(self.len(), DType::F32, device)?)
    }
}

// ============================================================================
// Process-wide Instances
// ============================================================================

static STANDARD_BASIS: OnceLock<Arc<RoleBasis>> = OnceLock::new();
static BASIS_BY_DIM: OnceLock<RwLock<HashMap<usize, Arc<RoleBasis>>>> = OnceLock::new();

fn basis_cache() -> &'static RwLock<HashMap<usize, Arc<RoleBasis>>> {
    BASIS_BY_DIM.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The standard registry at [`DEFAULT_DIM`], built once per process
pub fn standard_basis() -> Arc<RoleBasis> {
    STANDARD_BASIS
        .get_or_init(|| {
            let names = Role::names();
            let index = names.iter().cloned().enumerate().map(|(i, n)| (n, i)).collect();
            info!(roles = names.len(), dim = DEFAULT_DIM, "built standard role basis");
            Arc::new(RoleBasis::build(names, index, STANDARD_ORDER, DEFAULT_DIM))
        })
        .clone()
}

/// The standard registry at `dim`, cached per dimensionality
pub fn shared_basis(dim: usize) -> Result<Arc<RoleBasis>> {
    if dim == DEFAULT_DIM {
        return Ok(standard_basis());
    }

    if let Some(basis) = basis_cache().read().get(&dim) {
        return Ok(basis.clone());
    }

    let mut cache = basis_cache().write();
    // Another thread may have won the race while we waited for the lock
    if let Some(basis) = cache.get(&dim) {
        return Ok(basis.clone());
    }

    debug!(dim, "caching role basis");
    let basis = Arc::new(RoleBasis::standard(dim)?);
    cache.insert(dim, basis.clone());
    Ok(basis)
}

/// R × R identity for the standard registry
pub fn role_basis_small() -> Result<Tensor> {
    standard_basis().small(&Device::Cpu)
}
