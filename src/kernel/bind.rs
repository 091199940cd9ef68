//! Role-filler binding
//!
//! The first `H = ceil(log2 D)` coordinates of every vector are a header
//! holding a little-endian shift `k` (`+1` = bit set), read modulo
//! `body_len = D - H`. The remaining coordinates are the body.
//!
//! ```text
//! bind(r, f):   header = enc((k_r + k_f) mod body_len)
//!               body   = rotate_right(f.body, k_r)
//!
//! unbind(b, r): header = enc((k_b - k_r) mod body_len)
//!               body   = rotate_left(b.body, k_r)
//! ```
//!
//! Cyclic shifts compose by addition, so `bind(r, bind(s, x)) ==
//! bind(bind(r, s), x)`, and `unbind` undoes `bind` exactly for canonical
//! fillers (header shift already below `body_len`).

use tracing::debug;

use crate::basis::{Role, RoleBasis};
use crate::hypervector::{ensure_same_dim, Hypervector};
use crate::Result;

/// Header length and body length for a vector of length `dim`
///
/// `dim` must be non-zero (guaranteed for any [`Hypervector`]).
pub fn header_params(dim: usize) -> (usize, usize) {
    let header = ceil_log2(dim);
    (header, dim - header)
}

fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

/// Shift stored in a vector's header, reduced modulo the body length
pub fn decode_shift(v: &Hypervector) -> usize {
    let (header, body_len) = header_params(v.dim());
    let raw = v.as_slice()[..header]
        .iter()
        .enumerate()
        .filter(|(_, bit)| **bit == 1)
        .fold(0u128, |k, (i, _)| k | (1u128 << i));
    (raw % body_len as u128) as usize
}

fn encode_header(k: usize, header: usize, out: &mut Vec<i8>) {
    out.extend((0..header).map(|i| if (k >> i) & 1 == 1 { 1 } else { -1 }));
}

/// Rewrite the header so it stores its own shift modulo the body length
///
/// Binding output is always canonical; this brings arbitrary vectors into
/// the same form so round trips are exact.
pub fn canonicalize(v: &Hypervector) -> Hypervector {
    let (header, _) = header_params(v.dim());
    let mut out = Vec::with_capacity(v.dim());
    encode_header(decode_shift(v), header, &mut out);
    out.extend_from_slice(&v.as_slice()[header..]);
    Hypervector::from_vec_unchecked(out)
}

/// Bind a role vector to a filler vector (⊗)
///
/// Fails with `DimensionMismatch` if the lengths differ.
pub fn bind(role: &Hypervector, filler: &Hypervector) -> Result<Hypervector> {
    ensure_same_dim(role.dim(), filler.dim())?;

    let (header, body_len) = header_params(role.dim());
    let k_role = decode_shift(role);
    let k_new = (k_role + decode_shift(filler)) % body_len;

    let mut body = filler.as_slice()[header..].to_vec();
    body.rotate_right(k_role);

    let mut out = Vec::with_capacity(role.dim());
    encode_header(k_new, header, &mut out);
    out.extend(body);

    Ok(Hypervector::from_vec_unchecked(out))
}

/// Reverse a binding (⊘) with the role vector used at bind time
///
/// Fails with `DimensionMismatch` if the lengths differ.
pub fn unbind(bound: &Hypervector, role: &Hypervector) -> Result<Hypervector> {
    ensure_same_dim(role.dim(), bound.dim())?;

    let (header, body_len) = header_params(role.dim());
    let k_role = decode_shift(role);
    let k_filler = (decode_shift(bound) + body_len - k_role) % body_len;

    let mut body = bound.as_slice()[header..].to_vec();
    body.rotate_left(k_role);

    let mut out = Vec::with_capacity(role.dim());
    encode_header(k_filler, header, &mut out);
    out.extend(body);

    Ok(Hypervector::from_vec_unchecked(out))
}

// ============================================================================
// Role References
// ============================================================================

/// A role given either by name or as an explicit vector
#[derive(Debug, Clone, Copy)]
pub enum RoleRef<'a> {
    Name(&'a str),
    Vector(&'a Hypervector),
}

impl<'a> RoleRef<'a> {
    /// Resolve to a vector, looking names up in `basis`
    pub fn resolve(self, basis: &'a RoleBasis) -> Result<&'a Hypervector> {
        match self {
            Self::Name(name) => basis.get_vector(name),
            Self::Vector(v) => Ok(v),
        }
    }
}

impl<'a> From<&'a str> for RoleRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a Hypervector> for RoleRef<'a> {
    fn from(v: &'a Hypervector) -> Self {
        Self::Vector(v)
    }
}

impl<'a> From<Role> for RoleRef<'a> {
    fn from(role: Role) -> Self {
        Self::Name(role.as_str())
    }
}

/// Bind with a role resolved against `basis`
pub fn bind_role<'a>(
    basis: &'a RoleBasis,
    role: impl Into<RoleRef<'a>>,
    filler: &Hypervector,
) -> Result<Hypervector> {
    let role = role.into();
    debug!(?role, "bind");
    bind(role.resolve(basis)?, filler)
}

/// Unbind with a role resolved against `basis`
pub fn unbind_role<'a>(
    basis: &'a RoleBasis,
    bound: &Hypervector,
    role: impl Into<RoleRef<'a>>,
) -> Result<Hypervector> {
    unbind(bound, role.into().resolve(basis)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::{standard_basis, RoleBasis, DEFAULT_DIM};
    use crate::HydraEdgeError;

    fn filler(seed: u64) -> Hypervector {
        canonicalize(&Hypervector::random(DEFAULT_DIM, seed).unwrap())
    }

    #[test]
    fn test_header_params() {
        assert_eq!(header_params(4096), (12, 4084));
        assert_eq!(header_params(16), (4, 12));
        assert_eq!(header_params(17), (5, 12));
        assert_eq!(header_params(1), (0, 1));
    }

    #[test]
    fn test_header_out_of_range_wraps() {
        // All-ones header on D=16 stores 15, body_len is 12
        let v = Hypervector::ones(16).unwrap();
        assert_eq!(decode_shift(&v), 3);

        let c = canonicalize(&v);
        assert_eq!(decode_shift(&c), 3);
        assert_eq!(&c.as_slice()[..4], &[1i8, 1, -1, -1]);
        assert_eq!(&c.as_slice()[4..], &v.as_slice()[4..]);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let basis = standard_basis();
        for (seed, (_, role)) in basis.iter().enumerate() {
            let f = filler(seed as u64 + 100);
            let bound = bind(role, &f).unwrap();
            assert_eq!(unbind(&bound, role).unwrap(), f);
        }
    }

    #[test]
    fn test_round_trip_of_non_canonical_filler() {
        let basis = standard_basis();
        let role = basis.get(Role::Object).unwrap();
        // Subject's all-ones header is out of range at D=4096
        let raw = basis.get(Role::Subject).unwrap();
        assert_ne!(&canonicalize(raw), raw);

        let bound = bind(role, raw).unwrap();
        assert_eq!(unbind(&bound, role).unwrap(), canonicalize(raw));
    }

    #[test]
    fn test_associativity() {
        let basis = standard_basis();
        let x = filler(3);

        for (_, r) in basis.iter() {
            for (_, s) in basis.iter() {
                let left = bind(r, &bind(s, &x).unwrap()).unwrap();
                let right = bind(&bind(r, s).unwrap(), &x).unwrap();
                assert_eq!(left, right);
            }
        }
    }

    #[test]
    fn test_non_commutative() {
        let basis = standard_basis();
        let r = basis.get(Role::Subject).unwrap();
        let s = basis.get(Role::Predicate).unwrap();
        assert_ne!(bind(r, s).unwrap(), bind(s, r).unwrap());
    }

    #[test]
    fn test_bound_is_dissimilar_to_filler() {
        let basis = standard_basis();
        let f = filler(9);
        let bound = bind(basis.get(Role::Predicate).unwrap(), &f).unwrap();
        assert!(bound.cosine(&f).unwrap().abs() < 0.1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Hypervector::ones(64).unwrap();
        let b = Hypervector::ones(128).unwrap();
        assert!(matches!(bind(&a, &b), Err(HydraEdgeError::DimensionMismatch { .. })));
        assert!(matches!(unbind(&b, &a), Err(HydraEdgeError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_role_ref_by_name_and_vector() {
        let basis = RoleBasis::standard(256).unwrap();
        let f = canonicalize(&Hypervector::random(256, 5).unwrap());

        let by_name = bind_role(&basis, "Object", &f).unwrap();
        let by_role = bind_role(&basis, Role::Object, &f).unwrap();
        let by_vec = bind_role(&basis, basis.get(Role::Object).unwrap(), &f).unwrap();
        assert_eq!(by_name, by_role);
        assert_eq!(by_name, by_vec);

        assert_eq!(unbind_role(&basis, &by_name, "Object").unwrap(), f);
        assert!(matches!(
            bind_role(&basis, "Agent", &f),
            Err(HydraEdgeError::UnknownRole { .. })
        ));
    }
}
