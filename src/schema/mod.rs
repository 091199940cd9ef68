//! Sentence-graph payload schema (v2.4)
//!
//! The extraction pipeline emits one JSON payload per sentence: typed nodes
//! (`spo`, `attr`, `meta_out`, `event`, and a single `chv` anchor), typed
//! edges, and optional hull layouts grouping nodes by sub-event.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  raw text    │ ──▶ │   loader     │ ──▶ │  shape check │
//! │  (JSON)      │     │  BOM, /* */  │     │  (untyped)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                                  ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │   report     │ ◀── │  S1–S8 rules │
//!                      │ {ok, errors} │     │  (typed)     │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use hydraedge::schema;
//!
//! let report = schema::validate_str(&text)?;
//! if report.ok {
//!     let payload = schema::SentencePayload::from_value(schema::load_str(&text)?)?;
//!     let tuples = hydraedge::encoder::tuples_from_payload(&payload);
//! }
//! ```

pub mod loader;
pub mod payload;
pub mod shape;
pub mod validator;

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::Result;

pub use loader::{load_bytes, load_path, load_str, strip_comments};
pub use payload::{Edge, EdgeKind, Hull, Layouts, Node, NodeType, SentencePayload, SUPPORTED_VERSION};
pub use validator::{validate, validate_payload, Rule, ValidationReport, Violation};

/// Load payload text and validate it
pub fn validate_str(text: &str) -> Result<ValidationReport> {
    validate(&load_str(text)?)
}

/// Validate many payloads in parallel
///
/// Results are in input order; one malformed payload does not affect the
/// others.
pub fn validate_batch(payloads: &[Value]) -> Vec<Result<ValidationReport>> {
    debug!(count = payloads.len(), "validating batch");
    payloads.par_iter().map(validate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HydraEdgeError;
    use serde_json::json;

    fn tiny(extra_node: Option<Value>) -> Value {
        let mut nodes = vec![
            json!({"id": "s", "ntype": "spo", "filler": "dogs", "roles": ["Subject"], "eid_set": ["e1"]}),
            json!({"id": "chv", "ntype": "chv"}),
        ];
        nodes.extend(extra_node);
        json!({
            "sentence": "Dogs.",
            "nodes": nodes,
            "edges": [{"source": "s", "target": "chv", "kind": "binder"}]
        })
    }

    #[test]
    fn test_validate_str() {
        let text = format!("/* from extractor */ {}", tiny(None));
        assert!(validate_str(&text).unwrap().ok);
        assert!(validate_str("[]").is_err());
    }

    #[test]
    fn test_validate_batch_isolates_failures() {
        let payloads = vec![
            tiny(None),
            json!("not an object"),
            tiny(Some(json!({"id": "orphan", "ntype": "attr"}))),
        ];

        let results = validate_batch(&payloads);
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().ok);
        assert!(matches!(results[1], Err(HydraEdgeError::Payload(_))));
        let third = results[2].as_ref().unwrap();
        assert!(!third.ok);
        assert!(third.has_rule(Rule::S8));
    }
}
