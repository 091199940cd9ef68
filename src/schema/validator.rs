//! Payload validation
//!
//! Validates a sentence-graph payload in two stages. The shape check runs
//! first; if it finds anything the report is returned as is, since typed
//! checks on a malformed payload would only produce noise. Otherwise the
//! semantic rules run and accumulate.
//!
//! ## Rules
//!
//! - **V1**: `version`, if present, is the supported version
//! - **N1 / N2**: node ids are unique, node types are known
//! - **E0**: edge endpoints exist
//! - **S1**: `S-P` / `P-O` never cross events
//! - **S2 / S2b**: `event-pred` is event → spo of the same event, `subevt` is spo → spo
//! - **S3 / S4 / S5**: `attr`, `meta`, `binder` endpoint types
//! - **S6**: exactly one `chv` node
//! - **S7**: edge kind is known
//! - **H1**: hull members exist
//! - **S8**: every node is reachable from the `chv` node (only checked once
//!   the edges themselves pass E0 and S1–S7)

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::payload::{Edge, EdgeKind, Node, NodeType, SentencePayload, SUPPORTED_VERSION};
use super::shape::check_shape;
use crate::{HydraEdgeError, Result};

/// Rule that produced a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    Schema,
    V1,
    N1,
    N2,
    E0,
    S1,
    S2,
    S2b,
    S3,
    S4,
    S5,
    S6,
    S7,
    H1,
    S8,
}

impl Rule {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema => "Schema",
            Self::V1 => "V1",
            Self::N1 => "N1",
            Self::N2 => "N2",
            Self::E0 => "E0",
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S2b => "S2b",
            Self::S3 => "S3",
            Self::S4 => "S4",
            Self::S5 => "S5",
            Self::S6 => "S6",
            Self::S7 => "S7",
            Self::H1 => "H1",
            Self::S8 => "S8",
        }
    }

    /// Rules about the edge set; any of these makes reachability meaningless
    pub fn is_edge_rule(&self) -> bool {
        matches!(
            self,
            Self::E0
                | Self::S1
                | Self::S2
                | Self::S2b
                | Self::S3
                | Self::S4
                | Self::S5
                | Self::S6
                | Self::S7
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
    /// Node ids involved
    pub nodes: Vec<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Violation {
    fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            nodes: Vec::new(),
            suggestion: None,
        }
    }

    fn with_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes = nodes.into_iter().map(Into::into).collect();
        self
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)?;
        if let Some(ref sug) = self.suggestion {
            write!(f, "; {}", sug)?;
        }
        Ok(())
    }
}

/// Outcome of validating one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    /// Human-readable messages, each prefixed with its rule code
    pub errors: Vec<String>,
    #[serde(skip)]
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            errors: violations.iter().map(ToString::to_string).collect(),
            violations,
        }
    }

    /// True if any violation came from `rule`
    pub fn has_rule(&self, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }

    /// Convert to `Err(Payload)` listing every message, or `Ok(())` if clean
    pub fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(HydraEdgeError::Payload(format!(
                "Validation errors:\n{}",
                self.errors.join("\n")
            )))
        }
    }
}

/// Validate a parsed payload
///
/// Findings are data in the report. The only error is input that is not a
/// JSON object.
pub fn validate(payload: &Value) -> Result<ValidationReport> {
    let shape_errors = check_shape(payload)?;
    if !shape_errors.is_empty() {
        warn!(count = shape_errors.len(), "payload failed shape check");
        let violations = shape_errors
            .into_iter()
            .map(|msg| Violation::new(Rule::Schema, msg.trim_start_matches("Schema: ")))
            .collect();
        return Ok(ValidationReport::from_violations(violations));
    }

    let typed = match SentencePayload::from_value(payload.clone()) {
        Ok(typed) => typed,
        Err(e) => {
            return Ok(ValidationReport::from_violations(vec![Violation::new(
                Rule::Schema,
                e.to_string(),
            )]))
        }
    };

    Ok(validate_payload(&typed))
}

/// Run the semantic rules on an already typed payload
pub fn validate_payload(payload: &SentencePayload) -> ValidationReport {
    let mut violations = Vec::new();

    check_version(payload, &mut violations);
    check_nodes(payload, &mut violations);

    let index = payload.node_index();
    let chv = check_single_chv(payload, &mut violations);

    for (i, edge) in payload.edges.iter().enumerate() {
        check_edge(edge, i, &index, &mut violations);
    }

    if !violations.iter().any(|v| v.rule.is_edge_rule()) {
        if let Some(chv) = chv {
            check_connectivity(payload, chv, &mut violations);
        }
    }

    check_hulls(payload, &index, &mut violations);

    let report = ValidationReport::from_violations(violations);
    if report.ok {
        debug!(nodes = payload.nodes.len(), edges = payload.edges.len(), "payload valid");
    } else {
        warn!(count = report.errors.len(), "payload failed validation");
    }
    report
}

fn check_version(payload: &SentencePayload, out: &mut Vec<Violation>) {
    if let Some(ref version) = payload.version {
        if version != SUPPORTED_VERSION {
            out.push(
                Violation::new(
                    Rule::V1,
                    format!("unsupported payload version '{}'", version),
                )
                .with_suggestion(format!("expected '{}'", SUPPORTED_VERSION)),
            );
        }
    }
}

fn check_nodes(payload: &SentencePayload, out: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for node in &payload.nodes {
        if !seen.insert(node.id.as_str()) {
            out.push(
                Violation::new(Rule::N1, format!("duplicate node id '{}'", node.id))
                    .with_nodes([node.id.as_str()]),
            );
        }
        if node.node_type().is_none() {
            out.push(
                Violation::new(
                    Rule::N2,
                    format!("node '{}' has unknown ntype '{}'", node.id, node.ntype),
                )
                .with_nodes([node.id.as_str()]),
            );
        }
    }
}

fn check_single_chv<'a>(payload: &'a SentencePayload, out: &mut Vec<Violation>) -> Option<&'a Node> {
    let chv: Vec<&Node> = payload.nodes_of_type(NodeType::Chv).collect();
    if chv.len() == 1 {
        return Some(chv[0]);
    }

    let ids: Vec<&str> = chv.iter().map(|n| n.id.as_str()).collect();
    let message = if ids.is_empty() {
        "exactly one chv node required (found 0)".to_string()
    } else {
        format!("exactly one chv node required (found {}: {})", ids.len(), quoted(&ids))
    };
    out.push(Violation::new(Rule::S6, message).with_nodes(ids));
    None
}

fn check_edge(edge: &Edge, position: usize, index: &HashMap<&str, &Node>, out: &mut Vec<Violation>) {
    let label = edge.id.clone().unwrap_or_else(|| format!("#{}", position));

    let Some(kind) = edge.edge_kind() else {
        out.push(Violation::new(
            Rule::S7,
            format!("unknown edge kind '{}' (edge {})", edge.kind, label),
        ));
        return;
    };

    let (src, tgt) = match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
        (Some(src), Some(tgt)) => (*src, *tgt),
        (src, tgt) => {
            let missing: Vec<&str> = [(src, &edge.source), (tgt, &edge.target)]
                .into_iter()
                .filter(|(node, _)| node.is_none())
                .map(|(_, id)| id.as_str())
                .collect();
            out.push(
                Violation::new(
                    Rule::E0,
                    format!("{} edge {} references missing node {}", kind, label, quoted(&missing)),
                )
                .with_nodes(missing),
            );
            return;
        }
    };

    match kind {
        EdgeKind::SubjectPredicate | EdgeKind::PredicateObject => {
            if !src.shares_event_with(tgt) {
                out.push(
                    Violation::new(
                        Rule::S1,
                        format!(
                            "{} edge crosses events: '{}' {} → '{}' {}",
                            kind,
                            src.id,
                            eid_set(src),
                            tgt.id,
                            eid_set(tgt)
                        ),
                    )
                    .with_nodes([src.id.as_str(), tgt.id.as_str()])
                    .with_suggestion("use event-pred instead"),
                );
            }
        }
        EdgeKind::EventPred => check_event_pred(src, tgt, out),
        EdgeKind::Subevt => expect_types(Rule::S2b, kind, src, tgt, NodeType::Spo, NodeType::Spo, out),
        EdgeKind::Attr => expect_types(Rule::S3, kind, src, tgt, NodeType::Attr, NodeType::Spo, out),
        EdgeKind::Meta => expect_types(Rule::S4, kind, src, tgt, NodeType::MetaOut, NodeType::Chv, out),
        EdgeKind::Binder => expect_types(Rule::S5, kind, src, tgt, NodeType::Spo, NodeType::Chv, out),
    }
}

fn check_event_pred(src: &Node, tgt: &Node, out: &mut Vec<Violation>) {
    if src.node_type() != Some(NodeType::Event) || tgt.node_type() != Some(NodeType::Spo) {
        expect_types(Rule::S2, EdgeKind::EventPred, src, tgt, NodeType::Event, NodeType::Spo, out);
        return;
    }

    match src.single_eid() {
        None => out.push(
            Violation::new(
                Rule::S2,
                format!("event node '{}' has no single eid {}", src.id, eid_set(src)),
            )
            .with_nodes([src.id.as_str()]),
        ),
        Some(eid) if !tgt.eid_set.iter().any(|e| e == eid) => out.push(
            Violation::new(
                Rule::S2,
                format!(
                    "event-pred eid mismatch: '{}' ({}) is not in '{}' {}",
                    src.id,
                    eid,
                    tgt.id,
                    eid_set(tgt)
                ),
            )
            .with_nodes([src.id.as_str(), tgt.id.as_str()]),
        ),
        Some(_) => {}
    }
}

fn expect_types(
    rule: Rule,
    kind: EdgeKind,
    src: &Node,
    tgt: &Node,
    want_src: NodeType,
    want_tgt: NodeType,
    out: &mut Vec<Violation>,
) {
    if src.node_type() == Some(want_src) && tgt.node_type() == Some(want_tgt) {
        return;
    }
    out.push(
        Violation::new(
            rule,
            format!(
                "{} edge must be {} → {} (got '{}' {} → '{}' {})",
                kind, want_src, want_tgt, src.id, src.ntype, tgt.id, tgt.ntype
            ),
        )
        .with_nodes([src.id.as_str(), tgt.id.as_str()]),
    );
}

fn check_hulls(payload: &SentencePayload, index: &HashMap<&str, &Node>, out: &mut Vec<Violation>) {
    for (i, hull) in payload.layouts.hulls.iter().enumerate() {
        let missing: Vec<&str> = hull
            .members
            .iter()
            .map(String::as_str)
            .filter(|id| !index.contains_key(id))
            .collect();
        if missing.is_empty() {
            continue;
        }

        let label = hull.eid.clone().unwrap_or_else(|| format!("#{}", i));
        out.push(
            Violation::new(
                Rule::H1,
                format!("hull {} references missing node {}", label, quoted(&missing)),
            )
            .with_nodes(missing),
        );
    }
}

/// Undirected BFS from the chv node
fn check_connectivity(payload: &SentencePayload, chv: &Node, out: &mut Vec<Violation>) {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &payload.edges {
        adjacency.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
        adjacency.entry(edge.target.as_str()).or_default().push(edge.source.as_str());
    }

    let mut seen: HashSet<&str> = HashSet::from([chv.id.as_str()]);
    let mut queue = VecDeque::from([chv.id.as_str()]);
    while let Some(id) = queue.pop_front() {
        for &next in adjacency.get(id).into_iter().flatten() {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let unreachable: Vec<&str> = payload
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| !seen.contains(id))
        .collect();

    if !unreachable.is_empty() {
        out.push(
            Violation::new(
                Rule::S8,
                format!(
                    "nodes not reachable from chv node '{}': {}",
                    chv.id,
                    quoted(&unreachable)
                ),
            )
            .with_nodes(unreachable),
        );
    }
}

fn eid_set(node: &Node) -> String {
    format!("{{{}}}", node.eid_set.join(", "))
}

fn quoted(ids: &[&str]) -> String {
    ids.iter()
        .map(|id| format!("'{}'", id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// "The white dog chased the cat." with one event and past tense
    fn valid_payload() -> Value {
        json!({
            "version": "2.4",
            "sentence": "The white dog chased the cat.",
            "nodes": [
                {"id": "n1", "ntype": "spo", "filler": "dog", "roles": ["Subject"], "eid_set": ["e1"]},
                {"id": "n2", "ntype": "spo", "filler": "chase", "roles": ["Predicate"], "eid_set": ["e1"]},
                {"id": "n3", "ntype": "spo", "filler": "cat", "roles": ["Object"], "eid_set": ["e1"]},
                {"id": "a1", "ntype": "attr", "filler": "white", "roles": ["Attr"], "eid_set": ["e1"]},
                {"id": "ev1", "ntype": "event", "eid": "e1", "eid_set": ["e1"]},
                {"id": "m1", "ntype": "meta_out", "filler": "past", "roles": ["Tense"]},
                {"id": "chv", "ntype": "chv"}
            ],
            "edges": [
                {"id": "r1", "source": "n1", "target": "n2", "kind": "S-P"},
                {"id": "r2", "source": "n2", "target": "n3", "kind": "P-O"},
                {"id": "r3", "source": "a1", "target": "n1", "kind": "attr"},
                {"id": "r4", "source": "ev1", "target": "n2", "kind": "event-pred"},
                {"id": "r5", "source": "n2", "target": "chv", "kind": "binder"},
                {"id": "r6", "source": "m1", "target": "chv", "kind": "meta"}
            ],
            "layouts": {"hulls": [{"eid": "e1", "members": ["n1", "n2", "n3"]}]}
        })
    }

    fn nodes_mut(payload: &mut Value) -> &mut Vec<Value> {
        payload["nodes"].as_array_mut().unwrap()
    }

    fn edges_mut(payload: &mut Value) -> &mut Vec<Value> {
        payload["edges"].as_array_mut().unwrap()
    }

    #[test]
    fn test_valid_payload() {
        let report = validate(&valid_payload()).unwrap();
        assert!(report.ok, "Expected no errors, got: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_nested_subevent_is_valid() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload).push(json!(
            {"id": "n4", "ntype": "spo", "filler": "bark", "roles": ["Predicate"], "eid_set": ["e2"]}
        ));
        nodes_mut(&mut payload).push(json!({"id": "ev2", "ntype": "event", "eid_set": ["e2"]}));
        edges_mut(&mut payload).push(json!({"source": "n2", "target": "n4", "kind": "subevt"}));
        edges_mut(&mut payload).push(json!({"source": "ev2", "target": "n4", "kind": "event-pred"}));

        let report = validate(&payload).unwrap();
        assert!(report.ok, "{:?}", report.errors);
    }

    #[test]
    fn test_cross_event_subject_predicate() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload)[1]["eid_set"] = json!(["e2"]);

        let report = validate(&payload).unwrap();
        assert!(!report.ok);
        let s1 = report.errors.iter().find(|e| e.starts_with("S1")).unwrap();
        assert!(s1.contains("'n1'") && s1.contains("'n2'"));
        assert!(s1.contains("{e1}") && s1.contains("{e2}"));
        assert!(s1.contains("use event-pred instead"));
    }

    #[test]
    fn test_two_chv_nodes() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload).push(json!({"id": "chv2", "ntype": "chv"}));
        edges_mut(&mut payload).push(json!({"source": "m1", "target": "chv2", "kind": "meta"}));

        let report = validate(&payload).unwrap();
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.starts_with("S6")));
        assert!(!report.has_rule(Rule::S8), "S6 suppresses connectivity");
    }

    #[test]
    fn test_unknown_edge_kind() {
        let mut payload = valid_payload();
        edges_mut(&mut payload).push(json!({"source": "n1", "target": "n3", "kind": "made_up_kind"}));

        let report = validate(&payload).unwrap();
        assert!(!report.ok);
        let s7 = report.errors.iter().find(|e| e.starts_with("S7")).unwrap();
        assert!(s7.contains("'made_up_kind'"));
    }

    #[test]
    fn test_orphan_node() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload).push(json!(
            {"id": "a2", "ntype": "attr", "filler": "big", "roles": ["Attr"], "eid_set": ["e1"]}
        ));

        let report = validate(&payload).unwrap();
        assert!(!report.ok);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("S8"));
        assert!(report.errors[0].contains("'a2'"));
    }

    #[test]
    fn test_connectivity_checked_despite_version_mismatch() {
        let payload = json!({
            "version": "2.5",
            "sentence": "Dogs.",
            "nodes": [
                {"id": "s", "ntype": "spo", "filler": "dogs", "roles": ["Subject"], "eid_set": ["e1"]},
                {"id": "orphan", "ntype": "attr", "filler": "loud", "roles": ["Attr"]},
                {"id": "chv", "ntype": "chv"}
            ],
            "edges": [{"source": "s", "target": "chv", "kind": "binder"}],
            "layouts": {"hulls": [{"eid": "e1", "members": ["s", "ghost"]}]}
        });

        let report = validate(&payload).unwrap();
        assert!(report.has_rule(Rule::V1));
        assert!(report.has_rule(Rule::H1));
        assert!(report.has_rule(Rule::S8), "{:?}", report.errors);
        let s8 = report.errors.iter().find(|e| e.starts_with("S8")).unwrap();
        assert!(s8.contains("'orphan'"));
    }

    #[test]
    fn test_edge_findings_suppress_connectivity() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload).push(json!({"id": "lonely", "ntype": "attr"}));
        edges_mut(&mut payload).push(json!({"source": "n1", "target": "n3", "kind": "made_up_kind"}));

        let report = validate(&payload).unwrap();
        assert!(report.has_rule(Rule::S7));
        assert!(!report.has_rule(Rule::S8));
    }

    #[test]
    fn test_missing_chv_message() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload).retain(|n| n["ntype"] != "chv");

        let report = validate(&payload).unwrap();
        let s6 = report.errors.iter().find(|e| e.starts_with("S6")).unwrap();
        assert_eq!(s6, "S6: exactly one chv node required (found 0)");
        assert!(!report.has_rule(Rule::S8));
    }

    #[test]
    fn test_integer_event_ids() {
        let mut payload = valid_payload();
        for node in nodes_mut(&mut payload).iter_mut() {
            if node.get("eid_set").is_some() {
                node["eid_set"] = json!([1]);
            }
        }
        nodes_mut(&mut payload)[4]["eid"] = json!(1);
        payload["layouts"]["hulls"][0]["eid"] = json!(1);

        let report = validate(&payload).unwrap();
        assert!(report.ok, "{:?}", report.errors);

        // 1 and "1" name the same event
        nodes_mut(&mut payload)[1]["eid_set"] = json!(["1"]);
        assert!(validate(&payload).unwrap().ok);

        nodes_mut(&mut payload)[1]["eid_set"] = json!([2]);
        let report = validate(&payload).unwrap();
        let s1 = report.errors.iter().find(|e| e.starts_with("S1")).unwrap();
        assert!(s1.contains("{1}") && s1.contains("{2}"));
    }

    #[test]
    fn test_endpoint_type_rules() {
        let mut payload = valid_payload();
        let edges = edges_mut(&mut payload);
        edges[2]["source"] = json!("n3"); // attr from spo
        edges[4]["source"] = json!("a1"); // binder from attr
        edges[5]["source"] = json!("n1"); // meta from spo
        edges.push(json!({"source": "n1", "target": "chv", "kind": "subevt"}));
        edges.push(json!({"source": "n1", "target": "n2", "kind": "event-pred"}));

        let report = validate(&payload).unwrap();
        for rule in [Rule::S2, Rule::S2b, Rule::S3, Rule::S4, Rule::S5] {
            assert!(report.has_rule(rule), "missing {}: {:?}", rule, report.errors);
        }
    }

    #[test]
    fn test_event_pred_eid_mismatch() {
        let mut payload = valid_payload();
        nodes_mut(&mut payload)[4]["eid"] = json!("e9");

        let report = validate(&payload).unwrap();
        let s2 = report.errors.iter().find(|e| e.starts_with("S2:")).unwrap();
        assert!(s2.contains("e9"));
        assert!(s2.contains("'n2'"));
    }

    #[test]
    fn test_event_without_single_eid() {
        let mut payload = valid_payload();
        let ev = &mut nodes_mut(&mut payload)[4];
        ev.as_object_mut().unwrap().remove("eid");
        ev["eid_set"] = json!(["e1", "e2"]);

        let report = validate(&payload).unwrap();
        assert!(report.errors.iter().any(|e| e.contains("no single eid")));
    }

    #[test]
    fn test_identity_rules() {
        let mut payload = valid_payload();
        payload["version"] = json!("2.3");
        nodes_mut(&mut payload).push(json!({"id": "n1", "ntype": "spo", "eid_set": ["e1"]}));
        nodes_mut(&mut payload).push(json!({"id": "x1", "ntype": "widget"}));
        edges_mut(&mut payload).push(json!({"source": "n1", "target": "ghost", "kind": "S-P"}));
        payload["layouts"]["hulls"][0]["members"] = json!(["n1", "phantom"]);

        let report = validate(&payload).unwrap();
        for rule in [Rule::V1, Rule::N1, Rule::N2, Rule::E0, Rule::H1] {
            assert!(report.has_rule(rule), "missing {}: {:?}", rule, report.errors);
        }
        assert!(report.errors.iter().any(|e| e.contains("'ghost'")));
        assert!(report.errors.iter().any(|e| e.contains("'phantom'")));
    }

    #[test]
    fn test_shape_errors_short_circuit() {
        let payload = json!({
            "sentence": "x",
            "nodes": [{"id": "chv"}],
            "edges": [{"source": "chv", "target": "nowhere", "kind": "made_up_kind"}]
        });

        let report = validate(&payload).unwrap();
        assert!(!report.ok);
        assert!(report.violations.iter().all(|v| v.rule == Rule::Schema));
        assert!(report.errors[0].starts_with("Schema: nodes[0]"));
    }

    #[test]
    fn test_non_object_payload() {
        assert!(matches!(validate(&json!([1, 2])), Err(HydraEdgeError::Payload(_))));
    }

    #[test]
    fn test_into_result() {
        assert!(validate(&valid_payload()).unwrap().into_result().is_ok());

        let mut payload = valid_payload();
        nodes_mut(&mut payload).push(json!({"id": "lonely", "ntype": "attr"}));
        let err = validate(&payload).unwrap().into_result().unwrap_err();
        assert!(err.to_string().contains("S8"));
    }
}
