//! Payload loading
//!
//! Extractor output is sometimes hand-annotated, so `/* ... */` comments are
//! stripped (outside string literals) along with a leading byte-order mark
//! before parsing.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::{HydraEdgeError, Result};

const BOM: char = '\u{feff}';

/// Remove block comments that sit outside JSON strings
pub fn strip_comments(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    return Err(HydraEdgeError::Serialization("unterminated /* comment".into()));
                }
                // Keep tokens on either side apart
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Parse payload text
pub fn load_str(text: &str) -> Result<Value> {
    let cleaned = strip_comments(text.trim_start_matches(BOM))?;
    serde_json::from_str(&cleaned).map_err(|e| HydraEdgeError::Serialization(e.to_string()))
}

/// Parse payload bytes (UTF-8)
pub fn load_bytes(bytes: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| HydraEdgeError::Serialization(format!("payload is not UTF-8: {}", e)))?;
    load_str(text)
}

/// Read and parse a payload file
pub fn load_path(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading payload");
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_strip_comments() {
        let text = r#"{"a": /* note */ 1, "b": "keep /* this */"}"#;
        let value = load_str(text).unwrap();
        assert_eq!(value, json!({"a": 1, "b": "keep /* this */"}));
    }

    #[test]
    fn test_multiline_comment_and_bom() {
        let text = "\u{feff}{\n  /* extractor v3\n     run 17 */\n  \"sentence\": \"x\"\n}";
        assert_eq!(load_str(text).unwrap(), json!({"sentence": "x"}));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let text = r#"{"s": "say \"/* hi */\""}"#;
        assert_eq!(load_str(text).unwrap()["s"], json!("say \"/* hi */\""));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(load_str("{\"a\": 1 /* open"), Err(HydraEdgeError::Serialization(_))));
        assert!(matches!(load_str("{not json}"), Err(HydraEdgeError::Serialization(_))));
        assert!(matches!(load_bytes(&[0xff, 0xfe]), Err(HydraEdgeError::Serialization(_))));
    }

    #[test]
    fn test_load_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("payload.json");
        std::fs::write(&path, "/* header */ {\"sentence\": \"Dogs bark.\"}").unwrap();

        assert_eq!(load_path(&path).unwrap()["sentence"], json!("Dogs bark."));
        assert!(matches!(
            load_path(temp.path().join("missing.json")),
            Err(HydraEdgeError::Io(_))
        ));
    }
}
