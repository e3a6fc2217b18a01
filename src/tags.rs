//! # Tag normalization
//! Tag parsers and the canonical keyword form shared by ranking, mention
//! extraction and issue-title dedup.
//!
//! Tags reach us in whatever shape the upstream processor stored them:
//! - a JSON array of strings: `["Vaksin", "BPOM"]`
//! - a JSON array of records: `[{"name": "Vaksin"}]`
//! - either of the above, JSON-encoded into a string
//! - a plain comma-separated string: `"Vaksin, BPOM"`
//!
//! Parsing never fails; unreadable input yields an empty list.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;

fn non_alnum_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("non-alnum regex"))
}

/// Lowercase, keep Unicode letters/digits only, collapse separators to one space.
///
/// Idempotent: `normalize_keyword(&normalize_keyword(x)) == normalize_keyword(x)`.
pub fn normalize_keyword(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let spaced = non_alnum_re().replace_all(&lower, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title key used to drop repeated issue lines. Same rule as keywords.
pub fn normalize_title(title: &str) -> String {
    normalize_keyword(title)
}

/// Parse a raw tag container into trimmed, non-blank tags (duplicates kept).
pub fn parse_tags(raw: &Value) -> Vec<String> {
    match raw {
        Value::Null => Vec::new(),
        Value::Array(items) => collect_items(items),
        Value::Object(_) => name_of(raw).into_iter().collect(),
        Value::String(s) => parse_tag_string(s),
        // Scalars are never tag containers.
        Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

/// String path: JSON first, comma-separated fallback.
pub fn parse_tag_string(s: &str) -> Vec<String> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }

    if let Ok(node) = serde_json::from_str::<Value>(s) {
        return match &node {
            Value::Array(items) => collect_items(items),
            Value::Object(_) => name_of(&node).into_iter().collect(),
            _ => Vec::new(),
        };
    }

    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn collect_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => clean(s),
            Value::Object(_) => name_of(item),
            _ => None,
        })
        .collect()
}

fn name_of(obj: &Value) -> Option<String> {
    match obj.get("name")? {
        Value::String(s) => clean(s),
        Value::Number(n) => clean(&n.to_string()),
        _ => None,
    }
}

fn clean(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_arrays_and_records() {
        assert_eq!(
            parse_tags(&json!([" Vaksin ", "", "BPOM"])),
            vec!["Vaksin", "BPOM"]
        );
        assert_eq!(
            parse_tags(&json!([{"name": "Kalbe"}, {"label": "x"}, {"name": "  "}, 3])),
            vec!["Kalbe"]
        );
    }

    #[test]
    fn parses_json_encoded_strings() {
        assert_eq!(parse_tags(&json!(r#"["a b", "c"]"#)), vec!["a b", "c"]);
        assert_eq!(parse_tags(&json!(r#"[{"name":"Kimia Farma"}]"#)), vec!["Kimia Farma"]);
        assert_eq!(parse_tags(&json!(r#"{"name":"Solo"}"#)), vec!["Solo"]);
    }

    #[test]
    fn falls_back_to_comma_split() {
        assert_eq!(
            parse_tags(&json!("Vaksin, BPOM ,, izin edar")),
            vec!["Vaksin", "BPOM", "izin edar"]
        );
        // broken JSON degrades to comma split as well
        assert_eq!(parse_tags(&json!(r#"["a", "b""#)), vec![r#"["a""#, r#""b""#]);
    }

    #[test]
    fn scalars_and_blanks_are_empty() {
        assert!(parse_tags(&Value::Null).is_empty());
        assert!(parse_tags(&json!("   ")).is_empty());
        assert!(parse_tags(&json!("123")).is_empty());
        assert!(parse_tags(&json!(true)).is_empty());
        assert!(parse_tags(&json!(42)).is_empty());
    }

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize_keyword("  Izin-Edar!!  BPOM "), "izin edar bpom");
        assert_eq!(normalize_keyword("Phase   III"), "phase iii");
        assert_eq!(normalize_keyword("---"), "");
        assert_eq!(normalize_keyword("Obat_Generik"), "obat generik");
        assert_eq!(normalize_keyword("백신 (Vaksin)"), "백신 vaksin");
    }

    #[test]
    fn normalize_is_idempotent_on_samples() {
        for s in ["Clinical Trial — Phase II", "İzin", "  a  b ", "Ünïcödé-Tag", "123"] {
            let once = normalize_keyword(s);
            assert_eq!(normalize_keyword(&once), once, "input {s:?}");
        }
    }
}
