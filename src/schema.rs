//! Schema dump for an arbitrary JSON document.
//!
//! Keys are listed with their JSON type; arrays are described by their first
//! element only. Example for {"repos": [{"name": "x", "stars": 3}]}:
//!
//! Top-level structure:
//! repos: array
//!
//! Structure of a single item in repos:
//!   name: string
//!   stars: integer

use crate::Result;

use anyhow::Context;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

pub const DEFAULT_INPUT: &str = "data/navikt_analysis_data.json";
pub const DEFAULT_EXPAND_KEY: &str = "repos";

pub fn load(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read json file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse json file {}", path.display()))
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::Bool(_) => "bool",
        Value::Null => "null",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpandMiss {
    Missing,
    NotNonEmptyArray,
}

/// First element of the array under `key`.
fn expand_item<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> std::result::Result<&'a Value, ExpandMiss> {
    match map.get(key) {
        None => Err(ExpandMiss::Missing),
        Some(Value::Array(items)) => items.first().ok_or(ExpandMiss::NotNonEmptyArray),
        Some(_) => Err(ExpandMiss::NotNonEmptyArray),
    }
}

/// Top-level keys, plus a detailed tree for the first element under `expand`.
pub fn describe_top_level(doc: &Value, expand: &str) -> String {
    let Value::Object(map) = doc else {
        return describe_full(doc);
    };
    let item = expand_item(map, expand);

    let mut out = String::from("Top-level structure:\n");
    for (key, value) in map {
        out.push_str(&format!("{}: {}\n", key, type_name(value)));
        if key != expand {
            continue;
        }
        if let Ok(item) = item {
            out.push_str(&format!("\nStructure of a single item in {}:\n", key));
            describe_into(&mut out, item, 1);
        }
    }

    match item {
        Ok(_) => {}
        Err(ExpandMiss::Missing) => warn!(key = expand, "expand key not found"),
        Err(ExpandMiss::NotNonEmptyArray) => {
            warn!(key = expand, "expand key is not a non-empty array")
        }
    }
    out
}

/// Whole-document tree.
pub fn describe_full(doc: &Value) -> String {
    let mut out = format!("root: {}\n", type_name(doc));
    describe_into(&mut out, doc, 1);
    out
}

fn describe_into(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                out.push_str(&format!("{}{}: {}\n", pad, key, type_name(child)));
                describe_into(out, child, indent + 1);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            out.push_str(&format!(
                "{}array[{}] -> {}\n",
                pad,
                items.len(),
                type_name(&items[0])
            ));
            describe_into(out, &items[0], indent + 1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "org": "navikt",
            "repos": [
                {
                    "name": "app",
                    "stars": 3,
                    "score": 0.5,
                    "archived": false,
                    "license": null,
                    "languages": [{"name": "Go", "bytes": 1200}],
                    "topics": []
                },
                {"name": "other"}
            ]
        })
    }

    #[test]
    fn top_level_expands_first_repo() {
        let expected = "\
Top-level structure:
org: string
repos: array

Structure of a single item in repos:
  name: string
  stars: integer
  score: float
  archived: bool
  license: null
  languages: array
    array[1] -> object
      name: string
      bytes: integer
  topics: array
";
        assert_eq!(describe_top_level(&sample(), "repos"), expected);
    }

    #[test]
    fn unknown_expand_key_lists_keys_only() {
        assert_eq!(
            describe_top_level(&sample(), "missing"),
            "Top-level structure:\norg: string\nrepos: array\n"
        );
    }

    #[test]
    fn expand_item_distinguishes_missing_from_wrong_shape() {
        let doc = json!({"repos": [], "org": "navikt", "items": [{"a": 1}]});
        let map = doc.as_object().unwrap();
        assert_eq!(expand_item(map, "missing"), Err(ExpandMiss::Missing));
        assert_eq!(expand_item(map, "repos"), Err(ExpandMiss::NotNonEmptyArray));
        assert_eq!(expand_item(map, "org"), Err(ExpandMiss::NotNonEmptyArray));
        assert_eq!(expand_item(map, "items"), Ok(&json!({"a": 1})));
    }

    #[test]
    fn full_tree_of_non_object_root() {
        let doc = json!([[1, 2], [3]]);
        assert_eq!(
            describe_top_level(&doc, "repos"),
            "root: array\n  array[2] -> array\n    array[2] -> integer\n"
        );
    }

    #[test]
    fn load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
