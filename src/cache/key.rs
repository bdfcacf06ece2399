//! Cache key derivation.
//!
//! Keys look like `empresas:3f2a…`: the operation name, a separator, and the
//! SHA-256 of the canonical JSON of the variables. The readable prefix is
//! what prefix invalidation matches on.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub const KEY_SEPARATOR: char = ':';

/// Serialize a JSON value with object keys sorted at every depth.
///
/// Two values that are deep-equal produce the same string no matter the
/// order their keys were inserted in. Strings and numbers use serde_json's
/// own formatting, which is stable.
pub fn canonical_json(value: &Value) -> String {
  let mut out = String::new();
  write_value(&mut out, value);
  out
}

/// Key for an operation name + variables pair.
pub fn cache_key(operation_name: &str, variables: &Map<String, Value>) -> String {
  let mut hasher = Sha256::new();
  hasher.update(canonical_json(&Value::Object(variables.clone())).as_bytes());
  format!(
    "{}{}{}",
    operation_name,
    KEY_SEPARATOR,
    hex::encode(hasher.finalize())
  )
}

fn write_value(out: &mut String, value: &Value) {
  match value {
    Value::Null => out.push_str("null"),
    Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
    Value::Number(n) => out.push_str(&n.to_string()),
    Value::String(s) => write_string(out, s),
    Value::Array(items) => {
      out.push('[');
      for (i, item) in items.iter().enumerate() {
        if i > 0 {
          out.push(',');
        }
        write_value(out, item);
      }
      out.push(']');
    }
    Value::Object(map) => write_object(out, map),
  }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
  let mut entries: Vec<(&String, &Value)> = map.iter().collect();
  entries.sort_by(|a, b| a.0.cmp(b.0));

  out.push('{');
  for (i, (key, value)) in entries.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    write_string(out, key);
    out.push(':');
    write_value(out, value);
  }
  out.push('}');
}

fn write_string(out: &mut String, s: &str) {
  // Serializing a str cannot fail
  out.push_str(&Value::String(s.to_string()).to_string());
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn object(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      _ => panic!("not an object"),
    }
  }

  #[test]
  fn test_key_ignores_insertion_order() {
    let mut a = Map::new();
    a.insert("rubro".into(), json!("tech"));
    a.insert("filtro".into(), json!({"estado": "activa", "min": 100}));

    let mut inner = Map::new();
    inner.insert("min".into(), json!(100));
    inner.insert("estado".into(), json!("activa"));
    let mut b = Map::new();
    b.insert("filtro".into(), Value::Object(inner));
    b.insert("rubro".into(), json!("tech"));

    assert_eq!(cache_key("ofertasTrabajo", &a), cache_key("ofertasTrabajo", &b));
  }

  #[test]
  fn test_key_differs_on_values() {
    let a = object(json!({"id": "1"}));
    let b = object(json!({"id": "2"}));
    assert_ne!(cache_key("empresa", &a), cache_key("empresa", &b));
  }

  #[test]
  fn test_key_has_operation_prefix() {
    let key = cache_key("empresas", &Map::new());
    assert!(key.starts_with("empresas:"));
    // sha256 hex digest
    assert_eq!(key.len(), "empresas:".len() + 64);
  }

  #[test]
  fn test_canonical_json_sorts_nested_keys() {
    let value = json!({"b": [{"y": 1, "x": null}], "a": "q\"uote"});
    assert_eq!(
      canonical_json(&value),
      r#"{"a":"q\"uote","b":[{"x":null,"y":1}]}"#
    );
  }

  #[test]
  fn test_array_order_is_significant() {
    let a = object(json!({"ids": [1, 2]}));
    let b = object(json!({"ids": [2, 1]}));
    assert_ne!(cache_key("ofertasTrabajo", &a), cache_key("ofertasTrabajo", &b));
  }
}
