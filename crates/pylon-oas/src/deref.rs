//! Internal `$ref` dereferencing.
//!
//! Specification documents may describe schemas by reference
//! (`{"$ref": "#/components/schemas/Pet"}`). Request-time validation wants
//! inline schemas, so the whole document is rewritten once, ahead of
//! serving: every internal reference is replaced by the value it points
//! at, recursively.
//!
//! Only internal references (starting with `#`) are resolved. External
//! references are left untouched; whether they ever resolve is the spec
//! author's concern, not this module's.
//!
//! Reference cycles are detected via the chain of in-flight pointers and
//! reported as [`SpecError::CircularReference`] instead of recursing
//! forever.

use serde_json::Value;

use crate::error::{SpecError, SpecResult};

/// Rewrites `root` with every internal `$ref` replaced by its target.
///
/// The input is not modified; a fully resolved copy is returned.
pub fn dereference(root: &Value) -> SpecResult<Value> {
    let mut in_flight = Vec::new();
    resolve(root, root, &mut in_flight)
}

fn resolve(node: &Value, root: &Value, in_flight: &mut Vec<String>) -> SpecResult<Value> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                if !pointer.starts_with('#') {
                    // External reference, not ours to resolve.
                    return Ok(node.clone());
                }
                if in_flight.iter().any(|p| p == pointer) {
                    return Err(SpecError::CircularReference {
                        pointer: pointer.clone(),
                    });
                }
                let target = root.pointer(&pointer[1..]).ok_or_else(|| {
                    SpecError::UnresolvedReference {
                        pointer: pointer.clone(),
                    }
                })?;
                in_flight.push(pointer.clone());
                let resolved = resolve(target, root, in_flight)?;
                in_flight.pop();
                return Ok(resolved);
            }

            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), resolve(value, root, in_flight)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let resolved: SpecResult<Vec<Value>> = items
                .iter()
                .map(|item| resolve(item, root, in_flight))
                .collect();
            Ok(Value::Array(resolved?))
        }
        other => Ok(other.clone()),
    }
}
