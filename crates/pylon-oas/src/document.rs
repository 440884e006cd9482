//! Specification document model and loading.
//!
//! This module provides the typed model of an OpenAPI-style specification
//! document and the [`SpecLoader`] that reads one from a file, a string, or
//! an already-parsed JSON value.
//!
//! Every loader constructor dereferences the document before returning:
//! internal `$ref` pointers are resolved to inline schemas, so the document
//! handed to request-handling code is always fully resolved. There is no
//! window during which a request could be validated against a
//! partially-resolved specification.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::deref::dereference;
use crate::error::{SpecError, SpecResult};

/// The specification's path table: URL path template to path item.
///
/// Entry order follows the declaration order in the source document.
pub type PathTable = IndexMap<String, PathItem>;

/// A fully dereferenced specification document.
///
/// Immutable after construction; share it as an `Arc<SpecDocument>` across
/// in-flight requests. No writer exists after loading, so concurrent reads
/// need no synchronization.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecDocument {
    /// OpenAPI version string (3.x documents).
    #[serde(default)]
    pub openapi: Option<String>,
    /// Swagger version string (2.0 documents).
    #[serde(default)]
    pub swagger: Option<String>,
    /// The `info` block, kept opaque for downstream consumers.
    #[serde(default)]
    pub info: Option<Value>,
    /// Path template to path item, in declaration order.
    #[serde(default)]
    pub paths: PathTable,
    /// The `components` block. After dereferencing it is only carried
    /// so downstream consumers see the complete document.
    #[serde(default)]
    pub components: Option<Value>,
}

/// The operations declared for a single path template.
///
/// Only HTTP method keys are modeled; other path-item keys in the source
/// document are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    /// GET operation, if declared.
    pub get: Option<Operation>,
    /// PUT operation, if declared.
    pub put: Option<Operation>,
    /// POST operation, if declared.
    pub post: Option<Operation>,
    /// DELETE operation, if declared.
    pub delete: Option<Operation>,
    /// OPTIONS operation, if declared.
    pub options: Option<Operation>,
    /// HEAD operation, if declared.
    pub head: Option<Operation>,
    /// PATCH operation, if declared.
    pub patch: Option<Operation>,
    /// TRACE operation, if declared.
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Looks up the operation declared for `method`.
    ///
    /// `method` must already be lower-cased; any unknown method yields
    /// `None`.
    #[must_use]
    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            "trace" => self.trace.as_ref(),
            _ => None,
        }
    }

    /// Iterates over the declared (method, operation) pairs.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

/// A single operation: one (path, method) pair in the specification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Operation ID, if declared.
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Declared parameters, in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

/// A declared parameter of an operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name, unique within its operation and location.
    pub name: String,
    /// Where the parameter is carried.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter must be present.
    #[serde(default)]
    pub required: bool,
    /// JSON-Schema-like description of the expected value.
    ///
    /// Kept as an opaque value: the schema engine owns its
    /// interpretation. Parameters without a schema are presence-checked
    /// only.
    #[serde(default)]
    pub schema: Option<Value>,
}

/// Where a parameter is carried on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query string.
    Query,
    /// Path segment. Exact-string route matching extracts no path
    /// segments, so path parameters are never observed on the request.
    Path,
    /// Request header.
    Header,
    /// Cookie header entry.
    Cookie,
    /// Request body field (2.0-style documents).
    Body,
}

impl ParameterLocation {
    /// Returns the lowercase wire name of this location.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loads specification documents from various sources.
///
/// All constructors return a fully dereferenced document.
pub struct SpecLoader;

impl SpecLoader {
    /// Loads a specification from a file.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML; anything else as JSON.
    pub async fn from_file(path: impl AsRef<Path>) -> SpecResult<SpecDocument> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading specification file");

        let content = fs::read_to_string(path).await.map_err(|e| SpecError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Loads a specification from a JSON string.
    pub fn from_json(json: &str) -> SpecResult<SpecDocument> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Loads a specification from a YAML string.
    pub fn from_yaml(yaml: &str) -> SpecResult<SpecDocument> {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let value = yaml_to_json_value(&yaml_value).map_err(SpecError::UnsupportedValue)?;
        Self::from_value(value)
    }

    /// Builds a specification from an already-parsed JSON value.
    ///
    /// Dereferences internal `$ref` pointers before deserializing into the
    /// typed model, so the returned document contains only inline schemas.
    pub fn from_value(value: Value) -> SpecResult<SpecDocument> {
        let resolved = dereference(&value)?;
        let document: SpecDocument = serde_json::from_value(resolved)?;
        info!(paths = document.paths.len(), "specification dereferenced");
        Ok(document)
    }
}

/// Converts a `serde_yaml::Value` into a `serde_json::Value`.
///
/// Specification files use only the JSON-compatible subset of YAML; tags
/// are stripped and anything without a JSON equivalent is an error.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
