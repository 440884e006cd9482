//! Schema validation engine seam.
//!
//! Parameter schemas are opaque JSON values; interpreting them is the job
//! of a [`SchemaEngine`]. The engine is an injected, stateless collaborator
//! rather than a process-wide singleton: middleware holds it behind an
//! `Arc<dyn SchemaEngine>` and shares it across requests without locks.
//!
//! The default engine is [`JsonSchemaEngine`], backed by the `jsonschema`
//! crate (draft 2020-12, format assertion enabled). Validators are compiled
//! per call; this module deliberately does not cache compiled schemas.

use serde_json::Value;

/// The `format` values asserted by the default engine.
///
/// Schemas referencing a format outside this list still validate (the
/// unrecognized format is simply not asserted), but callers can surface a
/// diagnostic via [`SchemaEngine::unknown_formats`].
pub const KNOWN_FORMATS: &[&str] = &[
    "date",
    "date-time",
    "time",
    "duration",
    "email",
    "hostname",
    "ipv4",
    "ipv6",
    "uri",
    "uri-reference",
    "uri-template",
    "uuid",
    "regex",
    "json-pointer",
    "relative-json-pointer",
];

/// A single schema violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON pointer to the violating location in the instance.
    pub instance_path: String,
    /// JSON pointer within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A stateless JSON-schema validation engine.
///
/// Implementations must be shareable across concurrently-handled requests
/// (`Send + Sync`); `validate` takes `&self` and holds no per-call state.
pub trait SchemaEngine: Send + Sync {
    /// Validates `value` against `schema`.
    ///
    /// Returns `Ok(())` on success, or the list of violations on failure.
    /// A schema that cannot be interpreted at all is reported as a single
    /// violation rather than a panic.
    fn validate(&self, value: &Value, schema: &Value) -> Result<(), Vec<Violation>>;

    /// The `format` values this engine asserts.
    fn known_formats(&self) -> &[&'static str];

    /// Collects the `format` values referenced by `schema` that this
    /// engine does not recognize.
    ///
    /// Unknown formats never fail validation; this exists so callers can
    /// log an informational diagnostic listing what the engine does
    /// recognize.
    fn unknown_formats(&self, schema: &Value) -> Vec<String> {
        let mut found = Vec::new();
        collect_formats(schema, &mut found);
        found.retain(|f| !self.known_formats().iter().any(|k| *k == f.as_str()));
        found
    }
}

/// Walks a schema value collecting every string under a `format` key.
fn collect_formats(schema: &Value, out: &mut Vec<String>) {
    match schema {
        Value::Object(map) => {
            for (key, value) in map {
                if key == "format" {
                    if let Value::String(format) = value {
                        if !out.contains(format) {
                            out.push(format.clone());
                        }
                    }
                } else {
                    collect_formats(value, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_formats(item, out);
            }
        }
        _ => {}
    }
}

/// The default engine, backed by the `jsonschema` crate.
///
/// Draft 2020-12 with format assertion enabled. Compiles the schema on
/// every call; no caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEngine;

impl JsonSchemaEngine {
    /// Creates the default engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SchemaEngine for JsonSchemaEngine {
    fn validate(&self, value: &Value, schema: &Value) -> Result<(), Vec<Violation>> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.should_validate_formats(true);

        let validator = opts.build(schema).map_err(|e| {
            vec![Violation {
                instance_path: String::new(),
                schema_path: String::new(),
                message: format!("schema failed to compile: {e}"),
            }]
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(value)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn known_formats(&self) -> &[&'static str] {
        KNOWN_FORMATS
    }
}
