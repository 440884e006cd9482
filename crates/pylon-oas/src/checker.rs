//! Required-parameter checking for a matched operation.
//!
//! Given the operation an incoming request matched and access to that
//! request's raw parameter values, [`check_parameters`] partitions the
//! operation's required parameters into those missing from the request and
//! those present but failing schema validation.
//!
//! The transport delivers every parameter value as a string, so a present
//! value is first coerced through a JSON parse (`"5"` becomes the number
//! 5, `"true"` the boolean `true`) before the schema engine sees it. A
//! value that does not parse is a [`CheckError::MalformedValue`], not a
//! panic.
//!
//! A parameter is schema-checked only if it is present; absence produces
//! exactly one `missing` entry and no validation attempt. Checking never
//! stops at the first failure: both sequences cover the whole operation,
//! in declaration order.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{Operation, ParameterLocation};
use crate::engine::SchemaEngine;
use crate::error::CheckError;

/// Access to an incoming request's raw parameter values.
///
/// The host framework implements this per request: for each declared
/// location, return the raw string value carried on the request, or
/// `None` when absent. This is the only view of the request this module
/// needs.
pub trait ParameterSource {
    /// Returns the raw value of the named parameter at `location`, if the
    /// request carries one.
    fn value(&self, location: ParameterLocation, name: &str) -> Option<String>;
}

/// A required parameter the request did not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParameter {
    /// Declared parameter name.
    pub name: String,
    /// Declared parameter location.
    pub location: ParameterLocation,
}

impl std::fmt::Display for MissingParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// The result of checking one request against one operation.
///
/// Both sequences follow the parameter declaration order in the
/// specification. Created fresh per request and discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// Required parameters absent from the request.
    pub missing: Vec<MissingParameter>,
    /// Names of parameters present but failing schema validation.
    pub invalid: Vec<String>,
}

impl ValidationOutcome {
    /// True when every required parameter was present and valid.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Checks the request's values against the operation's required parameters.
///
/// Non-required parameters are ignored entirely. Parameters declared
/// without a schema are presence-checked only.
///
/// # Errors
///
/// Returns [`CheckError::MalformedValue`] when a present value cannot be
/// coerced from its raw transport string into a JSON value.
pub fn check_parameters(
    operation: &Operation,
    source: &dyn ParameterSource,
    engine: &dyn SchemaEngine,
) -> Result<ValidationOutcome, CheckError> {
    let mut outcome = ValidationOutcome::default();

    for param in &operation.parameters {
        if !param.required {
            continue;
        }

        let Some(raw) = source.value(param.location, &param.name) else {
            outcome.missing.push(MissingParameter {
                name: param.name.clone(),
                location: param.location,
            });
            continue;
        };

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| CheckError::MalformedValue {
                name: param.name.clone(),
                location: param.location,
                reason: e.to_string(),
            })?;

        let Some(schema) = &param.schema else {
            debug!(parameter = %param.name, "no schema declared, presence check only");
            continue;
        };

        let unknown = engine.unknown_formats(schema);
        if !unknown.is_empty() {
            info!(
                parameter = %param.name,
                unrecognized = ?unknown,
                recognized = ?engine.known_formats(),
                "parameter schema references unrecognized formats"
            );
        }

        match engine.validate(&value, schema) {
            Ok(()) => {
                debug!(parameter = %param.name, "parameter value valid");
            }
            Err(violations) => {
                for violation in &violations {
                    warn!(parameter = %param.name, %violation, "parameter failed schema validation");
                }
                outcome.invalid.push(param.name.clone());
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParameterSpec;
    use crate::engine::JsonSchemaEngine;
    use serde_json::json;
    use std::collections::HashMap;

    /// Test source backed by a (location, name) map.
    #[derive(Default)]
    struct MapSource {
        values: HashMap<(ParameterLocation, String), String>,
    }

    impl MapSource {
        fn with(mut self, location: ParameterLocation, name: &str, value: &str) -> Self {
            self.values
                .insert((location, name.to_string()), value.to_string());
            self
        }
    }

    impl ParameterSource for MapSource {
        fn value(&self, location: ParameterLocation, name: &str) -> Option<String> {
            self.values.get(&(location, name.to_string())).cloned()
        }
    }

    fn required_param(name: &str, location: ParameterLocation, schema: Value) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            location,
            required: true,
            schema: Some(schema),
        }
    }

    fn operation(parameters: Vec<ParameterSpec>) -> Operation {
        Operation {
            operation_id: None,
            summary: None,
            parameters,
        }
    }

    #[test]
    fn test_absent_required_parameter_is_missing_only() {
        let op = operation(vec![required_param(
            "limit",
            ParameterLocation::Query,
            json!({ "type": "integer" }),
        )]);
        let source = MapSource::default();
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert_eq!(
            outcome.missing,
            vec![MissingParameter {
                name: "limit".to_string(),
                location: ParameterLocation::Query,
            }]
        );
        assert!(outcome.invalid.is_empty());
    }

    #[test]
    fn test_present_valid_parameter_is_clean() {
        let op = operation(vec![required_param(
            "limit",
            ParameterLocation::Query,
            json!({ "type": "integer" }),
        )]);
        let source = MapSource::default().with(ParameterLocation::Query, "limit", "5");
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_present_invalid_parameter_is_invalid_not_missing() {
        let op = operation(vec![required_param(
            "limit",
            ParameterLocation::Query,
            json!({ "type": "integer" }),
        )]);
        // A JSON string where an integer is expected.
        let source = MapSource::default().with(ParameterLocation::Query, "limit", "\"abc\"");
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.invalid, vec!["limit".to_string()]);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let op = operation(vec![required_param(
            "limit",
            ParameterLocation::Query,
            json!({ "type": "integer" }),
        )]);
        // "abc" is not parseable JSON.
        let source = MapSource::default().with(ParameterLocation::Query, "limit", "abc");
        let engine = JsonSchemaEngine::new();

        let err = check_parameters(&op, &source, &engine).unwrap_err();
        match err {
            CheckError::MalformedValue { name, location, .. } => {
                assert_eq!(name, "limit");
                assert_eq!(location, ParameterLocation::Query);
            }
        }
    }

    #[test]
    fn test_coercion_converts_string_transport_values() {
        let op = operation(vec![
            required_param("count", ParameterLocation::Query, json!({ "type": "integer" })),
            required_param("flag", ParameterLocation::Query, json!({ "type": "boolean" })),
            required_param(
                "ids",
                ParameterLocation::Query,
                json!({ "type": "array", "items": { "type": "integer" } }),
            ),
        ]);
        let source = MapSource::default()
            .with(ParameterLocation::Query, "count", "42")
            .with(ParameterLocation::Query, "flag", "true")
            .with(ParameterLocation::Query, "ids", "[1,2,3]");
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_checking_continues_past_an_invalid_parameter() {
        let op = operation(vec![
            required_param("first", ParameterLocation::Query, json!({ "type": "integer" })),
            required_param("second", ParameterLocation::Query, json!({ "type": "integer" })),
            required_param("third", ParameterLocation::Query, json!({ "type": "integer" })),
        ]);
        let source = MapSource::default()
            .with(ParameterLocation::Query, "first", "\"bad\"")
            .with(ParameterLocation::Query, "third", "\"also-bad\"");
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert_eq!(outcome.invalid, vec!["first".to_string(), "third".to_string()]);
        assert_eq!(outcome.missing.len(), 1);
        assert_eq!(outcome.missing[0].name, "second");
    }

    #[test]
    fn test_declaration_order_preserved() {
        let op = operation(vec![
            required_param("b", ParameterLocation::Query, json!({ "type": "integer" })),
            required_param("a", ParameterLocation::Header, json!({ "type": "integer" })),
        ]);
        let source = MapSource::default();
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        let names: Vec<&str> = outcome.missing.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_optional_parameters_ignored() {
        let op = operation(vec![ParameterSpec {
            name: "verbose".to_string(),
            location: ParameterLocation::Query,
            required: false,
            schema: Some(json!({ "type": "boolean" })),
        }]);
        let source = MapSource::default();
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_schemaless_parameter_presence_checked_only() {
        let op = operation(vec![ParameterSpec {
            name: "token".to_string(),
            location: ParameterLocation::Header,
            required: true,
            schema: None,
        }]);
        let engine = JsonSchemaEngine::new();

        let absent = MapSource::default();
        let outcome = check_parameters(&op, &absent, &engine).unwrap();
        assert_eq!(outcome.missing.len(), 1);

        let present = MapSource::default().with(ParameterLocation::Header, "token", "123");
        let outcome = check_parameters(&op, &present, &engine).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_check_is_idempotent() {
        let op = operation(vec![required_param(
            "limit",
            ParameterLocation::Query,
            json!({ "type": "integer" }),
        )]);
        let source = MapSource::default().with(ParameterLocation::Query, "limit", "\"abc\"");
        let engine = JsonSchemaEngine::new();

        let first = check_parameters(&op, &source, &engine).unwrap();
        let second = check_parameters(&op, &source, &engine).unwrap();
        assert_eq!(first.missing, second.missing);
        assert_eq!(first.invalid, second.invalid);
    }

    #[test]
    fn test_operation_without_parameters_is_clean() {
        let op = operation(vec![]);
        let source = MapSource::default();
        let engine = JsonSchemaEngine::new();

        let outcome = check_parameters(&op, &source, &engine).unwrap();
        assert!(outcome.is_clean());
    }
}
