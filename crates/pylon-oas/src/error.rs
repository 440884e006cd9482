//! Error types for specification handling and parameter checking.

use thiserror::Error;

use crate::document::ParameterLocation;

/// Result type for specification loading and dereferencing.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while loading or dereferencing a specification document.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The specification file could not be read.
    #[error("failed to read specification file {path}: {source}")]
    Read {
        /// Path of the file that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The specification content was not valid JSON, or the parsed value
    /// did not match the expected document shape.
    #[error("failed to parse specification: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// The specification content was not valid YAML.
    #[error("failed to parse specification: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    /// The YAML content used a construct with no JSON equivalent.
    #[error("specification value not representable as JSON: {0}")]
    UnsupportedValue(String),

    /// An internal `$ref` pointed at nothing in the document.
    #[error("unresolvable reference '{pointer}' in specification")]
    UnresolvedReference {
        /// The JSON pointer that failed to resolve.
        pointer: String,
    },

    /// An internal `$ref` chain looped back onto itself.
    #[error("circular reference through '{pointer}' in specification")]
    CircularReference {
        /// The JSON pointer at which the cycle was detected.
        pointer: String,
    },
}

/// A per-request fault raised while checking parameters.
///
/// Parameter values arrive from the transport as strings and are coerced
/// through a JSON parse before schema validation. A value that does not
/// parse is reported through this error rather than panicking, so the
/// caller can turn it into a client-error response.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A present parameter value could not be coerced from its raw
    /// transport string into a JSON value.
    #[error("parameter '{name}' in {location} carries a malformed value: {reason}")]
    MalformedValue {
        /// Declared parameter name.
        name: String,
        /// Declared parameter location.
        location: ParameterLocation,
        /// Why the coercion failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_reference_display() {
        let err = SpecError::UnresolvedReference {
            pointer: "#/components/schemas/Missing".to_string(),
        };
        assert!(err.to_string().contains("#/components/schemas/Missing"));
    }

    #[test]
    fn test_circular_reference_display() {
        let err = SpecError::CircularReference {
            pointer: "#/components/schemas/Node".to_string(),
        };
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_malformed_value_display() {
        let err = CheckError::MalformedValue {
            name: "limit".to_string(),
            location: ParameterLocation::Query,
            reason: "expected value at line 1 column 1".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("limit"));
        assert!(rendered.contains("query"));
    }
}
