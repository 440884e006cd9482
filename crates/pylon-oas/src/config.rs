//! Configuration for request validation behavior.

use serde::{Deserialize, Serialize};

/// Controls how the validation middleware reacts to parameter problems.
///
/// Route misses are always rejected with a 400; these switches only govern
/// parameter-level findings. The defaults log missing parameters as
/// warnings while forwarding the request, and reject parameters whose
/// values fail schema validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject requests missing a required parameter.
    ///
    /// When false, missing parameters are logged as warnings and the
    /// request is forwarded anyway.
    pub reject_missing_parameters: bool,
    /// Reject requests carrying a parameter that fails schema validation.
    pub reject_invalid_parameters: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reject_missing_parameters: false,
            reject_invalid_parameters: true,
        }
    }
}

impl ValidationConfig {
    /// Rejects on every parameter finding.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            reject_missing_parameters: true,
            reject_invalid_parameters: true,
        }
    }

    /// Logs every parameter finding but never rejects for one.
    ///
    /// Route misses still produce a 400.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            reject_missing_parameters: false,
            reject_invalid_parameters: false,
        }
    }
}
