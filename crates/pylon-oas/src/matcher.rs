//! Exact route lookup against the specification's path table.
//!
//! Matching is exact-string on both path and method: the requested path
//! (query string already stripped) must equal a path-table key character
//! for character, and the lower-cased method must be declared on that
//! entry. Template segments are NOT interpreted: a document declaring
//! `/users/{id}` matches only the literal request path `/users/{id}`.
//! This limitation is deliberate and preserved; downstream consumers rely
//! on the exact-match behavior.

use tracing::info;

use crate::document::{Operation, PathTable};

/// Reports whether `method` is declared for `requested_path`.
///
/// `requested_path` must have its query string stripped; `method` must be
/// lower-cased. Emits two informational log lines describing the lookup
/// before computing the result.
#[must_use]
pub fn contains_route(paths: &PathTable, requested_path: &str, method: &str) -> bool {
    info!("incoming method-url pair:");
    info!("{method} - {requested_path}");

    find_operation(paths, requested_path, method).is_some()
}

/// Looks up the operation declared for the exact (path, method) pair.
///
/// Same contract as [`contains_route`], without the log lines.
#[must_use]
pub fn find_operation<'a>(
    paths: &'a PathTable,
    requested_path: &str,
    method: &str,
) -> Option<&'a Operation> {
    paths
        .get(requested_path)
        .and_then(|item| item.operation(method))
}
