//! Request path decoding and encoding.

use crate::metric::MetricKind;

/// Prefix of ingest paths.
pub const UPDATE_PREFIX: &str = "/update/";

/// Prefix of point lookup paths.
pub const VALUE_PREFIX: &str = "/value/";

/// A decoded request path. Segments borrow from the request URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/update/{kind}/{name}/{value}`
    Update {
        kind: &'a str,
        name: &'a str,
        value: &'a str,
    },
    /// `/value/{kind}/{name}`
    Value { kind: &'a str, name: &'a str },
    /// `/`
    Index,
    /// Anything else, including update/value paths with missing,
    /// empty, or extra segments.
    NotFound,
}

/// Decode a request path into a route.
///
/// Segments are taken positionally. The kind is not checked here; that is
/// the storage's job so it can report `invalid metric type`.
pub fn route(path: &str) -> Route<'_> {
    if path == "/" {
        return Route::Index;
    }

    if let Some(rest) = path.strip_prefix(UPDATE_PREFIX) {
        return match segments::<3>(rest) {
            Some([kind, name, value]) => Route::Update { kind, name, value },
            None => Route::NotFound,
        };
    }

    if let Some(rest) = path.strip_prefix(VALUE_PREFIX) {
        return match segments::<2>(rest) {
            Some([kind, name]) => Route::Value { kind, name },
            None => Route::NotFound,
        };
    }

    Route::NotFound
}

/// Split `rest` into exactly `N` non-empty segments.
fn segments<const N: usize>(rest: &str) -> Option<[&str; N]> {
    let mut out = [""; N];
    let mut parts = rest.split('/');
    for slot in out.iter_mut() {
        match parts.next() {
            Some(part) if !part.is_empty() => *slot = part,
            _ => return None,
        }
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// Build the ingest path for one metric.
pub fn update_path(kind: MetricKind, name: &str, value: &str) -> String {
    format!("{}{}/{}/{}", UPDATE_PREFIX, kind, name, value)
}
