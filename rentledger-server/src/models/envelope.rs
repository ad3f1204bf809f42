//! Success response envelope
//!
//! Every 200/201 response carries the same wrapper:
//! `{"status": "success", "results": <row count>, "data": {...}}`.

use serde::Serialize;

/// Fixed JSON wrapper for successful responses
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub results: usize,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap a payload with the given row count.
    pub fn success(results: usize, data: T) -> Self {
        Self {
            status: "success",
            results,
            data,
        }
    }
}
