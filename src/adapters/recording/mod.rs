//! Recording adapters that capture interactions to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::GenerationError;

/// Record a call and its outcome using the `Ok`/`Err` cassette convention.
///
/// Errors keep their [`ErrorKind`](crate::error::ErrorKind) so replay can
/// rebuild the same variant.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, GenerationError>,
) where
    T: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::to_value(v).map(|inner| serde_json::json!({ "Ok": inner })),
        Err(e) => Ok(serde_json::json!({
            "Err": { "kind": e.kind(), "message": e.to_string() }
        })),
    };

    let (input, output) = match (serde_json::to_value(input), output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(port, method, error = %e, "skipping unserializable interaction");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => tracing::warn!(port, method, error = %e, "recorder lock poisoned"),
    }
}
