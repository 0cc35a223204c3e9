//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use serde::de::DeserializeOwned;

use crate::error::{ErrorKind, GenerationError};

/// Turn a recorded `Ok`/`Err` output back into a result.
///
/// Errors recorded as a bare string are treated as transport failures.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, GenerationError> {
    if let Some(err) = output.get("Err") {
        let message = err
            .get("message")
            .or(Some(err))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("replayed error")
            .to_string();
        let kind = err
            .get("kind")
            .and_then(|k| serde_json::from_value::<ErrorKind>(k.clone()).ok())
            .unwrap_or(ErrorKind::Transport);
        return Err(GenerationError::from_kind(kind, message));
    }

    let ok = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(ok)
        .map_err(|e| GenerationError::Config(format!("Malformed cassette output: {e}")))
}
