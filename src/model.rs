//! Model name resolution.

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Short name aliases for image models.
const ALIASES: &[(&str, &str)] = &[("nano-banana", DEFAULT_MODEL)];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Check that a resolved model is served by the Gemini API.
///
/// # Errors
///
/// Returns an error if the model name is not a `gemini-*` identifier.
pub fn validate_model(model: &str) -> Result<(), String> {
    if model.starts_with("gemini") {
        Ok(())
    } else {
        Err(format!("Unsupported model '{model}'. Expected a 'gemini-*' image model."))
    }
}
