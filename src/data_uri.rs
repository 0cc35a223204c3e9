//! `data:` URIs carrying base64 image payloads.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};

/// MIME type assumed when the API does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// An inline image as `data:<mime>;base64,<data>`.
///
/// The payload is kept in its base64 form; [`DataUri::decode`] produces the
/// raw bytes when they are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    /// Build a data URI, falling back to `image/png` when `mime_type` is
    /// missing or empty.
    #[must_use]
    pub fn new(mime_type: Option<&str>, data: impl Into<String>) -> Self {
        let mime_type = mime_type.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MIME_TYPE);
        Self { mime_type: mime_type.to_string(), data: data.into() }
    }

    /// Declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decode the payload into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.data)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUri {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("data:").ok_or_else(|| format!("Not a data URI: '{s}'"))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| "Data URI is not base64-encoded".to_string())?;
        Ok(Self::new(Some(mime_type), data))
    }
}

impl TryFrom<String> for DataUri {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataUri> for String {
    fn from(uri: DataUri) -> Self {
        uri.to_string()
    }
}
