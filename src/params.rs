//! Generation parameters and output format helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width:height ratio requested for the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Square.
    #[serde(rename = "1:1")]
    Square,
    /// Portrait 3:4.
    #[serde(rename = "3:4")]
    Portrait3x4,
    /// Landscape 4:3.
    #[serde(rename = "4:3")]
    Landscape4x3,
    /// Tall portrait 9:16.
    #[serde(rename = "9:16")]
    Portrait9x16,
    /// Widescreen 16:9.
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// Every supported ratio, in the order they are offered to users.
    pub const ALL: [Self; 5] = [
        Self::Square,
        Self::Landscape16x9,
        Self::Portrait9x16,
        Self::Landscape4x3,
        Self::Portrait3x4,
    ];

    /// The `w:h` form sent to the API.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.as_str() == s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|r| r.as_str()).collect();
            format!("Unsupported aspect ratio '{s}'. Valid: {}", valid.join(", "))
        })
    }
}

/// Validate the output format parameter.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn validate_format(format: &str) -> Result<(), String> {
    match format {
        "jpeg" | "png" | "webp" => Ok(()),
        _ => Err(format!("Unsupported format '{format}'. Valid: jpeg, png, webp")),
    }
}

/// Output format matching a MIME type, if it is one we can write.
#[must_use]
pub fn format_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" => Some("jpeg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Get the file extension for an output format.
#[must_use]
pub fn format_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "webp" => "webp",
        // png and anything unknown
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_ratios() {
        assert_eq!("1:1".parse::<AspectRatio>().unwrap(), AspectRatio::Square);
        assert_eq!("3:4".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait3x4);
        assert_eq!("4:3".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape4x3);
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait9x16);
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape16x9);
    }

    #[test]
    fn parse_rejects_unknown_ratio() {
        let err = "21:9".parse::<AspectRatio>().unwrap_err();
        assert!(err.contains("Unsupported aspect ratio '21:9'"));
        assert!(err.contains("16:9"));
    }

    #[test]
    fn display_matches_wire_form() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.to_string().parse::<AspectRatio>().unwrap(), ratio);
        }
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&AspectRatio::Portrait9x16).unwrap();
        assert_eq!(json, "\"9:16\"");
    }

    #[test]
    fn validate_format_valid() {
        assert!(validate_format("jpeg").is_ok());
        assert!(validate_format("png").is_ok());
        assert!(validate_format("webp").is_ok());
    }

    #[test]
    fn validate_format_invalid() {
        assert!(validate_format("gif").is_err());
        assert!(validate_format("bmp").is_err());
    }

    #[test]
    fn mime_to_format() {
        assert_eq!(format_for_mime("image/jpeg"), Some("jpeg"));
        assert_eq!(format_for_mime("image/png"), Some("png"));
        assert_eq!(format_for_mime("image/gif"), None);
    }

    #[test]
    fn format_extension_mapping() {
        assert_eq!(format_extension("jpeg"), "jpg");
        assert_eq!(format_extension("png"), "png");
        assert_eq!(format_extension("webp"), "webp");
    }
}
