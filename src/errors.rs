use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while sampling or rendering pixel art
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixelError {
    /// Construction input was neither an options object nor a source string
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// A setter or option carried an out-of-range value
    #[error("Invalid parameter: {field} - {message}")]
    InvalidParameter { field: String, message: String },

    /// Requested output type is not one of the recognized forms
    #[error("Error: {0} is not a supported type")]
    UnsupportedType(String),

    /// The source locator could not be understood by the decoder
    #[error("Unsupported source locator: {0}")]
    UnsupportedSource(String),

    /// Error when trying to read a source from disk
    #[error("Failed to read source {path}: {message}")]
    SourceAccess { path: PathBuf, message: String },

    /// Source bytes could not be decoded into an image
    #[error("Failed to decode image {source_name}: {message}")]
    Decode { source_name: String, message: String },

    /// Raster could not be encoded to a still image
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Options could not be deserialized
    #[error("Failed to parse options: {0}")]
    Parse(String),
}

/// Type alias for Result with `PixelError`
pub type Result<T> = std::result::Result<T, PixelError>;

impl PixelError {
    /// Create a parameter validation error
    pub fn param(field: &str, message: &str) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for PixelError {
    fn from(error: serde_json::Error) -> Self {
        PixelError::Parse(error.to_string())
    }
}

impl From<toml::de::Error> for PixelError {
    fn from(error: toml::de::Error) -> Self {
        PixelError::Parse(error.to_string())
    }
}

impl From<image::ImageError> for PixelError {
    fn from(error: image::ImageError) -> Self {
        PixelError::Encode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message_names_type() {
        let err = PixelError::UnsupportedType("foo".to_string());
        assert_eq!(err.to_string(), "Error: foo is not a supported type");
    }

    #[test]
    fn test_param_error() {
        let err = PixelError::param("columns", "must be greater than zero");
        assert!(err.to_string().contains("columns"));
        assert!(matches!(
            err,
            PixelError::InvalidParameter { ref field, .. } if field == "columns"
        ));
    }
}
