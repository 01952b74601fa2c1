use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid image state: {reason}")]
    InvalidImageState { reason: String },

    #[error("Dimension mismatch for {width}x{height} image: expected {expected} bytes, got {actual}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to load image '{path}': {message}")]
    ImageLoadError { path: PathBuf, message: String },

    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Export error for '{path}': {message}")]
    ExportError { path: PathBuf, message: String },

    #[error("Settings error: {message}")]
    SettingsError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, SplitError>;

impl SplitError {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        SplitError::InvalidImageState {
            reason: reason.into(),
        }
    }

    /// Returns true if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SplitError::FileNotFound { .. }
                | SplitError::IoError { .. }
                | SplitError::ExportError { .. }
        )
    }

    /// Returns a user-friendly error message with recovery suggestions
    pub fn user_message(&self) -> String {
        let base_message = self.to_string();
        let suggestion = match self {
            SplitError::InvalidImageState { .. } => {
                "The image is busy or was left in a broken state. Reload it and try again."
            }
            SplitError::DimensionMismatch { .. } => {
                "The decoded pixel data does not match the image size. The file may be corrupted."
            }
            SplitError::FileNotFound { .. } => {
                "Check if the file exists and you have permission to access it."
            }
            SplitError::UnsupportedFormat { .. } => {
                "This image format is not supported. Try converting it to PNG, JPEG or BMP."
            }
            SplitError::ImageLoadError { .. } => {
                "The image file may be corrupted. Try opening it in another viewer."
            }
            SplitError::ExportError { .. } => {
                "Export failed. Check if you have write permissions in the target directory."
            }
            SplitError::IoError { .. } => {
                "File system error occurred. Check disk space and permissions."
            }
            _ => "An unexpected error occurred.",
        };

        format!("{}\n\n{}", base_message, suggestion)
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SplitError::InvalidImageState { .. } => "INVALID_IMAGE_STATE",
            SplitError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            SplitError::ImageLoadError { .. } => "IMAGE_LOAD_ERROR",
            SplitError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SplitError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SplitError::ExportError { .. } => "EXPORT_ERROR",
            SplitError::SettingsError { .. } => "SETTINGS_ERROR",
            SplitError::IoError { .. } => "IO_ERROR",
            SplitError::JsonError { .. } => "JSON_ERROR",
        }
    }
}
