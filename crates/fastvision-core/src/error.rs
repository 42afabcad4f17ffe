use std::path::PathBuf;

/// Error taxonomy for the document pipeline.
///
/// Only [`FvError::UnsupportedInput`], [`FvError::IoFailure`] and
/// [`FvError::SchemaValidationFailure`] are fatal; every other variant is
/// caught at its originating page/batch/CLI-startup boundary, logged via
/// `tracing::warn!`, and converted into a deterministic fallback rather
/// than propagated.
#[derive(Debug, thiserror::Error)]
pub enum FvError {
    #[error("unsupported input extension '{extension}' for {path}: expected .pdf or .docx")]
    UnsupportedInput { path: PathBuf, extension: String },

    #[error("failed to read {path}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page {page} extraction failed: {reason}")]
    PageExtractionFailure { page: usize, reason: String },

    #[error("table detection failed on page {page}: {reason}")]
    TableDetectionFailure { page: usize, reason: String },

    #[error("tagger failed for page/batch {scope}: {reason}")]
    TaggerFailure { scope: String, reason: String },

    #[error("assembled document fails schema validation at '{field_path}': {reason}")]
    SchemaValidationFailure { field_path: String, reason: String },

    #[error("no vision backend credentials found; continuing with heuristic classification")]
    MissingCredentials,
}

pub type Result<T> = std::result::Result<T, FvError>;
