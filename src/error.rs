// src/error.rs
use std::path::PathBuf;

/// Typed failures raised by this crate.
///
/// Functions return `anyhow::Result`; these are the causes callers can
/// `downcast_ref` to. Errors coming from the LCA engines are passed through
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("sampler returned {actual} samples, expected {expected}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("report has not been calculated yet")]
    NotCalculated,

    #[error("report uploading not allowed: {reason}")]
    UploadNotAllowed { reason: String },

    #[error("invalid report id {id:?}: expected 32 lowercase hex characters")]
    InvalidReportId { id: String },

    #[error("report not found: {}", path.display())]
    ReportNotFound { path: PathBuf },
}

impl ReportError {
    pub(crate) fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings { message: message.into() }
    }
}
