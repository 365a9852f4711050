use thiserror::Error;

/// Failures of a single chart request.
///
/// Every variant is local to the request that produced it; the server maps it
/// to a status code with [`ChartError::status`] and keeps serving.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Malformed request: {reason}")]
    MalformedRequest { reason: String },
    #[error("Invalid request shape: {reason}")]
    InvalidShape { reason: String },
    #[error("Invalid timestamp '{value}'.")]
    InvalidTimestamp { value: String },
    #[error("Invalid bucket count {value}. Expected 1..={max}.")]
    InvalidBucketCount { value: i64, max: i64 },
    #[error("Date-bar request has no data points.")]
    EmptyInput,
    #[error("Date span of {days} days exceeds the {max} day limit.")]
    DateSpanTooLong { days: i64, max: i64 },
    #[error("No route for {method} {path}.")]
    NotFound { method: String, path: String },
    #[error("Request body of {declared} bytes exceeds the {limit} byte limit.")]
    PayloadTooLarge { declared: usize, limit: usize },
    #[error("Failed to render chart: {reason}")]
    Render { reason: String },
}

impl ChartError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn render(reason: impl std::fmt::Display) -> Self {
        Self::Render {
            reason: reason.to_string(),
        }
    }

    /// HTTP status code reported to the client for this failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::MalformedRequest { .. }
            | Self::InvalidShape { .. }
            | Self::InvalidTimestamp { .. }
            | Self::InvalidBucketCount { .. }
            | Self::EmptyInput
            | Self::DateSpanTooLong { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::PayloadTooLarge { .. } => 413,
            Self::Render { .. } => 500,
        }
    }
}
