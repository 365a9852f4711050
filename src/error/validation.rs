use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Value must be <= {max}.")]
    ValueTooLarge { max: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid color '{value}'. Use #RRGGBB, a single-letter code, or a basic color name.")]
    InvalidColor { value: String },
    #[error("Invalid listen address '{value}'.")]
    InvalidListenAddress { value: String },
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to send shutdown")]
    ShutdownSendFailed,
    #[error("Shutdown task join error: {source}")]
    ShutdownJoinFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
