use std::num::TryFromIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ErrorCode>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,

    #[error("Oracle is not enabled for this pool")]
    OracleNotEnabled,
    #[error("Oracle has already been enabled for this pool")]
    OracleAlreadyEnabled,
    #[error("Fee state has not been initialized for this pool")]
    FeeStateNotInitialized,

    #[error("Tick-spacing is not supported")]
    UnsupportedTickSpacing,
    #[error("Pool fee is not configured as dynamic")]
    UnsupportedFeeConfiguration,
    #[error("Invalid pool policy: {0}")]
    InvalidPolicy(&'static str),
    #[error("Unable to parse pool policy: {0}")]
    PolicyParse(String),

    #[error("Requested observation is older than the retained history")]
    InsufficientHistory,
    #[error("Observation cardinality is out of bounds")]
    InvalidCardinality,

    #[error("Provided tick index is out of bounds")]
    InvalidTickIndex,
    #[error("Timestamp should be greater than or equal to the last updated timestamp")]
    InvalidTimestamp,

    #[error("Cap policy has already been refreshed in this slot")]
    PolicyRefreshRateLimited,
    #[error("Pool already has an update in flight")]
    ReentrantCall,
    #[error("Pool has no swap in flight")]
    SwapNotInFlight,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<TryFromIntError> for ErrorCode {
    fn from(_: TryFromIntError) -> Self {
        ErrorCode::ArithmeticOverflow
    }
}

impl From<toml::de::Error> for ErrorCode {
    fn from(err: toml::de::Error) -> Self {
        ErrorCode::PolicyParse(err.to_string())
    }
}
