//! Error types and error codes for Veita
//!
//! This module defines:
//! - `VeitaError`: application-specific error enum
//! - `ErrorCode`: structured error codes for API responses
//!
//! Validation happens before any mutation is committed, so every error here
//! is surfaced synchronously to the caller and leaves persisted state
//! untouched.

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum VeitaError {
    #[error("invalid node address: '{0}'")]
    InvalidAddress(String),

    #[error("node '{0}' already exists")]
    NodeAlreadyExists(String),

    #[error("usercount must be >= 0, got {0}")]
    InvalidUsercount(i64),

    #[error("invalid uptime format: '{0}'")]
    InvalidUptimeFormat(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("authentication failed for node '{0}'")]
    AuthenticationFailed(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter validate error",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

// Fleet errors
pub const NODE_ADDRESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 21000,
    message: "node address error",
};

pub const NODE_ALREADY_EXIST: ErrorCode<'static> = ErrorCode {
    code: 21001,
    message: "node already exist",
};

pub const NODE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 21002,
    message: "node not found",
};

pub const USERCOUNT_ERROR: ErrorCode<'static> = ErrorCode {
    code: 21003,
    message: "usercount error",
};

pub const UPTIME_FORMAT_ERROR: ErrorCode<'static> = ErrorCode {
    code: 21004,
    message: "uptime format error",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};
