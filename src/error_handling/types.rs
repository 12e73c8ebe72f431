//! Error type definitions.
//!
//! This module defines all error types used throughout the library. The binary
//! wraps these in `anyhow` with context.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured API base URL is not an absolute URL.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// A required credential or setting is missing.
    #[error("Missing configuration: {0}")]
    MissingSetting(String),
}

/// Errors returned by calls against the Censys API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        /// URL that was being requested
        url: String,
        /// Underlying client error
        #[source]
        source: ReqwestError,
    },

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message extracted from the response body
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A URL could not be built from the configured base.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Categorizes the error for logging and retry decisions.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Status { status, .. } => match *status {
                401 => ApiErrorKind::Unauthorized,
                403 => ApiErrorKind::Forbidden,
                404 => ApiErrorKind::NotFound,
                429 => ApiErrorKind::TooManyRequests,
                500..=599 => ApiErrorKind::ServerError,
                _ => ApiErrorKind::ClientError,
            },
            ApiError::Request { source, .. } => {
                if source.is_timeout() {
                    ApiErrorKind::Timeout
                } else if source.is_connect() {
                    ApiErrorKind::Connect
                } else {
                    ApiErrorKind::Transport
                }
            }
            ApiError::Decode(_) => ApiErrorKind::Decode,
            ApiError::Url(_) => ApiErrorKind::InvalidUrl,
        }
    }
}

/// Coarse categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyRequests,
    ServerError,
    ClientError,
    Timeout,
    Connect,
    Transport,
    Decode,
    InvalidUrl,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthorized => "Unauthorized (401)",
            ApiErrorKind::Forbidden => "Forbidden (403)",
            ApiErrorKind::NotFound => "Not Found (404)",
            ApiErrorKind::TooManyRequests => "Too many requests (429)",
            ApiErrorKind::ServerError => "Server error (5xx)",
            ApiErrorKind::ClientError => "Client error (4xx)",
            ApiErrorKind::Timeout => "Request timeout",
            ApiErrorKind::Connect => "Connection error",
            ApiErrorKind::Transport => "Transport error",
            ApiErrorKind::Decode => "Response decode error",
            ApiErrorKind::InvalidUrl => "Invalid URL",
        }
    }
}

/// Errors loading or validating the CensEye configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected shape.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A regex filter does not compile.
    #[error("invalid regex filter {pattern:?}: {source}")]
    Regex {
        /// Offending pattern
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// Rarity bounds are inverted.
    #[error("rarity min ({min}) is greater than rarity max ({max})")]
    RarityBounds {
        /// Lower bound
        min: u64,
        /// Upper bound
        max: u64,
    },
}

/// Structural errors from the rule compiler.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompileError {
    /// The document root must be a JSON object.
    #[error("document root must be an object, found {0}")]
    RootNotObject(&'static str),
}

/// Errors from the history walkers.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from a CensEye investigation.
#[derive(Error, Debug)]
pub enum CenseyeError {
    /// The host document could not be compiled into rules.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Fetching the host or its value counts failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}
