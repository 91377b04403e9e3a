// src/error.rs
//! Application error types and the failure taxonomy used by the retry layer.
//!
//! Every failure the fetch layer can observe is mapped into an
//! [`ErrorClass`]. The class alone decides whether a call is retried, so the
//! retry wrapper never has to inspect error strings.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    RateLimited,
    ServiceUnavailable,
    /// Gateway timeout reported by Notion itself
    GatewayTimeout,
    InternalError,
    Unauthorized,
    /// Integration lacks access to the resource
    RestrictedResource,
    InvalidRequest,
    InvalidRequestUrl,
    InvalidJson,
    ValidationFailed,
    ObjectNotFound,
    Conflict,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// A code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "service_unavailable" => Self::ServiceUnavailable,
            "gateway_timeout" => Self::GatewayTimeout,
            "internal_server_error" => Self::InternalError,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_request" => Self::InvalidRequest,
            "invalid_request_url" => Self::InvalidRequestUrl,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "object_not_found" => Self::ObjectNotFound,
            "conflict_error" => Self::Conflict,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::RateLimited => ErrorClass::RateLimited,
            Self::ServiceUnavailable | Self::GatewayTimeout | Self::InternalError => {
                ErrorClass::Unavailable
            }
            Self::Unauthorized
            | Self::RestrictedResource
            | Self::InvalidRequest
            | Self::InvalidRequestUrl
            | Self::InvalidJson
            | Self::ValidationFailed
            | Self::ObjectNotFound => ErrorClass::Permanent,
            Self::Conflict | Self::Unknown(_) => ErrorClass::Unclassified,
            Self::HttpStatus(status) => ErrorClass::from_http_status(*status),
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::GatewayTimeout => write!(f, "gateway_timeout"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::InvalidRequestUrl => write!(f, "invalid_request_url"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// How the retry wrapper treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The API asked us to slow down.
    RateLimited,
    /// Transport failure or a 5xx; usually gone after a pause.
    Unavailable,
    /// Unauthorized, malformed request or missing object. Cannot self-heal.
    Permanent,
    /// Anything unrecognised is assumed to be transient.
    Unclassified,
}

impl ErrorClass {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            500 | 502 | 503 | 504 => Self::Unavailable,
            400 | 401 | 403 | 404 => Self::Permanent,
            _ => Self::Unclassified,
        }
    }

    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Permanent)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RateLimited => "rate limited",
            Self::Unavailable => "service unavailable",
            Self::Permanent => "permanent failure",
            Self::Unclassified => "unexpected error",
        };
        f.write_str(label)
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}, HTTP {status}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: u16,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{context}: gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Shorthand for a Notion API error in fakes and parsers.
    pub fn notion(code: NotionErrorCode, status: u16, message: impl Into<String>) -> Self {
        AppError::NotionService {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::NotionService { code, .. } => code.class(),
            AppError::NetworkFailure(err) => match err.status() {
                Some(status) => ErrorClass::from_http_status(status.as_u16()),
                None => ErrorClass::Unavailable,
            },
            AppError::RetriesExhausted { source, .. } => source.class(),
            AppError::MissingConfiguration(_) | AppError::Validation(_) => ErrorClass::Permanent,
            AppError::MalformedResponse(_)
            | AppError::Io(_)
            | AppError::DeliveryFailed { .. }
            | AppError::InternalError { .. } => ErrorClass::Unclassified,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }

    /// The error underneath any retry bookkeeping.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::RetriesExhausted { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::InternalError {
            message: "Formatting error".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
