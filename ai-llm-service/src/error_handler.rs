//! Unified error handling for `ai-llm-service`.
//!
//! A single top-level error [`AiLlmError`] wraps configuration problems
//! ([`ConfigError`]) and upstream provider failures ([`ProviderError`]).
//! Provider failures are classified so callers can tell an authorization
//! problem from a rate limit or a timeout. Nothing here retries.
//!
//! All messages carry the `[AI LLM Service]` prefix to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream provider failed or answered with something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// HTTP client could not be constructed.
    #[error("[AI LLM Service] http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AiLlmError {
    /// Returns the provider failure kind, if this is a provider error.
    pub fn provider_kind(&self) -> Option<&ProviderErrorKind> {
        match self {
            AiLlmError::Provider(p) => Some(&p.kind),
            _ => None,
        }
    }

    /// `true` when the upstream rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.provider_kind(), Some(ProviderErrorKind::Unauthorized(_)))
    }

    /// `true` when the request exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.provider_kind(), Some(ProviderErrorKind::Timeout))
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`, or a provider used for a role it cannot serve.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g. invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-success HTTP answer from a provider.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Short, trimmed snippet of the response body.
    pub snippet: String,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("client built for the wrong provider")]
    InvalidProvider,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Credential cannot be sent as a header value.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// 401/403: missing or rejected credential.
    #[error("unauthorized (HTTP {}) from {}: {}", .0.status, .0.url, .0.snippet)]
    Unauthorized(HttpError),

    /// 429 from the provider.
    #[error("rate limited (HTTP {}) from {}: {}", .0.status, .0.url, .0.snippet)]
    RateLimited(HttpError),

    /// Any other non-2xx status.
    #[error("HTTP {} from {}: {}", .0.status, .0.url, .0.snippet)]
    HttpStatus(HttpError),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    /// The response parsed but carried no text.
    #[error("response contained no candidates")]
    EmptyCandidates,
}

impl ProviderErrorKind {
    /// Classifies a non-success HTTP answer.
    pub fn from_http(err: HttpError) -> Self {
        match err.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Unauthorized(err),
            StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimited(err),
            _ => ProviderErrorKind::HttpStatus(err),
        }
    }

    /// Classifies a `reqwest` send/receive failure.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else if err.is_decode() {
            ProviderErrorKind::Decode(err.to_string())
        } else {
            ProviderErrorKind::Transport(err.to_string())
        }
    }

    /// Classifies a failure while reading a 2xx body. A timeout that fires
    /// mid-body stays a timeout; anything else is a decode error.
    pub fn from_body(err: &reqwest::Error, expected: &str) -> Self {
        if err.is_timeout() {
            ProviderErrorKind::Timeout
        } else {
            ProviderErrorKind::Decode(format!("serde error: {err}; expected {expected}"))
        }
    }
}

/// Failure attributed to a specific provider.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Trims a response body to a log-friendly snippet (240 chars, single line).
pub fn make_snippet(text: &str) -> String {
    text.chars()
        .take(240)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

/// Parses an optional number from a looked-up value (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but does not parse.
pub fn parse_opt<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    reason: &'static str,
) -> Result<Option<T>> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, reason }.into()),
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] otherwise.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}
