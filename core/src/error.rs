use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes carried by failure envelopes. Closed set: every failure the
/// dispatcher can produce maps to exactly one of these.
pub mod codes {
    pub const UNKNOWN_TOOL: &str = "unknown_tool";
    pub const INVALID_ARGUMENTS: &str = "invalid_arguments";
    pub const HANDLER_ERROR: &str = "handler_error";
    pub const PERMISSION_DENIED: &str = "permission_denied";
    pub const UPSTREAM_UNAVAILABLE: &str = "upstream_unavailable";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Machine-readable failure code. Designed for agents: the code alone says
/// whether the caller, the local machine, or the remote catalog is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Tool name is not in the registry (caller error)
    UnknownTool,
    /// Arguments violate the tool schema (caller error)
    InvalidArguments,
    /// Handler-specific domain failure not covered by another code
    HandlerError,
    /// Local automation lacks OS-level consent
    PermissionDenied,
    /// Remote catalog unreachable or failing beyond its retry budget
    UpstreamUnavailable,
    /// Unexpected defect
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownTool => codes::UNKNOWN_TOOL,
            ErrorCode::InvalidArguments => codes::INVALID_ARGUMENTS,
            ErrorCode::HandlerError => codes::HANDLER_ERROR,
            ErrorCode::PermissionDenied => codes::PERMISSION_DENIED,
            ErrorCode::UpstreamUnavailable => codes::UPSTREAM_UNAVAILABLE,
            ErrorCode::InternalError => codes::INTERNAL_ERROR,
        }
    }

    /// True when the caller can fix the request and retry.
    pub fn is_caller_error(self) -> bool {
        matches!(self, ErrorCode::UnknownTool | ErrorCode::InvalidArguments)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong inside a handler capability. Collaborators report one of
/// these; the dispatcher turns it into an [`ErrorCode`] without guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The OS refused to let us drive the media player (missing consent)
    AutomationPermissionDenied,
    /// Media player (or the scripting host) is not reachable
    ApplicationUnreachable,
    /// The automation layer rejected the command as malformed
    MalformedCommand,
    /// The automation command ran but raised an error
    AutomationFailed,
    /// The automation command did not finish in time
    AutomationTimeout,
    /// Catalog rejected or could not build our credentials
    CatalogAuth,
    /// Requested resource does not exist
    NotFound,
    /// Catalog kept rate-limiting after retries
    RateLimited,
    /// Catalog kept returning server errors after retries
    ServerError,
    /// Catalog request timed out
    UpstreamTimeout,
    /// Catalog could not be reached at all
    Network,
    /// Catalog answered with a body we could not decode
    InvalidResponse,
    /// Required settings or credentials are missing
    Configuration,
    /// Anticipated handler-specific condition
    Domain,
    /// A defect inside the handler
    Internal,
}

impl FailureKind {
    /// Deterministic classification into the envelope taxonomy.
    pub fn error_code(self) -> ErrorCode {
        match self {
            FailureKind::AutomationPermissionDenied => ErrorCode::PermissionDenied,
            FailureKind::RateLimited
            | FailureKind::ServerError
            | FailureKind::UpstreamTimeout
            | FailureKind::Network => ErrorCode::UpstreamUnavailable,
            FailureKind::Internal => ErrorCode::InternalError,
            FailureKind::ApplicationUnreachable
            | FailureKind::MalformedCommand
            | FailureKind::AutomationFailed
            | FailureKind::AutomationTimeout
            | FailureKind::CatalogAuth
            | FailureKind::NotFound
            | FailureKind::InvalidResponse
            | FailureKind::Configuration
            | FailureKind::Domain => ErrorCode::HandlerError,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::AutomationPermissionDenied => "automation_permission_denied",
            FailureKind::ApplicationUnreachable => "application_unreachable",
            FailureKind::MalformedCommand => "malformed_command",
            FailureKind::AutomationFailed => "automation_failed",
            FailureKind::AutomationTimeout => "automation_timeout",
            FailureKind::CatalogAuth => "catalog_auth",
            FailureKind::NotFound => "not_found",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::ServerError => "server_error",
            FailureKind::UpstreamTimeout => "upstream_timeout",
            FailureKind::Network => "network",
            FailureKind::InvalidResponse => "invalid_response",
            FailureKind::Configuration => "configuration",
            FailureKind::Domain => "domain",
            FailureKind::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a handler capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct HandlerFailure {
    pub kind: FailureKind,
    pub message: String,
    pub hint: Option<String>,
}

impl HandlerFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Domain, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_as_snake_case() {
        let value = serde_json::to_value(ErrorCode::UpstreamUnavailable).unwrap();
        assert_eq!(value, serde_json::json!("upstream_unavailable"));
        assert_eq!(ErrorCode::UnknownTool.to_string(), codes::UNKNOWN_TOOL);
    }

    #[test]
    fn permission_denial_is_the_only_permission_code() {
        assert_eq!(
            FailureKind::AutomationPermissionDenied.error_code(),
            ErrorCode::PermissionDenied
        );
        assert_eq!(
            FailureKind::ApplicationUnreachable.error_code(),
            ErrorCode::HandlerError
        );
        assert_eq!(
            FailureKind::MalformedCommand.error_code(),
            ErrorCode::HandlerError
        );
    }

    #[test]
    fn exhausted_catalog_failures_are_upstream_unavailable() {
        for kind in [
            FailureKind::RateLimited,
            FailureKind::ServerError,
            FailureKind::UpstreamTimeout,
            FailureKind::Network,
        ] {
            assert_eq!(kind.error_code(), ErrorCode::UpstreamUnavailable, "{kind}");
        }
        assert_eq!(FailureKind::CatalogAuth.error_code(), ErrorCode::HandlerError);
        assert_eq!(FailureKind::NotFound.error_code(), ErrorCode::HandlerError);
    }

    #[test]
    fn automation_timeout_stays_local() {
        assert_eq!(
            FailureKind::AutomationTimeout.error_code(),
            ErrorCode::HandlerError
        );
        assert_eq!(FailureKind::Internal.error_code(), ErrorCode::InternalError);
    }

    #[test]
    fn handler_failure_builder_keeps_hint() {
        let failure = HandlerFailure::domain("No playable URL").with_hint("Check storefront");
        assert_eq!(failure.code(), ErrorCode::HandlerError);
        assert_eq!(failure.hint.as_deref(), Some("Check storefront"));
        assert_eq!(failure.to_string(), "domain: No playable URL");
    }
}
