//! Navigation outcomes and error types.
//!
//! Nothing in the navigator is fatal. Every entry point returns a
//! [`NavigationResult`] describing what happened to the user's action, and
//! every failure path degrades to a full browser navigation. The types here
//! exist so those paths can be observed, logged, and tested:
//!
//! - [`NavigationResult`]: what a click or [`visit`](crate::Navigator::visit)
//!   turned into (`Intercepted`, `Prevented`, `Passthrough`, `FullReload`).
//! - [`PassthroughReason`]: why a link was left to the browser.
//! - [`TransportError`]: how a content request failed; cancellation is kept
//!   apart from real failures because it must never trigger a fallback.
//! - [`Rejection`]: why a fetched response could not be swapped in.
//! - [`NavigationError`]: the umbrella error carried into logs and fallbacks.
//!
//! # Examples
//!
//! ```
//! use hyperlink_navigator::error::{NavigationResult, PassthroughReason};
//!
//! let result = NavigationResult::Passthrough { reason: PassthroughReason::FileExtension };
//! assert!(!result.should_prevent_default());
//! assert_eq!(result.passthrough_reason(), Some(&PassthroughReason::FileExtension));
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a click, popstate, or programmatic visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// The navigator took over; the host must suppress the default action.
    Intercepted { url: String },
    /// A `beforeChange` listener vetoed the transition. The default action is
    /// still suppressed, so nothing happens at all.
    Prevented { url: String },
    /// The browser should handle the activation natively.
    Passthrough { reason: PassthroughReason },
    /// The navigator assigned the location directly (unsupported host or an
    /// unresolvable `visit` target).
    FullReload { url: String },
}

impl NavigationResult {
    /// Check if the navigator took over the navigation.
    pub fn is_intercepted(&self) -> bool {
        matches!(self, NavigationResult::Intercepted { .. })
    }

    /// Check if a listener vetoed the navigation.
    pub fn is_prevented(&self) -> bool {
        matches!(self, NavigationResult::Prevented { .. })
    }

    /// Check if the activation was left to the browser.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, NavigationResult::Passthrough { .. })
    }

    /// Check if the navigator fell back to a full page load.
    pub fn is_full_reload(&self) -> bool {
        matches!(self, NavigationResult::FullReload { .. })
    }

    /// Whether the host must call `preventDefault()` on the originating event.
    pub fn should_prevent_default(&self) -> bool {
        matches!(
            self,
            NavigationResult::Intercepted { .. } | NavigationResult::Prevented { .. }
        )
    }

    /// Get the passthrough reason, if the browser keeps the navigation.
    pub fn passthrough_reason(&self) -> Option<&PassthroughReason> {
        match self {
            NavigationResult::Passthrough { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Why a link activation is handed back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassthroughReason {
    /// The navigator is inactive on this host.
    Unsupported,
    /// Someone already called `preventDefault()`.
    DefaultPrevented,
    /// Non-primary button or a modifier key ("open in new tab").
    ModifiedClick,
    /// The anchor names a browsing context via `target`.
    ExplicitTarget,
    /// The anchor carries the opt-out marker attribute.
    OptedOut,
    /// The href could not be resolved against the current location.
    InvalidUrl,
    /// The target lives on another origin.
    CrossOrigin,
    /// Only the fragment differs from the current page.
    SamePageAnchor,
    /// The href is an empty fragment on the current page (`href="#"`).
    EmptyAnchor,
    /// The path looks like a file download (`/report.pdf`).
    FileExtension,
    /// A registered [`InterceptRule`](crate::intercept::InterceptRule) declined.
    Rule { name: &'static str, reason: String },
}

impl fmt::Display for PassthroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassthroughReason::Unsupported => write!(f, "navigator unsupported on this host"),
            PassthroughReason::DefaultPrevented => write!(f, "default action already prevented"),
            PassthroughReason::ModifiedClick => write!(f, "modified or non-primary click"),
            PassthroughReason::ExplicitTarget => write!(f, "anchor has a target"),
            PassthroughReason::OptedOut => write!(f, "anchor opted out"),
            PassthroughReason::InvalidUrl => write!(f, "href could not be resolved"),
            PassthroughReason::CrossOrigin => write!(f, "cross-origin target"),
            PassthroughReason::SamePageAnchor => write!(f, "same-page anchor"),
            PassthroughReason::EmptyAnchor => write!(f, "empty anchor"),
            PassthroughReason::FileExtension => write!(f, "path has a file extension"),
            PassthroughReason::Rule { name, reason } => write!(f, "rule '{}': {}", name, reason),
        }
    }
}

// ============================================================================
// Failure Types
// ============================================================================

/// Failure reported by the host transport for a content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network error or timeout. Responses with any status, including
    /// non-success ones, are delivered as `Ok` and judged by validation.
    Network { message: String },
    /// The request was aborted because a newer request superseded it.
    Cancelled,
}

impl TransportError {
    /// Create a network failure with a human-readable message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Check if this is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network { message } => write!(f, "network error: {}", message),
            TransportError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Why a fetched response cannot replace the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// HTTP status outside `200..=299`.
    Status { status: u16 },
    /// `Content-Type` missing or outside the HTML/XHTML/XML family.
    ContentType { content_type: Option<String> },
    /// The document builder could not make a document out of the body.
    Unparseable,
    /// The tracked script/stylesheet set differs from the current page.
    AssetsChanged,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Status { status } => write!(f, "unsuccessful status {}", status),
            Rejection::ContentType {
                content_type: Some(content_type),
            } => write!(f, "unsupported content type '{}'", content_type),
            Rejection::ContentType { content_type: None } => write!(f, "missing content type"),
            Rejection::Unparseable => write!(f, "response body is not a document"),
            Rejection::AssetsChanged => write!(f, "tracked assets changed"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Detailed error variants that can occur during navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// An href could not be resolved into an absolute URL.
    InvalidUrl { href: String, message: String },
    /// The content request failed.
    Transport(TransportError),
    /// The response was fetched but is not adoptable.
    Rejected(Rejection),
}

impl NavigationError {
    /// Check if this error should be recovered by a full page load.
    ///
    /// Cancellations are the only failure that must stay silent.
    pub fn requires_fallback(&self) -> bool {
        !matches!(self, NavigationError::Transport(TransportError::Cancelled))
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::InvalidUrl { href, message } => {
                write!(f, "Invalid URL '{}': {}", href, message)
            }
            NavigationError::Transport(err) => write!(f, "Transport failed: {}", err),
            NavigationError::Rejected(rejection) => write!(f, "Response rejected: {}", rejection),
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::InvalidUrl { .. } => None,
            NavigationError::Transport(err) => Some(err),
            NavigationError::Rejected(rejection) => Some(rejection),
        }
    }
}

impl From<TransportError> for NavigationError {
    fn from(err: TransportError) -> Self {
        NavigationError::Transport(err)
    }
}

impl From<Rejection> for NavigationError {
    fn from(rejection: Rejection) -> Self {
        NavigationError::Rejected(rejection)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_intercepted() {
        let result = NavigationResult::Intercepted {
            url: "http://localhost/a".to_string(),
        };
        assert!(result.is_intercepted());
        assert!(result.should_prevent_default());
        assert!(!result.is_passthrough());
        assert_eq!(result.passthrough_reason(), None);
    }

    #[test]
    fn test_navigation_result_prevented_still_suppresses_default() {
        let result = NavigationResult::Prevented {
            url: "http://localhost/a".to_string(),
        };
        assert!(result.is_prevented());
        assert!(result.should_prevent_default());
    }

    #[test]
    fn test_navigation_result_full_reload() {
        let result = NavigationResult::FullReload {
            url: "/a".to_string(),
        };
        assert!(result.is_full_reload());
        assert!(!result.should_prevent_default());
    }

    #[test]
    fn test_cancellation_never_requires_fallback() {
        let cancelled = NavigationError::from(TransportError::Cancelled);
        assert!(!cancelled.requires_fallback());

        let network = NavigationError::from(TransportError::network("connection reset"));
        assert!(network.requires_fallback());

        let rejected = NavigationError::from(Rejection::AssetsChanged);
        assert!(rejected.requires_fallback());
    }

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::from(Rejection::ContentType {
            content_type: Some("application/json".to_string()),
        });
        assert_eq!(
            error.to_string(),
            "Response rejected: unsupported content type 'application/json'"
        );

        let error = NavigationError::from(Rejection::Status { status: 404 });
        assert_eq!(error.to_string(), "Response rejected: unsuccessful status 404");

        let error = NavigationError::from(TransportError::network("timeout"));
        assert_eq!(error.to_string(), "Transport failed: network error: timeout");
    }

    #[test]
    fn test_rule_reason_display() {
        let reason = PassthroughReason::Rule {
            name: "admin",
            reason: "admin pages reload".to_string(),
        };
        assert_eq!(reason.to_string(), "rule 'admin': admin pages reload");
    }
}
