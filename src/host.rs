//! Host environment contracts.
//!
//! The navigator never touches a network stack, a DOM, or session history
//! directly. The embedding environment (a browser binding, a WebView shell, a
//! test fake) implements the traits below and feeds asynchronous completions
//! back through [`Navigator`](crate::Navigator) methods:
//!
//! | Trait | Provides | Completion delivered via |
//! |-------|----------|--------------------------|
//! | [`Transport`] | issuing and aborting content requests | [`Navigator::complete`](crate::Navigator::complete) |
//! | [`DocumentBuilder`] | parsing raw markup into a [`Document`] | |
//! | [`Location`] | current URL, history push, full navigation | [`Navigator::on_popstate`](crate::Navigator::on_popstate) |
//! | [`Dom`] | reading and replacing the live page | |
//! | [`Scheduler`] | clock and cancellable timers | [`Navigator::on_timer`](crate::Navigator::on_timer) |
//!
//! Anything implementing all five is a [`Host`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Attribute marking scripts and stylesheets whose identity is compared
/// across navigations.
pub const TRACK_ATTRIBUTE: &str = "data-hyperlinks-track";

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier the transport assigns to an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request#{}", self.0)
    }
}

/// Identifier the scheduler assigns to a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

// ============================================================================
// Response & Document
// ============================================================================

/// A completed content response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code. Anything outside `2xx` is rejected.
    pub status: u16,
    /// Value of the `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Response body text.
    pub body: String,
}

impl Response {
    /// A `200` response with the given content type.
    pub fn ok(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }

    /// A `200 text/html` response.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok("text/html; charset=utf-8", body)
    }
}

/// Structured document produced by a [`DocumentBuilder`].
///
/// Holds exactly the parts the navigator reads or swaps in: title, body
/// markup, named `<meta>` contents, and tracked asset URLs (the `href`/`src`
/// of elements carrying [`TRACK_ATTRIBUTE`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: String,
    body: String,
    meta: BTreeMap<String, String>,
    tracked_assets: Vec<String>,
}

impl Document {
    /// Create a document from its title and body markup.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Add a `<meta name=.. content=..>` entry.
    pub fn meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(name.into(), content.into());
        self
    }

    /// Add a tracked asset URL.
    pub fn tracked_asset(mut self, url: impl Into<String>) -> Self {
        self.tracked_assets.push(url.into());
        self
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body markup.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Content of the named `<meta>` element.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    /// Tracked asset URLs in document order.
    pub fn tracked_assets(&self) -> &[String] {
        &self.tracked_assets
    }
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Issues and aborts content requests.
///
/// Completion is reported asynchronously through
/// [`Navigator::complete`](crate::Navigator::complete). Completions for an
/// aborted request may still arrive; the navigator drops them.
pub trait Transport {
    /// Start a `GET` for `url` expecting HTML.
    fn issue(&mut self, url: &str) -> RequestId;

    /// Abort a request previously returned by [`issue`](Self::issue).
    fn abort(&mut self, id: RequestId);
}

/// Turns raw markup into a [`Document`].
pub trait DocumentBuilder {
    /// Parse `raw`. Malformed input yields `None`, never a panic.
    fn parse(&self, raw: &str) -> Option<Document>;
}

/// Session history and location.
pub trait Location {
    /// Absolute URL of the current document.
    fn href(&self) -> String;

    /// Push a history entry for `url` without loading it.
    fn push_state(&mut self, url: &str);

    /// Perform a full, non-intercepted navigation to `url`.
    fn assign(&mut self, url: &str);
}

/// Live document access.
pub trait Dom {
    /// Current document title.
    fn title(&self) -> String;

    /// Replace the document title.
    fn set_title(&mut self, title: &str);

    /// Replace the body subtree with the body of `document`.
    fn replace_body(&mut self, document: &Document);

    /// Scroll the viewport to the top-left corner.
    fn scroll_to_top(&mut self);

    /// Content of the named `<meta>` element on the live page.
    fn meta_content(&self, name: &str) -> Option<String>;

    /// Update the named `<meta>` element. A no-op if the page has none.
    fn set_meta_content(&mut self, name: &str, content: &str);

    /// Tracked asset URLs currently active on the page.
    fn tracked_assets(&self) -> Vec<String>;

    /// Serialized markup of the whole live document.
    fn document_html(&self) -> String;
}

/// Clock and cancellable one-shot timers.
pub trait Scheduler {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Arrange for [`Navigator::on_timer`](crate::Navigator::on_timer) to be
    /// called with the returned id after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending timer; cancelling a fired timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Everything the navigator needs from its environment.
pub trait Host: Transport + DocumentBuilder + Location + Dom + Scheduler {}

impl<T> Host for T where T: Transport + DocumentBuilder + Location + Dom + Scheduler {}
