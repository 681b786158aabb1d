//! URL normalization.
//!
//! [`CanonicalUrl`] resolves an href against the current document location
//! with the WHATWG URL algorithm (via the [`url`] crate), so default ports,
//! scheme-relative references, and dot segments normalize exactly the way a
//! browser would dereference the link. Cache keys, history entries, and origin
//! checks all go through this type.
//!
//! # Examples
//!
//! ```
//! use hyperlink_navigator::CanonicalUrl;
//!
//! let url = CanonicalUrl::resolve("../b/c.html#top", "http://example.com:80/a/x/").unwrap();
//! assert_eq!(url.origin(), "http://example.com");
//! assert_eq!(url.pathname(), "/a/b/c.html");
//! assert_eq!(url.hash(), "#top");
//! assert_eq!(url.without_hash(), "http://example.com/a/b/c.html");
//! assert!(url.has_extension());
//! ```

use crate::error::NavigationError;
use std::fmt;
use url::{Position, Url};

/// Canonical parts of a resolved href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl {
    url: Url,
    origin: String,
}

impl CanonicalUrl {
    /// Resolve `href` (relative or absolute) against the absolute `base`.
    pub fn resolve(href: &str, base: &str) -> Result<Self, NavigationError> {
        let invalid = |err: url::ParseError| NavigationError::InvalidUrl {
            href: href.to_string(),
            message: err.to_string(),
        };
        let base = Url::parse(base).map_err(invalid)?;
        let url = base.join(href).map_err(invalid)?;
        Ok(Self::from_url(url))
    }

    /// Parse an already absolute URL.
    pub fn parse(absolute: &str) -> Result<Self, NavigationError> {
        Url::parse(absolute)
            .map(Self::from_url)
            .map_err(|err| NavigationError::InvalidUrl {
                href: absolute.to_string(),
                message: err.to_string(),
            })
    }

    fn from_url(url: Url) -> Self {
        let origin = url.origin().ascii_serialization();
        Self { url, origin }
    }

    /// Scheme, host, and non-default port, e.g. `https://example.com:8443`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path component, always starting with `/` for hierarchical URLs.
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Fragment including the leading `#`, or `""` when absent or empty.
    pub fn hash(&self) -> &str {
        match self.url.fragment() {
            Some(fragment) if !fragment.is_empty() => &self.url[Position::AfterQuery..],
            _ => "",
        }
    }

    /// Full serialized URL; this is the cache key and the history entry.
    pub fn absolute(&self) -> &str {
        self.url.as_str()
    }

    /// Absolute form with any fragment (and its `#`) stripped.
    pub fn without_hash(&self) -> &str {
        &self.url[..Position::AfterQuery]
    }

    /// Check if both URLs share an origin.
    pub fn is_same_origin(&self, other: &CanonicalUrl) -> bool {
        self.origin == other.origin
    }

    /// Check if both URLs address the same document, ignoring fragments.
    pub fn is_same_page(&self, other: &CanonicalUrl) -> bool {
        self.without_hash() == other.without_hash()
    }

    /// Check if the URL ends in a bare `#` (`href="#"`).
    pub fn has_empty_fragment(&self) -> bool {
        self.url.fragment() == Some("")
    }

    /// Check if the pathname ends in `.` followed by lowercase letters.
    ///
    /// Such paths are almost always downloads or non-document resources.
    pub fn has_extension(&self) -> bool {
        match self.pathname().rsplit_once('.') {
            Some((_, ext)) => !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_lowercase()),
            None => false,
        }
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.absolute())
    }
}
