//! Navigator configuration and host capability detection.
//!
//! [`NavigatorConfig`] is built fluently:
//!
//! ```
//! use hyperlink_navigator::NavigatorConfig;
//! use std::time::Duration;
//!
//! let config = NavigatorConfig::new()
//!     .cache_capacity(50)
//!     .prefetch_delay(Duration::from_millis(100))
//!     .opt_out_attribute("data-turbo-false");
//!
//! assert_eq!(config.cache_capacity, 50);
//! ```

use crate::cache::NavigationCache;
use std::time::Duration;

/// Tunables for a [`Navigator`](crate::Navigator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Maximum number of cached page snapshots.
    pub cache_capacity: usize,
    /// Whether hovering eligible links warms the cache.
    pub prefetch_enabled: bool,
    /// Hover time before a prefetch is issued.
    pub prefetch_delay: Duration,
    /// A cached page younger than this is not prefetched again.
    pub prefetch_freshness: Duration,
    /// Anchor attribute that opts a link out of interception.
    pub opt_out_attribute: String,
    /// Name of the `<meta>` element carrying the anti-forgery token.
    pub csrf_meta_name: String,
}

impl NavigatorConfig {
    /// Default hover debounce.
    pub const DEFAULT_PREFETCH_DELAY: Duration = Duration::from_millis(250);
    /// Default prefetch freshness window.
    pub const DEFAULT_PREFETCH_FRESHNESS: Duration = Duration::from_secs(5);

    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            cache_capacity: NavigationCache::DEFAULT_CAPACITY,
            prefetch_enabled: cfg!(feature = "prefetch"),
            prefetch_delay: Self::DEFAULT_PREFETCH_DELAY,
            prefetch_freshness: Self::DEFAULT_PREFETCH_FRESHNESS,
            opt_out_attribute: "data-no-hyperlink".to_string(),
            csrf_meta_name: "csrf-token".to_string(),
        }
    }

    /// Set the page cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Enable or disable hover prefetching.
    pub fn prefetch(mut self, enabled: bool) -> Self {
        self.prefetch_enabled = enabled;
        self
    }

    /// Set the hover debounce delay.
    pub fn prefetch_delay(mut self, delay: Duration) -> Self {
        self.prefetch_delay = delay;
        self
    }

    /// Set the window in which a cached page counts as fresh.
    pub fn prefetch_freshness(mut self, window: Duration) -> Self {
        self.prefetch_freshness = window;
        self
    }

    /// Set the opt-out marker attribute.
    pub fn opt_out_attribute(mut self, name: impl Into<String>) -> Self {
        self.opt_out_attribute = name.into();
        self
    }

    /// Set the anti-forgery `<meta>` name.
    pub fn csrf_meta_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_meta_name = name.into();
        self
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What the host environment can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// `history.pushState` is available.
    pub history_api: bool,
    /// The host's user agent string.
    pub user_agent: String,
}

impl Capabilities {
    /// Describe a host.
    pub fn new(history_api: bool, user_agent: impl Into<String>) -> Self {
        Self {
            history_api,
            user_agent: user_agent.into(),
        }
    }

    /// A host with a history API and a neutral user agent.
    pub fn modern() -> Self {
        Self::new(true, "")
    }

    /// Whether the navigator may intercept anything on this host.
    ///
    /// Chrome on iOS (`CriOS/`) reports `pushState` but mishandles it.
    pub fn is_supported(&self) -> bool {
        self.history_api && !self.user_agent.contains("CriOS/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.cache_capacity, 20);
        assert_eq!(config.prefetch_delay, Duration::from_millis(250));
        assert_eq!(config.prefetch_freshness, Duration::from_secs(5));
        assert_eq!(config.opt_out_attribute, "data-no-hyperlink");
        assert_eq!(config.csrf_meta_name, "csrf-token");
    }

    #[test]
    fn test_builder_chain() {
        let config = NavigatorConfig::new()
            .prefetch(false)
            .prefetch_freshness(Duration::from_secs(1))
            .csrf_meta_name("authenticity-token");
        assert!(!config.prefetch_enabled);
        assert_eq!(config.prefetch_freshness, Duration::from_secs(1));
        assert_eq!(config.csrf_meta_name, "authenticity-token");
    }

    #[test]
    fn test_capabilities() {
        assert!(Capabilities::modern().is_supported());
        assert!(!Capabilities::new(false, "Mozilla/5.0").is_supported());
        let crios = "Mozilla/5.0 (iPhone) AppleWebKit/605.1.15 CriOS/119.0 Mobile/15E148";
        assert!(!Capabilities::new(true, crios).is_supported());
    }
}
