//! The navigation controller.
//!
//! [`Navigator`] is the object the host wires its events into. It decides
//! whether a link activation is taken over, runs the `BeforeChange` veto, and
//! hands accepted navigations to its [`NavigationEngine`]:
//!
//! | Host event | Method |
//! |------------|--------|
//! | initial page ready | [`start`](Navigator::start) |
//! | anchor click | [`on_click`](Navigator::on_click) |
//! | history traversal | [`on_popstate`](Navigator::on_popstate) |
//! | request completed | [`complete`](Navigator::complete) |
//! | pointer moved | [`on_mouse_move`](Navigator::on_mouse_move) |
//! | pointer entered / left an anchor | [`on_mouse_enter`](Navigator::on_mouse_enter) / [`on_mouse_leave`](Navigator::on_mouse_leave) |
//! | timer fired | [`on_timer`](Navigator::on_timer) |
//!
//! # Example
//!
//! ```ignore
//! use hyperlink_navigator::{Anchor, Capabilities, ClickEvent, Navigator, NavigatorConfig};
//!
//! let mut navigator = Navigator::with_config(host, &Capabilities::modern(), NavigatorConfig::new());
//! navigator.start();
//!
//! let result = navigator.on_click(&Anchor::new("/about"), &ClickEvent::primary());
//! if result.should_prevent_default() {
//!     // suppress the browser's own navigation
//! }
//! ```
//!
//! On an unsupported host every method is inert apart from
//! [`visit`](Navigator::visit), which degrades to a full page load.

use crate::cache::NavigationCache;
use crate::canonical::CanonicalUrl;
use crate::config::{Capabilities, NavigatorConfig};
use crate::engine::{NavigationEngine, Settlement};
use crate::error::{NavigationResult, PassthroughReason, TransportError};
#[cfg(feature = "prefetch")]
use crate::flight::Dispatch;
#[cfg(feature = "prefetch")]
use crate::host::TimerId;
use crate::host::{Host, RequestId, Response};
#[cfg(feature = "prefetch")]
use crate::intercept::classify_link;
use crate::intercept::{classify_click, Anchor, ClickEvent, InterceptRule, LinkDecision, RuleSet};
use crate::lifecycle::{EventBus, LifecycleListener, ListenerId, PageEvent};
#[cfg(feature = "prefetch")]
use crate::prefetch::HoverPrefetch;
use crate::{debug_log, info_log, warn_log};

/// Intercepts same-origin navigations and drives them through the engine.
pub struct Navigator<H: Host> {
    host: H,
    engine: NavigationEngine,
    bus: EventBus,
    rules: RuleSet,
    config: NavigatorConfig,
    supported: bool,
    #[cfg(feature = "prefetch")]
    hover: HoverPrefetch,
}

impl<H: Host> Navigator<H> {
    /// Create a navigator with the default configuration.
    pub fn new(host: H, capabilities: &Capabilities) -> Self {
        Self::with_config(host, capabilities, NavigatorConfig::default())
    }

    /// Create a navigator with an explicit configuration.
    pub fn with_config(host: H, capabilities: &Capabilities, config: NavigatorConfig) -> Self {
        let supported = capabilities.is_supported();
        if supported {
            info_log!(
                "Navigator ready (cache capacity {}, prefetch {})",
                config.cache_capacity,
                if config.prefetch_enabled { "on" } else { "off" }
            );
        } else {
            warn_log!("Host cannot intercept navigations; links will load normally");
        }

        Self {
            host,
            engine: NavigationEngine::new(&config),
            bus: EventBus::new(),
            rules: RuleSet::new(),
            config,
            supported,
            #[cfg(feature = "prefetch")]
            hover: HoverPrefetch::new(),
        }
    }

    /// Register an extra interception rule.
    pub fn rule(mut self, rule: impl InterceptRule) -> Self {
        self.add_rule(rule);
        self
    }

    /// Register an extra interception rule.
    pub fn add_rule(&mut self, rule: impl InterceptRule) {
        debug_log!("Registered intercept rule '{}'", rule.name());
        self.rules.add(rule);
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&mut self, listener: impl LifecycleListener) -> ListenerId {
        self.bus.subscribe(listener)
    }

    /// Remove a lifecycle listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Whether this host can be driven at all.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// The embedding host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The embedding host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The active configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The fetch engine.
    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    /// The page cache.
    pub fn cache(&self) -> &NavigationCache {
        self.engine.cache()
    }

    /// Set the cache capacity when given; return the effective capacity.
    pub fn configure_cache_capacity(&mut self, capacity: Option<usize>) -> usize {
        self.engine.configure_cache_capacity(capacity)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Announce the initial page and snapshot it into the cache.
    pub fn start(&mut self) {
        if !self.supported {
            return;
        }
        self.bus.publish(&PageEvent::Change);
        self.engine.capture_current(&self.host);
    }

    /// Navigate to `href` programmatically.
    ///
    /// Resolved against the current location and run through the
    /// `BeforeChange` veto like an intercepted click. Falls back to a full
    /// load on an unsupported host or an unresolvable `href`.
    pub fn visit(&mut self, href: &str) -> NavigationResult {
        if !self.supported {
            return self.reload(href);
        }
        match CanonicalUrl::resolve(href, &self.host.href()) {
            Ok(url) => self.navigate(url),
            Err(error) => {
                warn_log!("Cannot visit '{}': {}", href, error);
                self.reload(href)
            }
        }
    }

    /// Handle activation of `anchor`.
    ///
    /// The host must suppress its default navigation when the result says
    /// [`should_prevent_default`](NavigationResult::should_prevent_default).
    pub fn on_click(&mut self, anchor: &Anchor, click: &ClickEvent) -> NavigationResult {
        if !self.supported {
            return NavigationResult::Passthrough {
                reason: PassthroughReason::Unsupported,
            };
        }

        let current = self.host.href();
        match classify_click(
            click,
            anchor,
            &current,
            &self.config.opt_out_attribute,
            &self.rules,
        ) {
            LinkDecision::Intercept(url) => self.navigate(url),
            LinkDecision::Passthrough(reason) => NavigationResult::Passthrough { reason },
        }
    }

    /// Handle a history traversal that landed on `href`.
    ///
    /// The location has already changed, so no veto runs and no history entry
    /// is pushed.
    pub fn on_popstate(&mut self, href: &str) -> NavigationResult {
        if !self.supported {
            return NavigationResult::Passthrough {
                reason: PassthroughReason::Unsupported,
            };
        }

        let url = match CanonicalUrl::parse(href) {
            Ok(url) => url,
            Err(error) => {
                warn_log!("Ignoring history entry '{}': {}", href, error);
                return NavigationResult::Passthrough {
                    reason: PassthroughReason::InvalidUrl,
                };
            }
        };

        debug_log!("History traversal to '{}'", url);
        self.cancel_hover();
        self.engine.fetch(&url, &mut self.host, &self.bus);
        NavigationResult::Intercepted {
            url: url.absolute().to_string(),
        }
    }

    /// Deliver the outcome of request `id`.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<Response, TransportError>,
    ) -> Settlement {
        self.engine.complete(id, result, &mut self.host, &self.bus)
    }

    fn navigate(&mut self, url: CanonicalUrl) -> NavigationResult {
        let absolute = url.absolute().to_string();
        let action = self.bus.publish(&PageEvent::BeforeChange {
            url: absolute.clone(),
        });
        if action.is_prevent() {
            debug_log!("Navigation to '{}' prevented by a listener", absolute);
            return NavigationResult::Prevented { url: absolute };
        }

        info_log!("Navigating to '{}'", absolute);
        self.cancel_hover();
        self.engine.fetch(&url, &mut self.host, &self.bus);
        NavigationResult::Intercepted { url: absolute }
    }

    fn reload(&mut self, href: &str) -> NavigationResult {
        self.host.assign(href);
        NavigationResult::FullReload {
            url: href.to_string(),
        }
    }

    #[cfg(feature = "prefetch")]
    fn cancel_hover(&mut self) {
        self.hover.leave(&mut self.host);
    }

    #[cfg(not(feature = "prefetch"))]
    fn cancel_hover(&mut self) {}

    // ========================================================================
    // Hover prefetch
    // ========================================================================

    /// Record pointer movement. Hovers only count after the first move.
    #[cfg(feature = "prefetch")]
    pub fn on_mouse_move(&mut self) {
        self.hover.arm();
    }

    /// Start a hover session for `anchor` if it would be intercepted.
    ///
    /// Returns `true` when a session was opened. A cached copy younger than
    /// the freshness window opens the session without scheduling a prefetch.
    /// An open session is closed first, as if the pointer had left it.
    #[cfg(feature = "prefetch")]
    pub fn on_mouse_enter(&mut self, anchor: &Anchor) -> bool {
        if !self.supported || !self.config.prefetch_enabled || !self.hover.is_ready() {
            return false;
        }

        let current = self.host.href();
        let LinkDecision::Intercept(url) = classify_link(
            anchor,
            &current,
            &self.config.opt_out_attribute,
            &self.rules,
        ) else {
            return false;
        };

        let fresh = self.engine.cache().is_fresh(
            url.absolute(),
            self.host.now(),
            self.config.prefetch_freshness,
        );
        if let Some(previous) = self.hover.leave(&mut self.host) {
            self.engine.abort_session(previous, &mut self.host);
        }
        self.hover.enter(
            url.absolute(),
            fresh,
            self.config.prefetch_delay,
            &mut self.host,
        );
        true
    }

    /// Close the hover session, cancelling its timer and any prefetch it
    /// started that no click has claimed.
    #[cfg(feature = "prefetch")]
    pub fn on_mouse_leave(&mut self) {
        if let Some(session) = self.hover.leave(&mut self.host) {
            self.engine.abort_session(session, &mut self.host);
        }
    }

    /// Deliver a timer firing. Returns the dispatch when it started a
    /// prefetch.
    #[cfg(feature = "prefetch")]
    pub fn on_timer(&mut self, id: TimerId) -> Option<Dispatch> {
        let (session, url) = self.hover.fire(id)?;
        Some(
            self.engine
                .prefetch_replacement(&url, Some(session), &mut self.host),
        )
    }

    /// URL of the link currently hovered, if a session is open.
    #[cfg(feature = "prefetch")]
    pub fn hovered_url(&self) -> Option<&str> {
        self.hover.hovered_url()
    }
}

impl<H: Host> std::fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("supported", &self.supported)
            .field("config", &self.config)
            .field("cache", &self.engine.cache().len())
            .field("in_flight", &self.engine.flight().current())
            .field("rules", &self.rules)
            .field("listeners", &self.bus.len())
            .finish_non_exhaustive()
    }
}
