//! Fetch coordination and page swapping.
//!
//! [`NavigationEngine`] owns the two pieces of state every navigation touches:
//! the [`NavigationCache`] and the [`FlightSlot`]. It is the half of the
//! navigator that talks to the network and the live page; deciding *whether*
//! to navigate is left to [`Navigator`](crate::Navigator).
//!
//! # Navigation pipeline
//!
//! | Step | Operation | Notification |
//! |------|-----------|--------------|
//! | 1 | [`restore`](NavigationEngine::restore) a cached snapshot, if any | `Change`, `Restore` |
//! | 2 | [`fetch_replacement`](NavigationEngine::fetch_replacement) | `Fetch` (only if a request was issued) |
//! | 3 | [`complete`](NavigationEngine::complete) with the response | `Receive` |
//! | 4 | validate, cache, swap, push history | `Change`, `Load` |
//!
//! A navigation whose response is rejected falls back to a full page load of
//! the same URL. A prefetch only ever writes to the cache.

use crate::cache::NavigationCache;
use crate::canonical::CanonicalUrl;
use crate::config::NavigatorConfig;
use crate::error::{NavigationError, TransportError};
use crate::flight::{Dispatch, FlightSlot, RequestPurpose, SessionId};
use crate::host::{Document, Host, RequestId, Response};
use crate::lifecycle::{EventBus, PageEvent};
use crate::validate::validate;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};

// ============================================================================
// Settlement
// ============================================================================

/// What a request completion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The completion belonged to an aborted or superseded request.
    Stale,
    /// A navigation response was adopted as the current page.
    Loaded { url: String },
    /// A prefetch response was stored in the cache.
    Cached { url: String },
    /// A navigation failed; the host was asked for a full load of `url`.
    FellBack { url: String, error: NavigationError },
    /// The transport reported the request as cancelled.
    Cancelled { url: String },
    /// A prefetch failed and was dropped.
    Discarded { url: String, error: NavigationError },
}

impl Settlement {
    /// Check if the live page changed as a result.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Settlement::Loaded { .. })
    }

    /// Check if the completion was ignored.
    pub fn is_stale(&self) -> bool {
        matches!(self, Settlement::Stale)
    }

    /// Check if a full page load was requested.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Settlement::FellBack { .. })
    }
}

// ============================================================================
// NavigationEngine
// ============================================================================

/// Page cache plus the single in-flight request slot.
#[derive(Debug)]
pub struct NavigationEngine {
    cache: NavigationCache,
    flight: FlightSlot,
    csrf_meta_name: String,
}

impl NavigationEngine {
    /// Create an engine sized and named by `config`.
    pub fn new(config: &NavigatorConfig) -> Self {
        Self {
            cache: NavigationCache::with_capacity(config.cache_capacity),
            flight: FlightSlot::new(),
            csrf_meta_name: config.csrf_meta_name.clone(),
        }
    }

    /// The page cache.
    pub fn cache(&self) -> &NavigationCache {
        &self.cache
    }

    /// The in-flight request slot.
    pub fn flight(&self) -> &FlightSlot {
        &self.flight
    }

    /// Set the cache capacity when `capacity` is given; return the effective
    /// capacity either way.
    pub fn configure_cache_capacity(&mut self, capacity: Option<usize>) -> usize {
        match capacity {
            Some(capacity) => self.cache.configure_capacity(capacity),
            None => self.cache.capacity(),
        }
    }

    /// Store the live document under the current URL.
    ///
    /// Called once the initial page is ready, so navigating back to it can
    /// restore from cache.
    pub fn capture_current<H>(&mut self, host: &H)
    where
        H: Host + ?Sized,
    {
        let key = current_key(host);
        debug_log!("Capturing initial page '{}'", key);
        self.cache.set_at(key, host.document_html(), host.now());
    }

    /// Restore a cached snapshot of `url` if there is one, then request fresh
    /// content.
    pub fn fetch<H>(&mut self, url: &CanonicalUrl, host: &mut H, bus: &EventBus) -> Dispatch
    where
        H: Host + ?Sized,
    {
        self.restore(url.absolute(), host, bus);
        self.fetch_replacement(url.absolute(), host, bus)
    }

    /// Swap in the cached snapshot of `url`. Returns `false` on a cache miss.
    pub fn restore<H>(&mut self, url: &str, host: &mut H, bus: &EventBus) -> bool
    where
        H: Host + ?Sized,
    {
        let Some(entry) = self.cache.get(url) else {
            trace_log!("No cached page for '{}'", url);
            return false;
        };
        let Some(document) = host.parse(entry.raw_content()) else {
            warn_log!("Cached page for '{}' no longer parses; skipping restore", url);
            return false;
        };

        debug_log!("Restoring '{}' from cache", url);
        self.update_page(&document, host, bus);
        update_history(url, host);
        bus.publish(&PageEvent::Restore {
            url: url.to_string(),
        });
        true
    }

    /// Make sure a navigation request for `url` is in flight.
    ///
    /// Coalesces onto a pending request for the same URL (upgrading a
    /// prefetch) and pre-empts any other.
    pub fn fetch_replacement<H>(&mut self, url: &str, host: &mut H, bus: &EventBus) -> Dispatch
    where
        H: Host + ?Sized,
    {
        let dispatch = self.flight.begin(url, RequestPurpose::Navigate, None, host);
        if dispatch.is_issued() {
            bus.publish(&PageEvent::Fetch {
                url: url.to_string(),
            });
        }
        debug_log!("Navigation to '{}': {:?}", url, dispatch);
        dispatch
    }

    /// Make sure a request for `url` is in flight to warm the cache.
    pub fn prefetch_replacement<H>(
        &mut self,
        url: &str,
        session: Option<SessionId>,
        host: &mut H,
    ) -> Dispatch
    where
        H: Host + ?Sized,
    {
        let dispatch = self
            .flight
            .begin(url, RequestPurpose::Prefetch, session, host);
        debug_log!("Prefetch of '{}': {:?}", url, dispatch);
        dispatch
    }

    /// Abort the prefetch a hover session started, unless a navigation has
    /// claimed it.
    pub fn abort_session<H>(&mut self, session: SessionId, host: &mut H) -> bool
    where
        H: Host + ?Sized,
    {
        self.flight.abort_session(session, host)
    }

    /// Handle the completion of request `id`.
    pub fn complete<H>(
        &mut self,
        id: RequestId,
        result: Result<Response, TransportError>,
        host: &mut H,
        bus: &EventBus,
    ) -> Settlement
    where
        H: Host + ?Sized,
    {
        let Some(request) = self.flight.settle(id) else {
            trace_log!("Dropping completion of stale {}", id);
            return Settlement::Stale;
        };
        let url = request.target().to_string();

        match request.purpose() {
            RequestPurpose::Navigate => self.complete_navigation(url, result, host, bus),
            RequestPurpose::Prefetch => self.complete_prefetch(url, result, host),
        }
    }

    fn complete_navigation<H>(
        &mut self,
        url: String,
        result: Result<Response, TransportError>,
        host: &mut H,
        bus: &EventBus,
    ) -> Settlement
    where
        H: Host + ?Sized,
    {
        let response = match result {
            Ok(response) => response,
            Err(TransportError::Cancelled) => {
                debug_log!("Navigation to '{}' was cancelled", url);
                return Settlement::Cancelled { url };
            }
            Err(error) => return fall_back(url, error.into(), host),
        };

        bus.publish(&PageEvent::Receive { url: url.clone() });

        let current_assets = host.tracked_assets();
        let document = match validate(&response, &*host, &current_assets) {
            Ok(document) => document,
            Err(rejection) => return fall_back(url, rejection.into(), host),
        };

        self.cache.set_at(url.clone(), response.body, host.now());
        self.update_page(&document, host, bus);
        update_history(&url, host);
        bus.publish(&PageEvent::Load { url: url.clone() });

        info_log!("Loaded '{}' (status {})", url, response.status);
        Settlement::Loaded { url }
    }

    fn complete_prefetch<H>(
        &mut self,
        url: String,
        result: Result<Response, TransportError>,
        host: &mut H,
    ) -> Settlement
    where
        H: Host + ?Sized,
    {
        let response = match result {
            Ok(response) => response,
            Err(TransportError::Cancelled) => return Settlement::Cancelled { url },
            Err(error) => {
                debug_log!("Prefetch of '{}' failed: {}", url, error);
                return Settlement::Discarded {
                    url,
                    error: error.into(),
                };
            }
        };

        let current_assets = host.tracked_assets();
        if let Err(rejection) = validate(&response, &*host, &current_assets) {
            debug_log!("Prefetch of '{}' rejected: {}", url, rejection);
            return Settlement::Discarded {
                url,
                error: rejection.into(),
            };
        }

        self.cache.set_at(url.clone(), response.body, host.now());
        debug_log!("Prefetched '{}'", url);
        Settlement::Cached { url }
    }

    /// Replace title and body, reset scroll, carry over the anti-forgery
    /// token, then emit `Change`.
    fn update_page<H>(&self, document: &Document, host: &mut H, bus: &EventBus)
    where
        H: Host + ?Sized,
    {
        host.set_title(document.title());
        host.replace_body(document);
        host.scroll_to_top();
        if let Some(token) = document.meta_content(&self.csrf_meta_name) {
            host.set_meta_content(&self.csrf_meta_name, token);
        }
        bus.publish(&PageEvent::Change);
    }
}

/// Push a history entry for `url` unless it is already the current location.
fn update_history<H>(url: &str, host: &mut H)
where
    H: Host + ?Sized,
{
    if current_key(&*host) != url {
        host.push_state(url);
    }
}

fn fall_back<H>(url: String, error: NavigationError, host: &mut H) -> Settlement
where
    H: Host + ?Sized,
{
    warn_log!("Falling back to a full load of '{}': {}", url, error);
    host.assign(&url);
    Settlement::FellBack { url, error }
}

/// Cache key of the live document: its canonical URL, or the raw href if the
/// host reports something unparseable.
fn current_key<H>(host: &H) -> String
where
    H: Host + ?Sized,
{
    let href = host.href();
    match CanonicalUrl::parse(&href) {
        Ok(url) => url.absolute().to_string(),
        Err(error) => {
            error_log!("Host reported an unusable location '{}': {}", href, error);
            href
        }
    }
}
