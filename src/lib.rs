//! # hyperlink-navigator
//!
//! A page navigation engine for hosts that render server-side HTML. Instead of
//! letting every same-origin link click trigger a full page load, the
//! [`Navigator`] fetches the target in the background, swaps the page title
//! and body in place, and pushes a history entry. Visited pages are kept in a
//! bounded snapshot cache so going back is instant, and hovering a link can
//! warm that cache before the click.
//!
//! The navigator performs no I/O itself. The embedding environment implements
//! the [`Host`] traits and forwards its events:
//!
//! ```ignore
//! use hyperlink_navigator::{Anchor, Capabilities, ClickEvent, Navigator};
//!
//! let mut navigator = Navigator::new(host, &Capabilities::modern());
//! navigator.start();
//!
//! // in the click handler
//! if navigator.on_click(&anchor, &ClickEvent::primary()).should_prevent_default() {
//!     event.prevent_default();
//! }
//!
//! // when the transport finishes
//! navigator.complete(request_id, Ok(response));
//! ```
//!
//! ## Modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`canonical`] | URL resolution and the same-page / extension checks |
//! | [`cache`] | bounded snapshot store with oldest-first eviction |
//! | [`flight`] | the single in-flight request slot |
//! | [`validate`] | content-type, parse, and tracked-asset checks |
//! | [`engine`] | fetch coordination and page swapping |
//! | [`intercept`] | link classification and custom rules |
//! | [`lifecycle`] | page events and listeners |
//! | [`prefetch`] | hover session state machine |
//! | [`navigator`] | the controller wiring it all together |
//!
//! ## Features
//!
//! - `log` (default) / `tracing`: logging backend, see [`logging`].
//! - `prefetch` (default): hover-triggered cache warming.

pub mod cache;
pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod flight;
pub mod host;
pub mod intercept;
pub mod lifecycle;
pub mod logging;
pub mod navigator;
#[cfg(feature = "prefetch")]
pub mod prefetch;
pub mod validate;

pub use cache::{CacheEntry, CacheStats, NavigationCache};
pub use canonical::CanonicalUrl;
pub use config::{Capabilities, NavigatorConfig};
pub use engine::{NavigationEngine, Settlement};
pub use error::{NavigationError, NavigationResult, PassthroughReason, Rejection, TransportError};
pub use flight::{Dispatch, FlightSlot, InFlightRequest, RequestPurpose, SessionId};
pub use host::{
    Document, DocumentBuilder, Dom, Host, Location, RequestId, Response, Scheduler, TimerId,
    Transport, TRACK_ATTRIBUTE,
};
pub use intercept::{
    rule_fn, Anchor, ClickEvent, InterceptRule, LinkDecision, LinkRequest, Modifiers, MouseButton,
    RuleAction,
};
pub use lifecycle::{listener_fn, EventAction, EventBus, LifecycleListener, ListenerId, PageEvent};
pub use navigator::Navigator;
