//! Page lifecycle notifications and the event bus that delivers them.
//!
//! This module defines three key abstractions:
//!
//! - [`PageEvent`]: the six point-in-time notifications the navigator emits.
//! - [`LifecycleListener`]: a trait for code that observes (and, for
//!   `BeforeChange`, vetoes) navigations.
//! - [`EventBus`]: synchronous, ordered delivery to registered listeners.
//!
//! # Event sequence
//!
//! For an intercepted navigation the navigator emits, in this order:
//!
//! 1. **`BeforeChange`**: preventable; a veto abandons the navigation
//! 2. **`Change`** + **`Restore`**: only when a cached snapshot exists
//! 3. **`Fetch`**: a network request was issued
//! 4. **`Receive`**: the response arrived
//! 5. **`Change`**: the page body was replaced
//! 6. **`Load`**: the fetched page is now the version of record

use std::fmt;

// ============================================================================
// PageEvent
// ============================================================================

/// A lifecycle notification. Payloads are immutable snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// An intercepted navigation is about to start. Preventable.
    BeforeChange { url: String },
    /// A network request for page content was issued.
    Fetch { url: String },
    /// The network response for a navigation arrived.
    Receive { url: String },
    /// The page was restored from a cached snapshot.
    Restore { url: String },
    /// The page title and body were replaced.
    Change,
    /// The fetched page was adopted.
    Load { url: String },
}

impl PageEvent {
    /// Event name as seen by page scripts (`page:beforeChange`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::BeforeChange { .. } => "page:beforeChange",
            PageEvent::Fetch { .. } => "page:fetch",
            PageEvent::Receive { .. } => "page:receive",
            PageEvent::Restore { .. } => "page:restore",
            PageEvent::Change => "page:change",
            PageEvent::Load { .. } => "page:load",
        }
    }

    /// Only `BeforeChange` honours a [`EventAction::Prevent`] answer.
    pub fn is_preventable(&self) -> bool {
        matches!(self, PageEvent::BeforeChange { .. })
    }

    /// Target URL carried by the event, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            PageEvent::BeforeChange { url }
            | PageEvent::Fetch { url }
            | PageEvent::Receive { url }
            | PageEvent::Restore { url }
            | PageEvent::Load { url } => Some(url),
            PageEvent::Change => None,
        }
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.url() {
            Some(url) => write!(f, "{} ({})", self.name(), url),
            None => f.write_str(self.name()),
        }
    }
}

// ============================================================================
// EventAction
// ============================================================================

/// A listener's answer to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventAction {
    /// Let the navigator carry on.
    #[default]
    Continue,
    /// Veto the navigation. Ignored for informational events.
    Prevent,
}

impl EventAction {
    /// Check if this action vetoes the navigation.
    pub fn is_prevent(&self) -> bool {
        matches!(self, Self::Prevent)
    }
}

// ============================================================================
// LifecycleListener trait
// ============================================================================

/// Observer of page lifecycle events.
///
/// Listeners run synchronously, in subscription order, on the navigator's
/// thread. They receive the event by reference and cannot reach back into the
/// navigator while it is dispatching.
///
/// # Example
///
/// ```
/// use hyperlink_navigator::{EventAction, LifecycleListener, PageEvent};
///
/// struct ConfirmUnsaved {
///     dirty: bool,
/// }
///
/// impl LifecycleListener for ConfirmUnsaved {
///     fn on_event(&self, event: &PageEvent) -> EventAction {
///         match event {
///             PageEvent::BeforeChange { .. } if self.dirty => EventAction::Prevent,
///             _ => EventAction::Continue,
///         }
///     }
/// }
/// ```
pub trait LifecycleListener: 'static {
    /// Handle an event.
    fn on_event(&self, event: &PageEvent) -> EventAction;

    /// Listener name for debugging.
    fn name(&self) -> &'static str {
        "LifecycleListener"
    }
}

/// Create a listener from a function or closure.
///
/// ```
/// use hyperlink_navigator::{listener_fn, EventAction, PageEvent};
///
/// let listener = listener_fn(|event: &PageEvent| {
///     println!("{}", event);
///     EventAction::Continue
/// });
/// ```
pub const fn listener_fn<F>(f: F) -> FnListener<F>
where
    F: Fn(&PageEvent) -> EventAction + 'static,
{
    FnListener { f }
}

/// Listener created from a function or closure.
pub struct FnListener<F> {
    f: F,
}

impl<F> LifecycleListener for FnListener<F>
where
    F: Fn(&PageEvent) -> EventAction + 'static,
{
    fn on_event(&self, event: &PageEvent) -> EventAction {
        (self.f)(event)
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered, synchronous event delivery.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn LifecycleListener>)>,
    next_id: u64,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every event published afterwards.
    pub fn subscribe(&mut self, listener: impl LifecycleListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener in subscription order.
    ///
    /// Every listener sees the event even after one prevents it. Returns
    /// [`EventAction::Prevent`] only for preventable events that at least one
    /// listener vetoed.
    pub fn publish(&self, event: &PageEvent) -> EventAction {
        let mut prevented = false;
        for (_, listener) in &self.listeners {
            if listener.on_event(event).is_prevent() && event.is_preventable() {
                crate::debug_log!("Listener '{}' prevented {}", listener.name(), event);
                prevented = true;
            }
        }
        if prevented {
            EventAction::Prevent
        } else {
            EventAction::Continue
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
