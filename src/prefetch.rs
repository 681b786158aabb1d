//! Hover-triggered prefetching.
//!
//! [`HoverPrefetch`] tracks one hover session at a time:
//!
//! 1. any `mousemove` arms the tracker, so a link that happens to sit under
//!    a stationary pointer when the page loads is never prefetched;
//! 2. `mouseenter` on an eligible link opens a session and schedules a
//!    debounce timer, replacing (and cancelling) any previous session;
//! 3. the timer firing hands the session's URL to the flight slot as a
//!    prefetch;
//! 4. `mouseleave` closes the session, cancelling its timer; the navigator
//!    also aborts the session's prefetch if no click has claimed it.
//!
//! Timers are matched by id, so a firing that races a cancellation is ignored.

use crate::flight::SessionId;
use crate::host::{Scheduler, TimerId};
use crate::trace_log;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HoverSession {
    id: SessionId,
    url: String,
    timer: Option<TimerId>,
}

/// Hover session state machine.
#[derive(Debug, Default)]
pub struct HoverPrefetch {
    ready: bool,
    next_session: u64,
    session: Option<HoverSession>,
}

impl HoverPrefetch {
    /// Create an unarmed tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record pointer movement; hovering only counts afterwards.
    pub fn arm(&mut self) {
        self.ready = true;
    }

    /// Check if pointer movement has been seen.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// URL of the open hover session, if any.
    pub fn hovered_url(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.url.as_str())
    }

    /// Check if a debounce timer is pending.
    pub fn is_pending(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.timer.is_some())
    }

    /// Open a session for `url`, closing any previous one.
    ///
    /// Schedules the debounce timer unless `fresh` says the cache already has
    /// a recent copy.
    pub fn enter<S>(
        &mut self,
        url: &str,
        fresh: bool,
        delay: Duration,
        scheduler: &mut S,
    ) -> SessionId
    where
        S: Scheduler + ?Sized,
    {
        self.leave(scheduler);

        let id = SessionId(self.next_session);
        self.next_session += 1;

        let timer = if fresh {
            trace_log!("Skipping prefetch of '{}': cached copy is fresh", url);
            None
        } else {
            Some(scheduler.schedule(delay))
        };

        self.session = Some(HoverSession {
            id,
            url: url.to_string(),
            timer,
        });
        id
    }

    /// Consume a timer firing. Returns the session and URL to prefetch when
    /// `timer` belongs to the open session.
    pub fn fire(&mut self, timer: TimerId) -> Option<(SessionId, String)> {
        let session = self.session.as_mut()?;
        if session.timer != Some(timer) {
            trace_log!("Ignoring stale {}", timer);
            return None;
        }
        session.timer = None;
        Some((session.id, session.url.clone()))
    }

    /// Close the open session, cancelling its timer. Returns its id.
    pub fn leave<S>(&mut self, scheduler: &mut S) -> Option<SessionId>
    where
        S: Scheduler + ?Sized,
    {
        let session = self.session.take()?;
        if let Some(timer) = session.timer {
            scheduler.cancel(timer);
        }
        Some(session.id)
    }
}
