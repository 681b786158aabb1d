//! The single in-flight request slot.
//!
//! At most one content request is outstanding per engine. A request for a
//! different target pre-empts (aborts) the current one; a request for the same
//! target coalesces onto it. A prefetch that a real navigation coalesces onto
//! is upgraded to a navigation exactly once, which is what binds its
//! completion to a page swap.
//!
//! Completions are matched by [`RequestId`]: once a request is aborted or
//! settled the slot no longer holds its id, so a late completion is stale and
//! dropped.

use crate::host::{RequestId, Transport};
use crate::{debug_log, trace_log};

/// Identifier of a hover session that started a prefetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// What the request's completion is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    /// Warm the cache only; failures are silent.
    Prefetch,
    /// Swap the page in, or fall back to a full load.
    Navigate,
}

/// The request currently occupying the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightRequest {
    id: RequestId,
    target: String,
    purpose: RequestPurpose,
    session: Option<SessionId>,
}

impl InFlightRequest {
    /// Transport id.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Absolute URL being fetched.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current purpose.
    pub fn purpose(&self) -> RequestPurpose {
        self.purpose
    }

    /// Hover session that started this prefetch, if it is still a prefetch.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }
}

/// Result of asking the slot for `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A new request was issued.
    Issued(RequestId),
    /// A pending prefetch for the same target now drives a navigation.
    Upgraded(RequestId),
    /// A request for the same target is already pending; nothing changed.
    Coalesced(RequestId),
}

impl Dispatch {
    /// Id of the request that now serves the caller.
    pub fn id(&self) -> RequestId {
        match *self {
            Dispatch::Issued(id) | Dispatch::Upgraded(id) | Dispatch::Coalesced(id) => id,
        }
    }

    /// Check if a new network request was issued.
    pub fn is_issued(&self) -> bool {
        matches!(self, Dispatch::Issued(_))
    }
}

/// Owner of the one outstanding content request.
#[derive(Debug, Default)]
pub struct FlightSlot {
    request: Option<InFlightRequest>,
    issued: u64,
    aborted: u64,
}

impl FlightSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    pub fn current(&self) -> Option<&InFlightRequest> {
        self.request.as_ref()
    }

    /// Check if a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.request.is_some()
    }

    /// Total requests issued through this slot.
    pub fn issued_count(&self) -> u64 {
        self.issued
    }

    /// Total requests aborted by pre-emption or hover cancellation.
    pub fn aborted_count(&self) -> u64 {
        self.aborted
    }

    /// Make sure a request for `target` is in flight.
    ///
    /// Aborts a request for any other target first. `session` is only
    /// recorded for prefetches.
    pub fn begin<T>(
        &mut self,
        target: &str,
        purpose: RequestPurpose,
        session: Option<SessionId>,
        transport: &mut T,
    ) -> Dispatch
    where
        T: Transport + ?Sized,
    {
        if let Some(stale) = self.take_superseded(target) {
            debug_log!(
                "Aborting {} for '{}' in favour of '{}'",
                stale.id,
                stale.target,
                target
            );
            transport.abort(stale.id);
            self.aborted += 1;
        }

        if let Some(request) = self.request.as_mut() {
            if purpose == RequestPurpose::Navigate && request.purpose == RequestPurpose::Prefetch {
                trace_log!("Binding pending prefetch {} to navigation", request.id);
                request.purpose = RequestPurpose::Navigate;
                request.session = None;
                return Dispatch::Upgraded(request.id);
            }
            trace_log!("Coalescing onto pending {} for '{}'", request.id, target);
            return Dispatch::Coalesced(request.id);
        }

        let id = transport.issue(target);
        self.issued += 1;
        self.request = Some(InFlightRequest {
            id,
            target: target.to_string(),
            purpose,
            session: match purpose {
                RequestPurpose::Prefetch => session,
                RequestPurpose::Navigate => None,
            },
        });
        Dispatch::Issued(id)
    }

    /// Release the slot for a completed request.
    ///
    /// Returns `None` when `id` is not the outstanding request (it was
    /// aborted or superseded); such completions must have no effect.
    pub fn settle(&mut self, id: RequestId) -> Option<InFlightRequest> {
        match &self.request {
            Some(request) if request.id == id => self.request.take(),
            _ => None,
        }
    }

    fn take_superseded(&mut self, target: &str) -> Option<InFlightRequest> {
        match &self.request {
            Some(request) if request.target != target => self.request.take(),
            _ => None,
        }
    }

    /// Abort the prefetch started by `session` if it is still un-upgraded.
    pub fn abort_session<T>(&mut self, session: SessionId, transport: &mut T) -> bool
    where
        T: Transport + ?Sized,
    {
        match &self.request {
            Some(request)
                if request.purpose == RequestPurpose::Prefetch
                    && request.session == Some(session) =>
            {
                debug_log!("Aborting hover prefetch {} for '{}'", request.id, request.target);
                transport.abort(request.id);
                self.request = None;
                self.aborted += 1;
                true
            }
            _ => false,
        }
    }
}
