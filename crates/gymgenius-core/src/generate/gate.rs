//! Single-flight gate for generation requests.
//!
//! At most one request is in flight. Each request is stamped with an epoch;
//! abandoning a request advances the epoch, so a late response carrying the
//! old epoch is recognized as stale and dropped.

/// Proof that a request was started, stamped with its epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    epoch: u64,
}

impl RequestTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Tracks the busy flag and the latest issued epoch.
#[derive(Debug, Default)]
pub struct GenerationGate {
    epoch: u64,
    busy: bool,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The epoch of the most recently issued ticket.
    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a request. Returns `None` while another request is in flight.
    pub fn begin(&mut self) -> Option<RequestTicket> {
        if self.busy {
            return None;
        }
        self.epoch += 1;
        self.busy = true;
        Some(RequestTicket { epoch: self.epoch })
    }

    /// Give up on the in-flight request. Its response will be stale.
    pub fn abandon(&mut self) {
        if self.busy {
            self.epoch += 1;
            self.busy = false;
        }
    }

    /// Finish a request. Returns `true` if `ticket` is current, in which case
    /// the gate is released and the response may be applied.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if ticket.epoch != self.epoch || !self.busy {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale generation response"
            );
            return false;
        }
        self.busy = false;
        true
    }
}

/// Abandons the in-flight request when dropped unless disarmed first.
///
/// Held across the await of a generation so that dropping the future
/// releases the gate instead of leaving it busy.
pub(crate) struct InFlightGuard<'a> {
    gate: &'a mut GenerationGate,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn new(gate: &'a mut GenerationGate) -> Self {
        Self { gate, armed: true }
    }

    /// The request ran to completion; leave the gate for `finish`.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(epoch = self.gate.epoch, "generation dropped before completion");
            self.gate.abandon();
        }
    }
}
