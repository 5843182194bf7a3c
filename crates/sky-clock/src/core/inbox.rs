//! Single-writer mailbox for asynchronous lookup results.
//!
//! Every request gets a [`Ticket`]. Results are posted back with their ticket
//! at any time, but only the tick consumes them, and only a result newer than
//! the last applied one is ever handed out. Cancelling starts a new session,
//! which turns every outstanding ticket stale.

use crate::api::types::Ticket;

#[derive(Debug)]
pub struct Inbox<T> {
    session: u32,
    next_seq: u64,
    last_applied: u64,
    pending: Option<(Ticket, T)>,
}

impl<T> Inbox<T> {
    pub fn new() -> Self {
        Self {
            session: 0,
            next_seq: 1,
            last_applied: 0,
            pending: None,
        }
    }

    /// Issue a ticket for a new request.
    pub fn issue(&mut self, now_ms: f64) -> Ticket {
        let ticket = Ticket {
            session: self.session,
            seq: self.next_seq,
            issued_at_ms: now_ms,
        };
        self.next_seq += 1;
        ticket
    }

    /// Offer a result. Stale results (older session, or not newer than what
    /// was already applied or is already waiting) are dropped.
    pub fn post(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.session != self.session || ticket.seq <= self.last_applied {
            return false;
        }
        if let Some((waiting, _)) = &self.pending {
            if waiting.seq >= ticket.seq {
                return false;
            }
        }
        self.pending = Some((ticket, value));
        true
    }

    /// Take the newest waiting result, marking it applied.
    pub fn take(&mut self) -> Option<(Ticket, T)> {
        let (ticket, value) = self.pending.take()?;
        self.last_applied = ticket.seq;
        Some((ticket, value))
    }

    /// Drop everything waiting and invalidate all outstanding tickets.
    pub fn cancel_all(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.pending = None;
    }
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_result_wins() {
        let mut inbox = Inbox::new();
        let first = inbox.issue(0.0);
        let second = inbox.issue(10.0);

        assert!(inbox.post(second, "second"));
        // arrives late, already superseded
        assert!(!inbox.post(first, "first"));

        let (ticket, value) = inbox.take().unwrap();
        assert_eq!(ticket, second);
        assert_eq!(value, "second");
        assert!(inbox.take().is_none());
    }

    #[test]
    fn older_than_applied_is_dropped() {
        let mut inbox = Inbox::new();
        let a = inbox.issue(0.0);
        let b = inbox.issue(1.0);
        inbox.post(b, 2);
        inbox.take();
        assert!(!inbox.post(a, 1));
        assert!(inbox.take().is_none());
    }

    #[test]
    fn cancel_invalidates_outstanding_tickets() {
        let mut inbox = Inbox::new();
        let ticket = inbox.issue(0.0);
        inbox.cancel_all();
        assert!(!inbox.post(ticket, 42));
        assert!(inbox.take().is_none());

        let fresh = inbox.issue(5.0);
        assert_eq!(fresh.session, 1);
        assert!(inbox.post(fresh, 43));
    }

    #[test]
    fn cancel_drops_waiting_result() {
        let mut inbox = Inbox::new();
        let ticket = inbox.issue(0.0);
        inbox.post(ticket, 1);
        inbox.cancel_all();
        assert!(inbox.take().is_none());
    }
}
