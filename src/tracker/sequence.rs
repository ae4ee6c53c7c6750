//! Global pairing-number allocation for wrapped commands.

use tokio::sync::{Mutex, MutexGuard};

/// Hands out strictly increasing sequence numbers starting at 1.
///
/// A number is only consumed when its [`SequenceTicket`] is committed, and the
/// ticket holds the allocator until then. Callers send the wrapped text while
/// holding the ticket, so numbers reach panes in allocation order and a failed
/// dispatch leaves no gap.
#[derive(Debug)]
pub struct SequenceAllocator {
    next: Mutex<u64>,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Mutex::new(first.max(1)),
        }
    }

    /// Reserve the next number, waiting for any in-flight dispatch to finish.
    pub async fn reserve(&self) -> SequenceTicket<'_> {
        SequenceTicket {
            guard: self.next.lock().await,
        }
    }

    /// Number the next reservation will receive.
    pub async fn peek(&self) -> u64 {
        *self.next.lock().await
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive claim on the next sequence number.
#[must_use = "dropping a ticket without commit() releases the number unused"]
pub struct SequenceTicket<'a> {
    guard: MutexGuard<'a, u64>,
}

impl SequenceTicket<'_> {
    pub fn seq(&self) -> u64 {
        *self.guard
    }

    /// Move this ticket past `seen`, a number already used in a pane.
    pub fn skip_past(&mut self, seen: u64) {
        if *self.guard <= seen {
            *self.guard = seen.saturating_add(1);
        }
    }

    /// Consume the number after a successful dispatch.
    pub fn commit(mut self) -> u64 {
        let seq = *self.guard;
        *self.guard = seq + 1;
        seq
    }
}
