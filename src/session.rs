//! Render session: who owns the current request.
//!
//! Starting a request supersedes the one before it, and cancelling
//! supersedes the current one. Holders of a [`Ticket`] check it at their
//! own stage boundaries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, RetroError};

/// Shared handle to a render session. Cheap to clone; all clones see the
/// same current request.
#[derive(Debug, Clone, Default)]
pub struct Session {
    generation: Arc<AtomicU64>,
}

/// Proof of ownership of one request within a [`Session`].
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl Session {
    /// Create a session with no work in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any earlier ticket.
    pub fn begin(&self) -> Ticket {
        let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            id,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Supersede the current request without starting another.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Ticket {
    /// Whether this is still the session's current request.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::Acquire) == self.id
    }

    /// `Err(Superseded)` once a newer request or a cancel has happened.
    pub fn check(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            Err(RetroError::Superseded)
        }
    }

    /// Generation this ticket was issued for.
    pub fn id(&self) -> u64 {
        self.id
    }
}
