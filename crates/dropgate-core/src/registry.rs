//! Registry of in-flight transfer sessions.
//!
//! The registry is the only shared mutable state in the core. Sessions live
//! in a sharded [`DashMap`], so two events for different transfers rarely
//! contend, and every compound operation on one transfer (check the state,
//! then change or remove it) runs while holding only that entry's shard lock.
//!
//! Callers must not signal collaborators while holding a reference into the
//! map; every method here returns owned clones for that reason.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::session::{SessionState, TransferSession};

/// How many resolved ids are remembered for late-event classification.
pub const RECENTLY_RESOLVED_CAPACITY: usize = 256;

/// Exclusive owner of active [`TransferSession`]s, keyed by transfer id.
#[derive(Debug, Default)]
pub struct ConsentRegistry {
    sessions: DashMap<String, TransferSession>,
    resolved: Mutex<ResolvedIds>,
}

impl ConsentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the session for its transfer id.
    ///
    /// Returns the session that was replaced, if any.
    pub fn put(&self, session: TransferSession) -> Option<TransferSession> {
        self.sessions
            .insert(session.transfer_id().to_string(), session)
    }

    /// Insert the session only if its transfer id is not already active.
    pub fn insert_new(&self, session: TransferSession) -> bool {
        match self.sessions.entry(session.transfer_id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        }
    }

    /// Snapshot of the session for `transfer_id`.
    #[must_use]
    pub fn get(&self, transfer_id: &str) -> Option<TransferSession> {
        self.sessions.get(transfer_id).map(|s| s.value().clone())
    }

    /// Atomically remove and return the session, if present.
    ///
    /// Of two concurrent callers for the same id exactly one receives the
    /// session.
    pub fn remove_if_present(&self, transfer_id: &str) -> Option<TransferSession> {
        let mut resolved = self.lock_resolved();
        let (id, session) = self.sessions.remove(transfer_id)?;
        resolved.push(id);
        Some(session)
    }

    /// Atomically remove the session only while it is in `state`.
    pub fn remove_if_state(
        &self,
        transfer_id: &str,
        state: SessionState,
    ) -> Option<TransferSession> {
        let mut resolved = self.lock_resolved();
        let (id, session) = self
            .sessions
            .remove_if(transfer_id, |_, s| s.state() == state)?;
        resolved.push(id);
        Some(session)
    }

    /// Atomically move a session from `from` to `to`.
    ///
    /// Returns the updated snapshot, or `None` if the session is absent, is
    /// not in `from`, or the edge is not allowed.
    pub fn transition(
        &self,
        transfer_id: &str,
        from: SessionState,
        to: SessionState,
    ) -> Option<TransferSession> {
        let mut session = self.sessions.get_mut(transfer_id)?;
        if session.state() != from {
            return None;
        }
        if let Err(e) = session.transition(to) {
            tracing::warn!("{e}");
            return None;
        }
        Some(session.value().clone())
    }

    /// Number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of all active sessions, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    /// Whether `transfer_id` was removed from the registry recently.
    #[must_use]
    pub fn was_recently_resolved(&self, transfer_id: &str) -> bool {
        self.lock_resolved().contains(transfer_id)
    }

    // Held across every removal so a caller that loses the race already
    // sees the id as resolved. Always taken before a shard lock.
    fn lock_resolved(&self) -> MutexGuard<'_, ResolvedIds> {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded FIFO set of resolved transfer ids.
#[derive(Debug, Default)]
struct ResolvedIds {
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl ResolvedIds {
    fn push(&mut self, transfer_id: String) {
        if !self.members.insert(transfer_id.clone()) {
            return;
        }
        self.order.push_back(transfer_id);
        while self.order.len() > RECENTLY_RESOLVED_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    fn contains(&self, transfer_id: &str) -> bool {
        self.members.contains(transfer_id)
    }
}
