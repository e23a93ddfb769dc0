//! Per-cookie session state, kept in memory with a TTL.
//!
//! `Idle -> AwaitingRating -> Idle`, plus `Failed` holding the selection of
//! a generation that can be retried.

use crate::media::GeneratedArtifact;
use crate::selection::Selection;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

const MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingRating {
        selection: Selection,
        artifact: GeneratedArtifact,
    },
    Failed {
        selection: Selection,
        reason: String,
    },
}

struct Entry {
    touched: Instant,
    state: SessionState,
}

pub struct SessionTable {
    entries: Mutex<HashMap<Uuid, Entry>>,
    ttl: Duration,
    max_entries: usize,
}

impl SessionTable {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_SESSIONS)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.touched) < self.ttl
    }

    /// Current state; unknown and expired sessions are `Idle`.
    pub fn get(&self, id: Uuid) -> SessionState {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&id)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn set(&self, id: Uuid, state: SessionState) {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(&id) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| now.duration_since(entry.touched) < self.ttl);
            if entries.len() >= self.max_entries
                && let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.touched)
                    .map(|(id, _)| *id)
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            id,
            Entry {
                touched: now,
                state,
            },
        );
    }

    /// Take the pending selection, leaving the session `Idle`. `None` when
    /// nothing awaits a rating.
    pub fn take_pending(&self, id: Uuid) -> Option<(Selection, GeneratedArtifact)> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get_mut(&id).filter(|entry| self.is_live(entry, now))?;
        match std::mem::take(&mut entry.state) {
            SessionState::AwaitingRating {
                selection,
                artifact,
            } => {
                entry.touched = now;
                Some((selection, artifact))
            }
            other => {
                entry.state = other;
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SessionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTable")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}
