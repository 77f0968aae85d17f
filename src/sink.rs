use crate::types::SeedState;
use std::sync::{Arc, RwLock};

/// Receives the full seed state after every nonce-advancing session call.
///
/// Called synchronously, exactly once per successful mutation, after the nonce moved.
/// Persisting the snapshot is up to the implementation.
pub trait StateSink {
    fn emit(&mut self, state: &SeedState);
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StateSink for NoopSink {
    fn emit(&mut self, _state: &SeedState) {}
}

impl<F> StateSink for F
where
    F: FnMut(&SeedState),
{
    fn emit(&mut self, state: &SeedState) {
        self(state)
    }
}

/// Keeps every emitted snapshot in memory. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    history: Arc<RwLock<Vec<SeedState>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<SeedState> {
        self.history.read().expect("sink lock poisoned").clone()
    }

    pub fn latest(&self) -> Option<SeedState> {
        self.history.read().expect("sink lock poisoned").last().cloned()
    }

    pub fn len(&self) -> usize {
        self.history.read().expect("sink lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateSink for RecordingSink {
    fn emit(&mut self, state: &SeedState) {
        self.history
            .write()
            .expect("sink lock poisoned")
            .push(state.clone());
    }
}
