use crate::core::{md5_hex, sha256_hex};
use crate::error::Error;
use crate::mapper;
use crate::sink::{NoopSink, StateSink};
use crate::stream::ByteStream;
use crate::types::{SeedConfig, SeedState};
use tracing::{debug, warn};

/// A nonce equal to this value means the seed pair is spent.
pub const MAX_NONCE: u64 = u64::MAX;

/// Owns a seed state and hands out provable numbers from it.
///
/// Every generating call reads the stream at the current nonce, then bumps the nonce by one
/// and emits the new snapshot to the sink. Calls against one session must be serialized; see
/// [`crate::SessionRegistry`] for a keyed, locked wrapper.
#[derive(Debug)]
pub struct Session<S: StateSink = NoopSink> {
    state: SeedState,
    sink: S,
}

impl Session<NoopSink> {
    pub fn new(config: SeedConfig) -> Result<Self, Error> {
        Self::with_sink(config, NoopSink)
    }
}

impl<S: StateSink> Session<S> {
    pub fn with_sink(config: SeedConfig, sink: S) -> Result<Self, Error> {
        let state = config.resolve()?;
        debug!(
            server_hash = %state.server_hash,
            nonce = state.nonce,
            "session opened"
        );
        Ok(Self { state, sink })
    }

    /// Current snapshot.
    pub fn state(&self) -> &SeedState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (SeedState, S) {
        (self.state, self.sink)
    }

    /// `count` floats in `[0, 1)` at the current nonce.
    pub fn floats(&mut self, count: usize) -> Result<Vec<f64>, Error> {
        let next = self.next_nonce()?;
        let mut stream = ByteStream::from_state(&self.state)?;
        let values = mapper::floats(&mut stream, count);
        self.commit(next);
        Ok(values)
    }

    /// `count` integers in `[min, min + max)` at the current nonce; `max == 0` yields `min`.
    pub fn ints(&mut self, count: usize, max: u64, min: i64) -> Result<Vec<i64>, Error> {
        let next = self.next_nonce()?;
        let mut stream = ByteStream::from_state(&self.state)?;
        let values = mapper::ints(&mut stream, count, max, min);
        self.commit(next);
        Ok(values)
    }

    /// Burn the current nonce without producing output.
    pub fn tick(&mut self) -> Result<&SeedState, Error> {
        let next = self.next_nonce()?;
        self.commit(next);
        Ok(&self.state)
    }

    /// Derive the seed pair for the next rotation; this session is left untouched.
    ///
    /// The new client seed is `client_seed` when given (and non-empty), otherwise
    /// `MD5("{client_seed}:{salt}")`; the new server seed is `SHA256("{server_seed}:{salt}")`.
    pub fn next(&self, salt: &str, client_seed: Option<&str>) -> Result<SeedState, Error> {
        let client_seed = match client_seed.filter(|seed| !seed.is_empty()) {
            Some(seed) => seed.to_owned(),
            None => md5_hex(&format!("{}:{salt}", self.state.client_seed)),
        };
        let server_seed = sha256_hex(&format!("{}:{salt}", self.state.server_seed));
        let rotated = SeedConfig {
            server_seed: Some(server_seed),
            client_seed: Some(client_seed),
            ..SeedConfig::default()
        }
        .resolve()?;
        debug!(
            from = %self.state.server_hash,
            to = %rotated.server_hash,
            "derived rotated seeds"
        );
        Ok(rotated)
    }

    /// Replace this session with one over the rotated seeds, keeping the sink.
    pub fn rotate(mut self, salt: &str, client_seed: Option<&str>) -> Result<Session<S>, Error> {
        let state = self.next(salt, client_seed)?;
        self.adopt(state);
        Ok(self)
    }

    /// Switch this session over to `state`, typically the result of [`Session::next`].
    ///
    /// The sink is kept and not notified; the adopted state has not been used yet.
    pub fn adopt(&mut self, state: SeedState) {
        debug!(
            from = %self.state.server_hash,
            to = %state.server_hash,
            "session adopted rotated seeds"
        );
        self.state = state;
    }

    fn next_nonce(&self) -> Result<u64, Error> {
        match self.state.nonce.checked_add(1) {
            Some(next) if next < MAX_NONCE => Ok(next),
            _ => {
                warn!(
                    server_hash = %self.state.server_hash,
                    nonce = self.state.nonce,
                    "nonce exhausted, seed must be rotated"
                );
                Err(Error::NonceExhausted {
                    nonce: self.state.nonce,
                })
            }
        }
    }

    fn commit(&mut self, nonce: u64) {
        self.state.nonce = nonce;
        debug!(server_hash = %self.state.server_hash, nonce, "nonce advanced");
        self.sink.emit(&self.state);
    }
}
