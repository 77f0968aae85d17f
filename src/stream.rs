//! Keyed, restartable byte stream.
//!
//! Bytes come in rounds of [`ROUND_BYTES`]: round `r` is
//! `HMAC_SHA256(server_seed, "{client_seed}:{nonce}:{r}")`. A cursor is an absolute offset into
//! the concatenation of all rounds, so a stream opened at cursor `c + 1` yields exactly the
//! suffix of a stream opened at `c`.
use crate::core::{hmac_sha256, ROUND_BYTES};
use crate::error::Error;
use crate::types::SeedState;

/// The 32 bytes of round `round` for the given seeds and nonce.
pub fn round_bytes(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    round: u64,
) -> [u8; ROUND_BYTES] {
    hmac_sha256(server_seed, &format!("{client_seed}:{nonce}:{round}"))
}

/// Infinite iterator over the byte stream of `(server_seed, client_seed, nonce)`.
#[derive(Debug, Clone)]
pub struct ByteStream {
    server_seed: String,
    client_seed: String,
    nonce: u64,
    round: u64,
    offset: usize,
    block: Option<[u8; ROUND_BYTES]>,
}

impl ByteStream {
    /// Open the stream positioned at `cursor`.
    pub fn new(
        server_seed: impl Into<String>,
        client_seed: impl Into<String>,
        nonce: u64,
        cursor: u64,
    ) -> Result<Self, Error> {
        let server_seed = server_seed.into();
        let client_seed = client_seed.into();
        if server_seed.is_empty() {
            return Err(Error::InvalidConfig("server_seed must not be empty".into()));
        }
        if client_seed.is_empty() {
            return Err(Error::InvalidConfig("client_seed must not be empty".into()));
        }
        let width = ROUND_BYTES as u64;
        Ok(Self {
            server_seed,
            client_seed,
            nonce,
            round: cursor / width,
            offset: (cursor % width) as usize,
            block: None,
        })
    }

    pub fn from_state(state: &SeedState) -> Result<Self, Error> {
        Self::new(
            state.server_seed.as_str(),
            state.client_seed.as_str(),
            state.nonce,
            state.cursor,
        )
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Absolute offset of the next byte this stream yields.
    pub fn cursor(&self) -> u64 {
        self.round * ROUND_BYTES as u64 + self.offset as u64
    }

    fn current_block(&mut self) -> &[u8; ROUND_BYTES] {
        let (server_seed, client_seed, nonce, round) =
            (&self.server_seed, &self.client_seed, self.nonce, self.round);
        self.block
            .get_or_insert_with(|| round_bytes(server_seed, client_seed, nonce, round))
    }
}

impl Iterator for ByteStream {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let offset = self.offset;
        let byte = self.current_block()[offset];
        self.offset += 1;
        if self.offset == ROUND_BYTES {
            self.offset = 0;
            self.round += 1;
            self.block = None;
        }
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
