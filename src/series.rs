//! Nonce-chained HMAC reveal series.
//!
//! Each reveal is `HMAC_SHA256(seed, "{salt}:{nonce}")`, computed on demand. Unlike a
//! [`crate::HashChain`] the seed is used directly as the key, so keeping it secret until
//! disclosure is the caller's job.
use crate::core::hmac_sha256_hex;
use crate::error::Error;
use crate::types::HashSeriesState;

pub fn calc_hash(seed: &str, salt: &str, nonce: u64) -> String {
    hmac_sha256_hex(seed, &format!("{salt}:{nonce}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSeries {
    state: HashSeriesState,
}

impl HashSeries {
    pub fn new(state: HashSeriesState) -> Result<Self, Error> {
        if state.seed.is_empty() {
            return Err(Error::InvalidConfig("seed must not be empty".into()));
        }
        Ok(Self { state })
    }

    pub fn state(&self) -> &HashSeriesState {
        &self.state
    }

    /// Reveal at the current nonce.
    pub fn get_hash(&self) -> String {
        calc_hash(&self.state.seed, &self.state.salt, self.state.nonce)
    }

    /// Reveal at `nonce + 1`.
    pub fn peek_hash(&self) -> Result<String, Error> {
        let nonce = self.next_nonce()?;
        Ok(calc_hash(&self.state.seed, &self.state.salt, nonce))
    }

    /// The state one step ahead; adopt it with [`HashSeries::new`].
    pub fn next(&self) -> Result<HashSeriesState, Error> {
        Ok(HashSeriesState {
            nonce: self.next_nonce()?,
            ..self.state.clone()
        })
    }

    fn next_nonce(&self) -> Result<u64, Error> {
        self.state
            .nonce
            .checked_add(1)
            .ok_or(Error::NonceExhausted {
                nonce: self.state.nonce,
            })
    }
}
