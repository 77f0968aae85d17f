//! Precomputed commit-reveal hash chain.
//!
//! `chain[count - 1] = SHA256(seed)` and `chain[i] = SHA256(chain[i + 1])`, so `chain[0]` is the
//! public commitment and each later entry is revealed in increasing index order. A verifier only
//! needs the previous reveal to check the next one.
use crate::core::sha256_hex;
use crate::error::Error;
use crate::types::{HashChainConfig, HashChainState, Reveal};
use tracing::{debug, warn};

/// Build `count` entries by hashing `seed` repeatedly, filling from the highest index down.
pub fn generate_hash_chain(seed: &str, count: usize) -> Vec<String> {
    let mut chain = vec![String::new(); count];
    let mut current = seed.to_owned();
    for slot in chain.iter_mut().rev() {
        current = sha256_hex(&current);
        slot.clone_from(&current);
    }
    chain
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChain {
    seed: String,
    chain: Vec<String>,
    index: usize,
}

impl HashChain {
    /// Build a chain of `count` entries positioned at index 0.
    pub fn new(seed: impl Into<String>, count: usize) -> Result<Self, Error> {
        Self::from_config(HashChainConfig {
            seed: seed.into(),
            count,
            index: 0,
        })
    }

    /// Build a chain and resume it at `config.index`.
    pub fn from_config(config: HashChainConfig) -> Result<Self, Error> {
        if config.seed.is_empty() {
            return Err(Error::InvalidConfig("seed must not be empty".into()));
        }
        if config.count == 0 {
            return Err(Error::InvalidConfig("count must be >= 1".into()));
        }
        if config.index >= config.count {
            return Err(Error::InvalidConfig("index must be < count".into()));
        }
        let chain = generate_hash_chain(&config.seed, config.count);
        debug!(count = config.count, index = config.index, "hash chain built");
        Ok(Self {
            seed: config.seed,
            chain,
            index: config.index,
        })
    }

    pub fn from_state(state: HashChainState) -> Result<Self, Error> {
        Self::from_config(state.into())
    }

    pub fn state(&self) -> HashChainState {
        HashChainState {
            seed: self.seed.clone(),
            count: self.count(),
            index: self.index,
        }
    }

    /// The public commitment, `chain[0]`.
    pub fn commitment(&self) -> &str {
        &self.chain[0]
    }

    pub fn count(&self) -> usize {
        self.chain.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index + 1 >= self.chain.len()
    }

    /// Current revealed value.
    pub fn get(&self) -> &str {
        &self.chain[self.index]
    }

    /// Value the next reveal will return; `None` at the end of the chain.
    pub fn peek(&self) -> Option<&str> {
        self.chain.get(self.index + 1).map(String::as_str)
    }

    /// The reveal before the current one; `None` at index 0.
    pub fn last(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.chain.get(i))
            .map(String::as_str)
    }

    /// Reveal the next entry and advance.
    pub fn next(&mut self) -> Result<Reveal, Error> {
        let Some(hash) = self.peek().map(str::to_owned) else {
            warn!(count = self.count(), "hash chain exhausted");
            return Err(Error::ChainExhausted {
                count: self.count(),
            });
        };
        self.index += 1;
        Ok(Reveal {
            hash,
            count: self.count(),
            index: self.index,
        })
    }
}
