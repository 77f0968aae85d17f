use crate::core::{random_client_seed, random_server_seed, random_token, sha256_hex};
use crate::error::Error;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default commit horizon for a hash chain.
pub const DEFAULT_CHAIN_LENGTH: usize = 1_000_000;

/// Provable seed state owned by a [`crate::Session`].
///
/// `server_hash` is always `SHA256(server_seed)`; it is what gets published before play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedState {
    pub server_seed: String,
    pub client_seed: String,
    pub nonce: u64,
    pub cursor: u64,
    pub server_hash: String,
}

impl SeedState {
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Parse a persisted snapshot and re-run the defaulting checks on it.
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let config: SeedConfig =
            serde_json::from_str(raw).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.resolve()
    }
}

/// Partial seed configuration; anything left unset is filled by [`SeedConfig::resolve`].
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned")]
#[serde(rename_all = "camelCase", default)]
pub struct SeedConfig {
    #[builder(default, setter(into, strip_option))]
    pub server_seed: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub client_seed: Option<String>,
    #[builder(default)]
    pub nonce: u64,
    #[builder(default)]
    pub cursor: u64,
    #[builder(default, setter(into, strip_option))]
    pub server_hash: Option<String>,
}

impl SeedConfig {
    /// Fill missing seeds with fresh random ones and compute the server hash.
    ///
    /// Supplied seeds must be non-empty, and a supplied server hash must match the seed.
    pub fn resolve(self) -> Result<SeedState, Error> {
        let server_seed = match self.server_seed {
            Some(seed) if seed.is_empty() => {
                return Err(Error::InvalidConfig("server_seed must not be empty".into()))
            }
            Some(seed) => seed,
            None => random_server_seed(),
        };
        let client_seed = match self.client_seed {
            Some(seed) if seed.is_empty() => {
                return Err(Error::InvalidConfig("client_seed must not be empty".into()))
            }
            Some(seed) => seed,
            None => random_client_seed(),
        };
        let computed = sha256_hex(&server_seed);
        if let Some(hash) = self.server_hash {
            if !hash.eq_ignore_ascii_case(&computed) {
                return Err(Error::InvalidConfig(
                    "server_hash does not match server_seed".into(),
                ));
            }
        }
        Ok(SeedState {
            server_seed,
            client_seed,
            nonce: self.nonce,
            cursor: self.cursor,
            server_hash: computed,
        })
    }
}

impl SeedConfigBuilder {
    pub fn resolve(self) -> Result<SeedState, Error> {
        self.build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?
            .resolve()
    }
}

impl From<SeedState> for SeedConfig {
    fn from(state: SeedState) -> Self {
        Self {
            server_seed: Some(state.server_seed),
            client_seed: Some(state.client_seed),
            nonce: state.nonce,
            cursor: state.cursor,
            server_hash: Some(state.server_hash),
        }
    }
}

/// Persistable view of a hash chain: enough to rebuild it and resume at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashChainState {
    pub seed: String,
    pub count: usize,
    pub index: usize,
}

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(pattern = "owned")]
pub struct HashChainConfig {
    #[builder(default = "random_token()", setter(into))]
    pub seed: String,
    #[builder(default = "DEFAULT_CHAIN_LENGTH")]
    pub count: usize,
    #[builder(default)]
    pub index: usize,
}

impl From<HashChainState> for HashChainConfig {
    fn from(state: HashChainState) -> Self {
        Self {
            seed: state.seed,
            count: state.count,
            index: state.index,
        }
    }
}

/// A single revealed chain entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reveal {
    pub hash: String,
    pub count: usize,
    pub index: usize,
}

/// State of a nonce-chained HMAC series. Transitions produce a new value.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct HashSeriesState {
    #[builder(default = "random_token()", setter(into))]
    pub seed: String,
    #[builder(default = "random_token()", setter(into))]
    pub salt: String,
    #[builder(default)]
    pub nonce: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_SEED: &str = "aa47ddbf021afd16d64756e7f32b6cea2feebdfddc8fd57f1522641fdf372375";
    const SERVER_HASH: &str = "158e995ed494f58c06d93e22f71554cf2126614174fde336aedf9a457dbf16f4";

    #[test]
    fn resolve_fills_missing_fields() {
        let state = SeedConfig::default().resolve().unwrap();
        assert_eq!(state.server_seed.len(), 64);
        assert_eq!(state.client_seed.len(), 32);
        assert_eq!(state.nonce, 0);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.server_hash, sha256_hex(&state.server_seed));
    }

    #[test]
    fn builder_keeps_supplied_fields() {
        let state = SeedConfigBuilder::default()
            .server_seed(SERVER_SEED)
            .client_seed("client")
            .nonce(400)
            .resolve()
            .unwrap();
        assert_eq!(state.server_seed, SERVER_SEED);
        assert_eq!(state.client_seed, "client");
        assert_eq!(state.nonce, 400);
        assert_eq!(state.server_hash, SERVER_HASH);
    }

    #[test]
    fn resolve_rejects_empty_seed() {
        let err = SeedConfigBuilder::default()
            .client_seed("")
            .resolve()
            .expect_err("empty client seed");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn resolve_rejects_mismatched_server_hash() {
        let err = SeedConfigBuilder::default()
            .server_seed(SERVER_SEED)
            .server_hash(sha256_hex("other"))
            .resolve()
            .expect_err("hash mismatch");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn seed_state_json_uses_camel_case() {
        let state = SeedConfigBuilder::default()
            .server_seed(SERVER_SEED)
            .client_seed("client")
            .resolve()
            .unwrap();
        let raw = state.to_json().unwrap();
        assert!(raw.contains("\"serverSeed\""));
        assert!(raw.contains("\"serverHash\""));
        assert_eq!(SeedState::from_json(&raw).unwrap(), state);
    }

    #[test]
    fn from_json_defaults_missing_fields() {
        let state = SeedState::from_json(r#"{"clientSeed":"abc","nonce":7}"#).unwrap();
        assert_eq!(state.client_seed, "abc");
        assert_eq!(state.nonce, 7);
        assert_eq!(state.server_hash, sha256_hex(&state.server_seed));
    }

    #[test]
    fn chain_config_defaults() {
        let config = HashChainConfigBuilder::default().build().unwrap();
        assert_eq!(config.count, DEFAULT_CHAIN_LENGTH);
        assert_eq!(config.index, 0);
        assert!(!config.seed.is_empty());
    }
}
