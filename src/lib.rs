//! Provably fair randomness and commit-reveal primitives.
//!
//! Provides the building blocks a server needs to produce outcomes a client can audit later:
//! - A keyed byte stream over `(server_seed, client_seed, nonce, cursor)` and the fixed
//!   byte-to-float/int mappings verifiers recompute bit-for-bit.
//! - [`Session`], which owns seed state, advances the nonce on every draw and reports each new
//!   snapshot to a [`StateSink`].
//! - [`HashChain`], a precomputed SHA-256 chain for committing to many secrets up front.
//! - [`HashSeries`], an HMAC reveal series computed on demand.
//! - [`verify`] helpers that only need revealed values.

pub mod chain;
pub mod core;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod series;
pub mod session;
pub mod sink;
pub mod stream;
pub mod types;
pub mod verify;

pub use chain::{generate_hash_chain, HashChain};
pub use crate::core::{md5_hex, sha256_hex};
pub use error::{Error, VerifyError};
pub use mapper::{bytes_to_float, float_to_int, FloatStream};
pub use registry::SessionRegistry;
pub use series::{calc_hash, HashSeries};
pub use session::{Session, MAX_NONCE};
pub use sink::{NoopSink, RecordingSink, StateSink};
pub use stream::ByteStream;
pub use types::{
    HashChainConfig, HashChainConfigBuilder, HashChainState, HashSeriesState,
    HashSeriesStateBuilder, Reveal, SeedConfig, SeedConfigBuilder, SeedState,
    DEFAULT_CHAIN_LENGTH,
};
