//! Checks a counterparty can run with nothing but revealed values.
use crate::core::sha256_hex;
use crate::error::{Error, VerifyError};
use crate::mapper;
use crate::series::calc_hash;
use crate::stream::ByteStream;
use crate::types::HashSeriesState;

/// `SHA256(curr) == prev` for two consecutive chain reveals.
pub fn verify_link(prev: &str, curr: &str) -> bool {
    sha256_hex(curr).eq_ignore_ascii_case(prev)
}

/// Walk `reveals` (in increasing index order) back to the published `commitment`.
pub fn verify_reveals<S: AsRef<str>>(commitment: &str, reveals: &[S]) -> Result<(), VerifyError> {
    let mut prev = commitment;
    for (position, reveal) in reveals.iter().enumerate() {
        let curr = reveal.as_ref();
        if !verify_link(prev, curr) {
            return Err(if position == 0 {
                VerifyError::CommitmentMismatch
            } else {
                VerifyError::BrokenChain { position }
            });
        }
        prev = curr;
    }
    Ok(())
}

/// A disclosed server seed must hash to the server hash published before play.
pub fn verify_server_seed(server_seed: &str, server_hash: &str) -> Result<(), VerifyError> {
    if sha256_hex(server_seed).eq_ignore_ascii_case(server_hash) {
        Ok(())
    } else {
        Err(VerifyError::ServerHashMismatch)
    }
}

pub fn recompute_floats(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    cursor: u64,
    count: usize,
) -> Result<Vec<f64>, Error> {
    let mut stream = ByteStream::new(server_seed, client_seed, nonce, cursor)?;
    Ok(mapper::floats(&mut stream, count))
}

pub fn recompute_ints(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    cursor: u64,
    count: usize,
    max: u64,
    min: i64,
) -> Result<Vec<i64>, Error> {
    let mut stream = ByteStream::new(server_seed, client_seed, nonce, cursor)?;
    Ok(mapper::ints(&mut stream, count, max, min))
}

/// Recompute a round of ints at `nonce` (cursor 0) and compare with what was reported.
pub fn verify_ints(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    max: u64,
    min: i64,
    reported: &[i64],
) -> Result<(), VerifyError> {
    let expected = recompute_ints(server_seed, client_seed, nonce, 0, reported.len(), max, min)
        .map_err(|e| VerifyError::Malformed(e.to_string()))?;
    match expected.iter().zip(reported).position(|(a, b)| a != b) {
        Some(position) => Err(VerifyError::OutcomeMismatch { position }),
        None => Ok(()),
    }
}

/// A series reveal must equal the HMAC of its disclosed state.
pub fn verify_series_hash(state: &HashSeriesState, hash: &str) -> bool {
    calc_hash(&state.seed, &state.salt, state.nonce).eq_ignore_ascii_case(hash)
}
