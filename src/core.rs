//! Digest primitives shared by streams, chains and series.
//!
//! Every helper hashes the UTF-8 text it is given and renders digests as lowercase hex,
//! because seeds are exchanged with verifiers as hex strings and re-hashed as text.
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Output size of HMAC-SHA256; one round of the byte stream.
pub const ROUND_BYTES: usize = 32;

pub type HmacSha256 = Hmac<Sha256>;

/// SHA-256 of `input`, hex encoded.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// MD5 of `input`, hex encoded. Only used to derive client seeds.
pub fn md5_hex(input: &str) -> String {
    let digest = md5::compute(input.as_bytes());
    hex::encode(digest.as_ref())
}

/// HMAC-SHA256 keyed with `key` over `message`.
pub fn hmac_sha256(key: &str, message: &str) -> [u8; ROUND_BYTES] {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().into()
}

pub fn hmac_sha256_hex(key: &str, message: &str) -> String {
    hex::encode(hmac_sha256(key, message))
}

/// 16 random bytes from the thread RNG, hex encoded.
pub fn random_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Fresh server seed: SHA-256 of a random token.
pub fn random_server_seed() -> String {
    sha256_hex(&random_token())
}

/// Fresh client seed: MD5 of a random token.
pub fn random_client_seed() -> String {
    md5_hex(&random_token())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hashes_text() {
        assert_eq!(
            sha256_hex("test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn md5_of_empty_string() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn hmac_known_answer() {
        assert_eq!(
            hmac_sha256_hex("seed", "salt:0"),
            "18e6774026b67fdf7687651023db21e4aa7259889871fbad4daed033699a5651"
        );
    }

    #[test]
    fn random_seeds_have_digest_shape() {
        let server = random_server_seed();
        let client = random_client_seed();
        assert_eq!(server.len(), 64);
        assert_eq!(client.len(), 32);
        assert_ne!(random_token(), random_token());
    }
}
