/// Failures reported by verification helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("server seed does not hash to the committed server hash")]
    ServerHashMismatch,
    #[error("reveal at position {position} does not hash to its predecessor")]
    BrokenChain { position: usize },
    #[error("first reveal does not match the published commitment")]
    CommitmentMismatch,
    #[error("outcome at position {position} does not match the recomputed value")]
    OutcomeMismatch { position: usize },
    #[error("malformed input: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("hash chain of {count} entries has ended")]
    ChainExhausted { count: usize },
    #[error("unknown session {0}")]
    UnknownSession(String),
    #[error("session {0} is in use")]
    SessionBusy(String),
    #[error("nonce {nonce} is exhausted, rotate seed")]
    NonceExhausted { nonce: u64 },
}
