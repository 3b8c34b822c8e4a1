// src/error.rs
use thiserror::Error;

/// Failures talking to the node or building/signing transactions.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("request to node failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned {status} for {url}: {body}")]
    Node { status: u16, url: String, body: String },

    #[error("unexpected node response: {0}")]
    Decode(String),

    #[error("failed to encode contract message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("chain sdk: {0}")]
    Sdk(String),

    #[error("key derivation failed: {0}")]
    Key(String),

    #[error("transaction {txhash} failed. code: {code}, codespace: {codespace}, raw_log: {raw_log}")]
    Rejected {
        txhash: String,
        code: u32,
        codespace: String,
        raw_log: String,
    },

    #[error("transaction {txhash} not included after {attempts} attempts")]
    Unconfirmed { txhash: String, attempts: u32 },
}

impl LedgerError {
    /// cosmrs reports errors as `eyre::Report`, which does not implement `std::error::Error`.
    pub(crate) fn sdk(err: impl std::fmt::Display) -> Self {
        LedgerError::Sdk(err.to_string())
    }
}
