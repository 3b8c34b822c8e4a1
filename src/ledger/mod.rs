// src/ledger/mod.rs
use async_trait::async_trait;
use cosmrs::{AccountId, Coin};
use serde::Deserialize;

use crate::error::LedgerError;

pub mod lcd;

pub use lcd::LcdClient;

/// Signing metadata of an on-chain account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Remote node used to sequence, simulate, broadcast and look up transactions.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn account(&self, address: &AccountId) -> Result<AccountInfo, LedgerError>;

    /// Returns the gas used by a dry run of the signed transaction.
    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, LedgerError>;

    /// Stability tax owed on the native funds the transaction's messages carry.
    async fn compute_tax(&self, tx_bytes: &[u8]) -> Result<Vec<Coin>, LedgerError>;

    /// Submits a signed transaction and returns the mempool (check) result.
    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, LedgerError>;

    /// Looks up an included transaction; `None` while it is still pending.
    async fn tx(&self, hash: &str) -> Result<Option<TxResponse>, LedgerError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TxResponse {
    #[serde(default)]
    pub height: String,
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Vec<MessageLog>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageLog {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl TxResponse {
    pub fn is_err(&self) -> bool {
        self.code != 0
    }

    pub fn into_result(self) -> Result<Self, LedgerError> {
        if self.is_err() {
            return Err(LedgerError::Rejected {
                txhash: self.txhash,
                code: self.code,
                codespace: self.codespace,
                raw_log: self.raw_log,
            });
        }
        Ok(self)
    }

    /// First value of `key` on an `event` emitted by the transaction.
    ///
    /// Message logs are searched first (older nodes only fill those), then the
    /// flat event list newer nodes return alongside them.
    pub fn attribute(&self, event: &str, key: &str) -> Option<&str> {
        self.logs
            .iter()
            .flat_map(|log| log.events.iter())
            .chain(self.events.iter())
            .filter(|e| e.kind == event)
            .flat_map(|e| e.attributes.iter())
            .find(|a| a.key == key)
            .and_then(|a| a.value.as_deref())
    }
}
