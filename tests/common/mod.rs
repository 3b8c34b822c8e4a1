#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tx::{Msg, Tx};
use cosmrs::{AccountId, Any, Coin};
use tland_deploy::ledger::{AccountInfo, Attribute, Event};
use tland_deploy::{Ledger, LedgerError, TxResponse, TxSettings};

/// Valid 24-word BIP-39 test vector.
pub const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
    abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon \
    abandon abandon abandon abandon art";

pub const GAS_USED: u64 = 100_000;

/// Stability tax charged on uusd execute funds, per mille.
pub const TAX_PER_MILLE: u128 = 5;

/// What the node does with the next broadcast.
#[derive(Debug, Clone)]
pub enum Outcome {
    Included(Vec<Event>),
    RejectAtCheck(u32),
    RejectInBlock(u32),
    NeverIncluded,
}

#[derive(Debug, Clone)]
pub struct Broadcast {
    pub memo: String,
    pub messages: Vec<Any>,
    pub sequence: u64,
    pub gas_limit: u64,
    pub fee: u128,
    pub fee_coins: Vec<Coin>,
}

/// In-memory node that decodes every signed transaction it receives.
#[derive(Default)]
pub struct StubLedger {
    sequence: Mutex<u64>,
    script: Mutex<VecDeque<Outcome>>,
    included: Mutex<HashMap<String, TxResponse>>,
    pub broadcasts: Mutex<Vec<Broadcast>>,
    pub calls: AtomicUsize,
}

impl StubLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let ledger = Self::default();
        ledger.script.lock().unwrap().extend(outcomes);
        ledger
    }

    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ledger for StubLedger {
    async fn account(&self, _address: &AccountId) -> Result<AccountInfo, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccountInfo {
            account_number: 42,
            sequence: *self.sequence.lock().unwrap(),
        })
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Tx::from_bytes(tx_bytes).map_err(|e| LedgerError::Decode(e.to_string()))?;
        Ok(GAS_USED)
    }

    async fn compute_tax(&self, tx_bytes: &[u8]) -> Result<Vec<Coin>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tx = Tx::from_bytes(tx_bytes).map_err(|e| LedgerError::Decode(e.to_string()))?;
        let taxed: u128 = tx
            .body
            .messages
            .iter()
            .filter_map(|any| MsgExecuteContract::from_any(any).ok())
            .flat_map(|msg| msg.funds)
            .filter(|coin| coin.denom.to_string() == "uusd")
            .map(|coin| coin.amount)
            .sum();
        if taxed == 0 {
            return Ok(vec![]);
        }
        Ok(vec![Coin {
            denom: "uusd".parse().unwrap(),
            amount: taxed * TAX_PER_MILLE / 1000,
        }])
    }

    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxResponse, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tx = Tx::from_bytes(&tx_bytes).map_err(|e| LedgerError::Decode(e.to_string()))?;
        let mut broadcasts = self.broadcasts.lock().unwrap();
        broadcasts.push(Broadcast {
            memo: tx.body.memo.clone(),
            messages: tx.body.messages.clone(),
            sequence: tx.auth_info.signer_infos[0].sequence,
            gas_limit: tx.auth_info.fee.gas_limit,
            fee: tx.auth_info.fee.amount.first().map(|c| c.amount).unwrap_or_default(),
            fee_coins: tx.auth_info.fee.amount.clone(),
        });
        let txhash = format!("TX{}", broadcasts.len());

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Included(vec![]));
        let pending = TxResponse {
            txhash: txhash.clone(),
            ..Default::default()
        };
        match outcome {
            Outcome::RejectAtCheck(code) => Ok(TxResponse {
                code,
                codespace: "sdk".into(),
                raw_log: "account sequence mismatch".into(),
                ..pending
            }),
            Outcome::RejectInBlock(code) => {
                *self.sequence.lock().unwrap() += 1;
                let failed = TxResponse {
                    code,
                    codespace: "wasm".into(),
                    raw_log: "execute wasm contract failed".into(),
                    ..pending.clone()
                };
                self.included.lock().unwrap().insert(txhash, failed);
                Ok(pending)
            }
            Outcome::Included(events) => {
                *self.sequence.lock().unwrap() += 1;
                let included = TxResponse {
                    height: "100".into(),
                    events,
                    ..pending.clone()
                };
                self.included.lock().unwrap().insert(txhash, included);
                Ok(pending)
            }
            Outcome::NeverIncluded => Ok(pending),
        }
    }

    async fn tx(&self, hash: &str) -> Result<Option<TxResponse>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.included.lock().unwrap().get(hash).cloned())
    }
}

pub fn event(kind: &str, attributes: &[(&str, &str)]) -> Event {
    Event {
        kind: kind.to_string(),
        attributes: attributes
            .iter()
            .map(|(key, value)| Attribute {
                key: key.to_string(),
                value: Some(value.to_string()),
            })
            .collect(),
    }
}

pub fn settings() -> TxSettings {
    TxSettings {
        chain_id: "bombay-12".into(),
        gas_price: 0.15,
        fee_denom: "uusd".into(),
        gas_adjustment: 1.5,
        confirm_interval: Duration::from_secs(1),
        confirm_attempts: 3,
    }
}

pub fn account(seed: u8) -> AccountId {
    AccountId::new("terra", &[seed; 32]).unwrap()
}

/// JSON payload of a `MsgExecuteContract` carried in a broadcast.
pub fn execute_payload(any: &Any) -> (AccountId, serde_json::Value) {
    let msg = MsgExecuteContract::from_any(any).unwrap();
    (msg.contract, serde_json::from_slice(&msg.msg).unwrap())
}
