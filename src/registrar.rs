// src/registrar.rs
//! Batched `register_members` submission.
//!
//! Beneficiaries are packed `group_size` to a contract call and calls are
//! packed `batch_size` to a transaction, keeping each transaction under the
//! chain's size limit. Transactions go out one at a time from a single
//! signer with a pause in between.
use std::num::NonZeroUsize;
use std::time::Duration;

use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tx::Msg;
use cosmrs::{AccountId, Any};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::msg::{ExecuteMsg, Member, execute_contract};
use crate::wallet::Wallet;

pub const GROUP_SIZE: usize = 40;
pub const BATCH_SIZE: usize = 25;
pub const INTER_BATCH_DELAY: Duration = Duration::from_secs(10);

/// Input record of a beneficiary list file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub group_size: NonZeroUsize,
    pub batch_size: NonZeroUsize,
    pub delay: Duration,
}

impl Default for BatchPlan {
    fn default() -> Self {
        Self {
            group_size: NonZeroUsize::new(GROUP_SIZE).unwrap_or(NonZeroUsize::MIN),
            batch_size: NonZeroUsize::new(BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            delay: INTER_BATCH_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    pub index: usize,
    pub memo: String,
    pub tx_hash: String,
    pub messages: usize,
}

#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("failed to build register_members message: {0}")]
    Build(#[source] LedgerError),

    #[error("batch #{batch} aborted after {} confirmed batches: {source}", .completed.len())]
    Aborted {
        batch: usize,
        completed: Vec<BatchReceipt>,
        #[source]
        source: LedgerError,
    },
}

pub fn chunk_into_groups<T: Clone>(records: &[T], group_size: NonZeroUsize) -> Vec<Vec<T>> {
    records.chunks(group_size.get()).map(<[T]>::to_vec).collect()
}

/// Wrap one group into a `register_members` call; progress is always reset to zero.
pub fn build_call_message(
    group: &[Beneficiary],
    sender: &AccountId,
    contract: &AccountId,
) -> Result<MsgExecuteContract, LedgerError> {
    let members = group
        .iter()
        .map(|b| Member {
            address: b.address.clone(),
            amount: b.amount.clone(),
            claimed: "0".to_string(),
        })
        .collect();
    execute_contract(sender, contract, &ExecuteMsg::RegisterMembers(members), vec![])
}

pub async fn submit_batches<L: Ledger + ?Sized>(
    wallet: &Wallet<'_, L>,
    messages: Vec<Any>,
    batch_size: NonZeroUsize,
    delay: Duration,
    memo_prefix: &str,
) -> Result<Vec<BatchReceipt>, RegistrarError> {
    let batches = chunk_into_groups(&messages, batch_size);
    let total = batches.len();
    let mut receipts = Vec::with_capacity(total);

    for (i, batch) in batches.into_iter().enumerate() {
        let index = i + 1;
        if i > 0 {
            tokio::time::sleep(delay).await;
        }

        let memo = format!("{memo_prefix} #{index}");
        let count = batch.len();
        match wallet.submit(batch, &memo).await {
            Ok(resp) => {
                info!(%memo, txhash = %resp.txhash, messages = count, "batch {index}/{total} confirmed");
                receipts.push(BatchReceipt {
                    index,
                    memo,
                    tx_hash: resp.txhash,
                    messages: count,
                });
            }
            Err(source) => {
                warn!(%memo, error = %source, "batch {index}/{total} failed, aborting");
                return Err(RegistrarError::Aborted {
                    batch: index,
                    completed: receipts,
                    source,
                });
            }
        }
    }

    Ok(receipts)
}

pub async fn register_members<L: Ledger + ?Sized>(
    wallet: &Wallet<'_, L>,
    contract: &AccountId,
    beneficiaries: &[Beneficiary],
    plan: &BatchPlan,
    memo_prefix: &str,
) -> Result<Vec<BatchReceipt>, RegistrarError> {
    let messages = chunk_into_groups(beneficiaries, plan.group_size)
        .iter()
        .map(|group| {
            build_call_message(group, wallet.address(), contract)?
                .to_any()
                .map_err(LedgerError::sdk)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(RegistrarError::Build)?;

    info!(
        %contract,
        beneficiaries = beneficiaries.len(),
        messages = messages.len(),
        "registering members"
    );
    submit_batches(wallet, messages, plan.batch_size, plan.delay, memo_prefix).await
}
