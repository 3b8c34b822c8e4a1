// src/wallet.rs
use std::time::Duration;

use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::tendermint::chain;
use cosmrs::tx::{Body, Fee, SignDoc, SignerInfo};
use cosmrs::{AccountId, Any, Coin};
use ethers::signers::MnemonicBuilder;
use ethers::signers::coins_bip39::English;
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::ledger::{AccountInfo, Ledger, TxResponse};

pub const ACCOUNT_PREFIX: &str = "terra";
pub const DERIVATION_PATH: &str = "m/44'/330'/0'/0/0";

/// Fee and confirmation parameters shared by every wallet of a run.
#[derive(Debug, Clone)]
pub struct TxSettings {
    pub chain_id: String,
    pub gas_price: f64,
    pub fee_denom: String,
    pub gas_adjustment: f64,
    pub confirm_interval: Duration,
    pub confirm_attempts: u32,
}

/// A mnemonic-derived signer bound to a ledger client.
pub struct Wallet<'a, L: ?Sized> {
    key: SigningKey,
    address: AccountId,
    ledger: &'a L,
    settings: TxSettings,
}

impl<'a, L: Ledger + ?Sized> Wallet<'a, L> {
    pub fn from_mnemonic(phrase: &str, ledger: &'a L, settings: TxSettings) -> Result<Self, LedgerError> {
        let derived = MnemonicBuilder::<English>::default()
            .phrase(phrase.trim())
            .derivation_path(DERIVATION_PATH)
            .map_err(|e| LedgerError::Key(e.to_string()))?
            .build()
            .map_err(|e| LedgerError::Key(e.to_string()))?;
        let secret = derived.signer().to_bytes();
        let key = SigningKey::from_slice(secret.as_slice()).map_err(LedgerError::sdk)?;
        let address = key.public_key().account_id(ACCOUNT_PREFIX).map_err(LedgerError::sdk)?;
        Ok(Self {
            key,
            address,
            ledger,
            settings,
        })
    }

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    /// Gas fee plus any stability tax, with amounts of the same denom merged.
    fn fee(&self, gas_limit: u64, tax: &[Coin]) -> Result<Fee, LedgerError> {
        let mut amount = vec![Coin {
            denom: self.settings.fee_denom.parse().map_err(LedgerError::sdk)?,
            amount: (gas_limit as f64 * self.settings.gas_price).ceil() as u128,
        }];
        for owed in tax {
            match amount.iter_mut().find(|coin| coin.denom == owed.denom) {
                Some(coin) => coin.amount += owed.amount,
                None => amount.push(owed.clone()),
            }
        }
        Ok(Fee {
            amount,
            gas_limit,
            payer: None,
            granter: None,
        })
    }

    fn sign(&self, body: &Body, account: AccountInfo, fee: Fee) -> Result<Vec<u8>, LedgerError> {
        let auth_info = SignerInfo::single_direct(Some(self.key.public_key()), account.sequence).auth_info(fee);
        let chain_id: chain::Id = self.settings.chain_id.parse().map_err(LedgerError::sdk)?;
        let doc = SignDoc::new(body, &auth_info, &chain_id, account.account_number).map_err(LedgerError::sdk)?;
        doc.sign(&self.key)
            .and_then(|raw| raw.to_bytes())
            .map_err(LedgerError::sdk)
    }

    /// Sign, broadcast and wait for inclusion of one transaction.
    ///
    /// The account sequence is read fresh for every call, so callers must not
    /// submit concurrently from the same wallet.
    pub async fn submit(&self, msgs: Vec<Any>, memo: &str) -> Result<TxResponse, LedgerError> {
        let account = self.ledger.account(&self.address).await?;
        let body = Body::new(msgs, memo, 0u32);

        // simulation skips the tax check, so the tax is queried separately
        let probe = self.sign(&body, account, self.fee(0, &[])?)?;
        let gas_used = self.ledger.simulate(&probe).await?;
        let tax = self.ledger.compute_tax(&probe).await?;
        let gas_limit = (gas_used as f64 * self.settings.gas_adjustment).ceil() as u64;
        debug!(sender = %self.address, gas_used, gas_limit, ?tax, "simulated");

        let tx_bytes = self.sign(&body, account, self.fee(gas_limit, &tax)?)?;
        let pending = self.ledger.broadcast(tx_bytes).await?.into_result()?;
        info!(sender = %self.address, txhash = %pending.txhash, memo, "broadcast");

        self.confirm(&pending.txhash).await?.into_result()
    }

    async fn confirm(&self, txhash: &str) -> Result<TxResponse, LedgerError> {
        for attempt in 1..=self.settings.confirm_attempts {
            if let Some(included) = self.ledger.tx(txhash).await? {
                return Ok(included);
            }
            if attempt < self.settings.confirm_attempts {
                tokio::time::sleep(self.settings.confirm_interval).await;
            }
        }
        Err(LedgerError::Unconfirmed {
            txhash: txhash.to_string(),
            attempts: self.settings.confirm_attempts,
        })
    }
}
