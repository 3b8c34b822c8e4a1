// src/stages.rs
//! The listing pipeline. Each stage reads the manifests written by the
//! stages before it and adds its own results.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use cosmrs::cosmwasm::{MsgInstantiateContract, MsgStoreCode};
use cosmrs::tx::Msg;
use cosmrs::{AccountId, Any, Coin};
use serde::Serialize;
use tracing::info;

use crate::config::{DeployConfig, Keyring, Role, read_beneficiaries};
use crate::error::LedgerError;
use crate::ledger::{Ledger, TxResponse};
use crate::manifest::{CODE_IDS_FILE, CONTRACT_ADDRESSES_FILE, Code, Contract, Manifest};
use crate::msg::{
    AirdropInstantiateMsg, Asset, AssetInfo, ExecuteMsg, MarketingInfo, MissionContracts, StakingInstantiateMsg,
    TokenInstantiateMsg, VestingInstantiateMsg, execute_contract,
};
use crate::plan;
use crate::registrar::{self, BatchReceipt};
use crate::wallet::Wallet;

/// Everything a stage needs, built once by the caller.
#[derive(Debug)]
pub struct DeployContext<L> {
    pub config: DeployConfig,
    pub keyring: Keyring,
    pub ledger: L,
    pub files_dir: PathBuf,
}

impl<L: Ledger> DeployContext<L> {
    pub fn new(config: DeployConfig, keyring: Keyring, ledger: L, files_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            keyring,
            ledger,
            files_dir: files_dir.into(),
        }
    }

    pub fn wallet(&self, role: Role) -> Result<Wallet<'_, L>> {
        let mnemonic = self.keyring.mnemonic(role)?;
        Wallet::from_mnemonic(mnemonic, &self.ledger, self.config.tx_settings())
            .with_context(|| format!("deriving key for {role}"))
    }

    pub fn code_ids(&self) -> Result<Manifest> {
        Manifest::load_or_default(self.files_dir.join(CODE_IDS_FILE))
    }

    pub fn contract_addresses(&self) -> Result<Manifest> {
        Manifest::load_or_default(self.files_dir.join(CONTRACT_ADDRESSES_FILE))
    }

    async fn pause(&self) {
        tokio::time::sleep(self.config.delay()).await;
    }
}

fn to_any(msg: &impl Msg) -> Result<Any> {
    msg.to_any().map_err(|e| anyhow!(LedgerError::sdk(e)))
}

fn required_attribute<'r>(resp: &'r TxResponse, candidates: &[(&str, &str)]) -> Result<&'r str> {
    candidates
        .iter()
        .find_map(|(event, key)| resp.attribute(event, key))
        .ok_or_else(|| anyhow!("tx {} emitted none of {candidates:?}", resp.txhash))
}

async fn store_code<L: Ledger>(wallet: &Wallet<'_, L>, wasm: Vec<u8>) -> Result<String> {
    let msg = MsgStoreCode {
        sender: wallet.address().clone(),
        wasm_byte_code: wasm,
        instantiate_permission: None,
    };
    let resp = wallet.submit(vec![to_any(&msg)?], "").await?;
    let code_id = required_attribute(&resp, &[("store_code", "code_id")])?;
    Ok(code_id.to_string())
}

pub async fn store_codes<L: Ledger>(ctx: &DeployContext<L>, artifacts_dir: &Path) -> Result<Manifest> {
    let wallet = ctx.wallet(Role::Token)?;
    let mut manifest = ctx.code_ids()?;

    for (i, code) in Code::ALL.into_iter().enumerate() {
        if i > 0 {
            ctx.pause().await;
        }
        let path = artifacts_dir.join(code.artifact());
        let wasm = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let code_id = store_code(&wallet, wasm).await.with_context(|| format!("storing {}", code.artifact()))?;
        info!(artifact = code.artifact(), code_id = %code_id, "stored");
        manifest.insert(code.key(), code_id);
    }

    manifest.save()?;
    Ok(manifest)
}

async fn instantiate<L: Ledger>(
    wallet: &Wallet<'_, L>,
    code_id: u64,
    memo: &str,
    msg: &impl Serialize,
) -> Result<String> {
    let instantiate = MsgInstantiateContract {
        sender: wallet.address().clone(),
        admin: Some(wallet.address().clone()),
        code_id,
        label: Some(memo.to_string()),
        msg: serde_json::to_vec(msg)?,
        funds: vec![],
    };
    let resp = wallet
        .submit(vec![to_any(&instantiate)?], memo)
        .await
        .with_context(|| format!("instantiate failed ({memo})"))?;
    let address = required_attribute(
        &resp,
        &[("instantiate_contract", "contract_address"), ("instantiate", "_contract_address")],
    )?;
    info!(memo, contract_address = address, "instantiated");
    Ok(address.to_string())
}

pub async fn deploy_contracts<L: Ledger>(ctx: &DeployContext<L>) -> Result<Manifest> {
    let codes = Manifest::load(ctx.files_dir.join(CODE_IDS_FILE))?;
    let mut addresses = ctx.contract_addresses()?;
    let tge = ctx.config.tge;

    let owner = ctx.wallet(Role::Token)?;
    let token = instantiate(
        &owner,
        codes.code_id(Code::Token)?,
        "INSTANTIATE TERRALAND TLAND TOKEN",
        &TokenInstantiateMsg {
            owner: owner.address().to_string(),
            decimals: plan::TOKEN_DECIMALS,
            name: plan::TOKEN_NAME.to_string(),
            symbol: plan::TOKEN_SYMBOL.to_string(),
            marketing: MarketingInfo {
                marketing: owner.address().to_string(),
            },
            initial_balances: plan::initial_balances(),
        },
    )
    .await?;
    addresses.insert(Contract::Token.key(), token.clone());

    for vesting in plan::VESTING_PLANS {
        ctx.pause().await;
        let owner = ctx.wallet(vesting.role)?;
        let address = instantiate(
            &owner,
            codes.code_id(Code::Vesting)?,
            vesting.memo,
            &VestingInstantiateMsg {
                owner: owner.address().to_string(),
                terraland_token: token.clone(),
                name: vesting.name.to_string(),
                fee_config: plan::fee_config(&["claim"]),
                vesting: vesting.schedule(tge),
            },
        )
        .await?;
        addresses.insert(vesting.contract.key(), address);
    }

    ctx.pause().await;
    let owner = ctx.wallet(Role::Staking)?;
    let lp_staking = instantiate(
        &owner,
        codes.code_id(Code::Staking)?,
        "INSTANTIATE TERRALAND LP STAKING",
        &StakingInstantiateMsg {
            owner: owner.address().to_string(),
            // replaced by the pair's LP token once the pool exists
            staking_token: owner.address().to_string(),
            terraland_token: token.clone(),
            unbonding_period: plan::UNBONDING_PERIOD,
            burn_address: plan::BURN_ADDRESS.to_string(),
            instant_claim_percentage_loss: plan::INSTANT_CLAIM_PERCENTAGE_LOSS,
            fee_config: plan::fee_config(&plan::STAKING_FEE_OPERATIONS),
            distribution_schedule: plan::distribution_schedule(tge),
        },
    )
    .await?;
    addresses.insert(Contract::LpStaking.key(), lp_staking.clone());

    ctx.pause().await;
    let owner = ctx.wallet(Role::Airdrop)?;
    let airdrop = instantiate(
        &owner,
        codes.code_id(Code::Airdrop)?,
        "INSTANTIATE TERRALAND AIRDROP",
        &AirdropInstantiateMsg {
            owner: owner.address().to_string(),
            terraland_token: token,
            fee_config: plan::fee_config(&["claim"]),
            mission_smart_contracts: MissionContracts { lp_staking },
        },
    )
    .await?;
    addresses.insert(Contract::Airdrop.key(), airdrop);

    addresses.save()?;
    Ok(addresses)
}

pub async fn register_all_members<L: Ledger>(ctx: &DeployContext<L>) -> Result<Vec<BatchReceipt>> {
    let addresses = Manifest::load(ctx.files_dir.join(CONTRACT_ADDRESSES_FILE))?;
    let batch_plan = ctx.config.batch_plan();

    // every list, contract and key is checked before the first broadcast
    let prepared = plan::REGISTRATIONS
        .iter()
        .map(|registration| -> Result<_> {
            let members = read_beneficiaries(&ctx.files_dir.join(registration.file))?;
            let contract = addresses.address(registration.contract)?;
            let wallet = ctx.wallet(registration.role)?;
            Ok((registration, members, contract, wallet))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut receipts = Vec::new();
    for (i, (registration, members, contract, wallet)) in prepared.into_iter().enumerate() {
        if i > 0 {
            ctx.pause().await;
        }
        let done = registrar::register_members(&wallet, &contract, &members, &batch_plan, registration.memo)
            .await
            .with_context(|| format!("registering {}", registration.file))?;
        receipts.extend(done);
    }

    Ok(receipts)
}

fn tland_uusd(token: &AccountId) -> [AssetInfo; 2] {
    [
        AssetInfo::Token {
            contract_addr: token.to_string(),
        },
        AssetInfo::NativeToken {
            denom: plan::FEE_DENOM.to_string(),
        },
    ]
}

pub async fn create_pair<L: Ledger>(ctx: &DeployContext<L>) -> Result<String> {
    let mut addresses = Manifest::load(ctx.files_dir.join(CONTRACT_ADDRESSES_FILE))?;
    let token = addresses.address(Contract::Token)?;
    let factory: AccountId = ctx
        .config
        .terraswap_factory_address
        .parse()
        .map_err(|e| anyhow!("invalid terraswap_factory_address: {e}"))?;

    let wallet = ctx.wallet(Role::Lp)?;
    let msg = execute_contract(
        wallet.address(),
        &factory,
        &ExecuteMsg::CreatePair {
            asset_infos: tland_uusd(&token),
        },
        vec![],
    )?;
    let resp = wallet.submit(vec![to_any(&msg)?], "").await.context("create_pair failed")?;
    let pair = required_attribute(&resp, &[("wasm", "pair_contract_addr")])?.to_string();
    info!(pair_contract_address = %pair, "pair created");

    addresses.insert(Contract::TerraswapPair.key(), pair.clone());
    addresses.save()?;
    Ok(pair)
}

pub async fn provide_liquidity<L: Ledger>(ctx: &DeployContext<L>) -> Result<TxResponse> {
    let addresses = Manifest::load(ctx.files_dir.join(CONTRACT_ADDRESSES_FILE))?;
    let token = addresses.address(Contract::Token)?;
    let pair = addresses.address(Contract::TerraswapPair)?;
    let ust = ctx.config.ust_liquidity_amount.clone();

    let wallet = ctx.wallet(Role::Lp)?;
    let allowance = execute_contract(
        wallet.address(),
        &token,
        &ExecuteMsg::IncreaseAllowance {
            amount: plan::LIQUIDITY_TOKEN_AMOUNT.to_string(),
            spender: pair.to_string(),
        },
        vec![],
    )?;

    let [token_info, ust_info] = tland_uusd(&token);
    let funds = Coin {
        denom: plan::FEE_DENOM.parse().map_err(|e| anyhow!("{e}"))?,
        amount: ust.parse().context("ust_liquidity_amount")?,
    };
    let provide = execute_contract(
        wallet.address(),
        &pair,
        &ExecuteMsg::ProvideLiquidity {
            assets: [
                Asset {
                    info: token_info,
                    amount: plan::LIQUIDITY_TOKEN_AMOUNT.to_string(),
                },
                Asset {
                    info: ust_info,
                    amount: ust,
                },
            ],
        },
        vec![funds],
    )?;

    let resp = wallet
        .submit(vec![to_any(&allowance)?, to_any(&provide)?], "")
        .await
        .context("provide_liquidity failed")?;
    info!(txhash = %resp.txhash, "liquidity provided");
    Ok(resp)
}

pub async fn send_tokens<L: Ledger>(ctx: &DeployContext<L>) -> Result<Vec<String>> {
    let addresses = Manifest::load(ctx.files_dir.join(CONTRACT_ADDRESSES_FILE))?;
    let token = addresses.address(Contract::Token)?;
    let mut hashes = Vec::new();

    for (i, (role, contract, amount)) in plan::TRANSFERS.into_iter().enumerate() {
        if i > 0 {
            ctx.pause().await;
        }
        let recipient = addresses.address(contract)?;
        let wallet = ctx.wallet(role)?;
        let transfer = execute_contract(
            wallet.address(),
            &token,
            &ExecuteMsg::Transfer {
                amount: amount.to_string(),
                recipient: recipient.to_string(),
            },
            vec![],
        )?;
        let resp = wallet
            .submit(vec![to_any(&transfer)?], "")
            .await
            .with_context(|| format!("transfer to {} failed", contract.key()))?;
        info!(recipient = %recipient, amount, txhash = %resp.txhash, "tokens sent");
        hashes.push(resp.txhash);
    }

    Ok(hashes)
}
