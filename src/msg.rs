// src/msg.rs
//! JSON payloads understood by the TerraLand, cw20 and Terraswap contracts.
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::{AccountId, Coin};
use serde::Serialize;

use crate::error::LedgerError;

/// One beneficiary as stored by the vesting and airdrop contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub address: String,
    pub amount: String,
    pub claimed: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cw20Coin {
    pub address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketingInfo {
    pub marketing: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenInstantiateMsg {
    pub owner: String,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    pub marketing: MarketingInfo,
    pub initial_balances: Vec<Cw20Coin>,
}

/// Native-denom fee charged by a contract for `operation`.
#[derive(Debug, Clone, Serialize)]
pub struct FeeConfig {
    pub fee: String,
    pub operation: String,
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingSchedule {
    pub start_time: u64,
    pub end_time: u64,
    pub initial_percentage: u64,
    pub cliff_end_time: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VestingInstantiateMsg {
    pub owner: String,
    pub terraland_token: String,
    pub name: String,
    pub fee_config: Vec<FeeConfig>,
    pub vesting: VestingSchedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionPeriod {
    pub amount: String,
    pub start_time: u64,
    pub end_time: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StakingInstantiateMsg {
    pub owner: String,
    pub staking_token: String,
    pub terraland_token: String,
    pub unbonding_period: u64,
    pub burn_address: String,
    pub instant_claim_percentage_loss: u64,
    pub fee_config: Vec<FeeConfig>,
    pub distribution_schedule: Vec<DistributionPeriod>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionContracts {
    pub lp_staking: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AirdropInstantiateMsg {
    pub owner: String,
    pub terraland_token: String,
    pub fee_config: Vec<FeeConfig>,
    pub mission_smart_contracts: MissionContracts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    Token { contract_addr: String },
    NativeToken { denom: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    RegisterMembers(Vec<Member>),
    Transfer { amount: String, recipient: String },
    IncreaseAllowance { amount: String, spender: String },
    CreatePair { asset_infos: [AssetInfo; 2] },
    ProvideLiquidity { assets: [Asset; 2] },
}

pub fn execute_contract(
    sender: &AccountId,
    contract: &AccountId,
    msg: &ExecuteMsg,
    funds: Vec<Coin>,
) -> Result<MsgExecuteContract, LedgerError> {
    Ok(MsgExecuteContract {
        sender: sender.clone(),
        contract: contract.clone(),
        msg: serde_json::to_vec(msg)?,
        funds,
    })
}
