// src/plan.rs
//! TLAND tokenomics: allocations, vesting terms and staking emissions.
use crate::config::Role;
use crate::manifest::Contract;
use crate::msg::{Cw20Coin, DistributionPeriod, FeeConfig, VestingSchedule};

pub const MONTH: u64 = 30 * 24 * 3600;
pub const WEEK: u64 = 7 * 24 * 3600;

pub const TOKEN_NAME: &str = "TerraLand token";
pub const TOKEN_SYMBOL: &str = "TLAND";
pub const TOKEN_DECIMALS: u8 = 6;

pub const FEE_DENOM: &str = "uusd";
/// 1 UST
pub const OPERATION_FEE: &str = "1000000";

/// TLAND side of the Terraswap pool, 1 750 000 TLAND.
pub const LIQUIDITY_TOKEN_AMOUNT: &str = "1750000000000";

/// (recipient, amount, purpose)
pub const INITIAL_BALANCES: [(&str, &str, &str); 11] = [
    ("terra1ly5glvd0xv5x5s4vd5x6a8p8n4pcmwn839pcep", "25000000000000", "treasury"),
    ("terra1hek3fzkmke5pe6lvcv48frwvchc04fz6y22fyj", "17000000000000", "team"),
    ("terra1yjwlg6dy3dkq3qlhv0feyqe7wrt3q0h0ghlwcy", "13000000000000", "community incentives, staking"),
    ("terra1ksawlatvhqmm3lg9uc7w6z20zvvuegmwxgjtpm", "20000000000000", "private sale & marketing partnerships"),
    ("terra1wcuvasqx8zf69e9jhnnxgk4em7dnemqappugwj", "1111555000000", "public sale Subme"),
    ("terra1ylng8sxnkghx4grp3auvln6g5ugql7kw29d4h2", "8888445000000", "public sale Starterra"),
    ("terra1z43ptner54dvkpz2cuyu67wjkzmqzs2kq8wsu5", "5000000000000", "development fund"),
    ("terra1u4cukjhadget74ugc4antvca0v0jzlxxmjp5t7", "4000000000000", "advisors fund"),
    ("terra1w6402sdfcu4smfhunqvwyv6kwq87f2kvnc4z0m", "1750000000000", "liquidity for smart contract"),
    ("terra1xr50nhz5ecqswaehnxf7f7nvfeu0zh7424vzwe", "3250000000000", "liquidity rest"),
    ("terra1amskskeaput62xdahpp59yrw4fm7g7ndgsc20u", "1000000000000", "airdrop"),
];

pub fn initial_balances() -> Vec<Cw20Coin> {
    INITIAL_BALANCES
        .iter()
        .map(|(address, amount, _)| Cw20Coin {
            address: address.to_string(),
            amount: amount.to_string(),
        })
        .collect()
}

pub fn fee_config(operations: &[&str]) -> Vec<FeeConfig> {
    operations
        .iter()
        .map(|operation| FeeConfig {
            fee: OPERATION_FEE.to_string(),
            operation: operation.to_string(),
            denom: FEE_DENOM.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct VestingPlan {
    pub role: Role,
    pub contract: Contract,
    pub name: &'static str,
    pub memo: &'static str,
    pub duration_months: u64,
    pub cliff_months: u64,
    pub initial_percentage: u64,
}

impl VestingPlan {
    pub fn schedule(&self, tge: u64) -> VestingSchedule {
        VestingSchedule {
            start_time: tge,
            end_time: tge + self.duration_months * MONTH,
            initial_percentage: self.initial_percentage,
            cliff_end_time: tge + self.cliff_months * MONTH,
        }
    }
}

pub const VESTING_PLANS: [VestingPlan; 5] = [
    VestingPlan {
        role: Role::DevFund,
        contract: Contract::DevFund,
        name: "TERRALAND_DEVELOPMENT_FUND_VESTING",
        memo: "INSTANTIATE TERRALAND DEVELOPMENT FUND VESTING",
        duration_months: 39,
        cliff_months: 3,
        initial_percentage: 0,
    },
    VestingPlan {
        role: Role::Advisors,
        contract: Contract::Advisors,
        name: "TERRALAND_ADVISORS_VESTING",
        memo: "INSTANTIATE TERRALAND ADVISORS VESTING",
        duration_months: 13,
        cliff_months: 1,
        initial_percentage: 0,
    },
    VestingPlan {
        role: Role::PrivSale,
        contract: Contract::PrivSale,
        name: "TERRALAND_PRIVATE_SALE_VESTING",
        memo: "INSTANTIATE TERRALAND PRIVATE SALE VESTING",
        duration_months: 10,
        cliff_months: 1,
        initial_percentage: 10,
    },
    VestingPlan {
        role: Role::PubSale,
        contract: Contract::PubSale,
        name: "TERRALAND_PUBLIC_SALE_VESTING",
        memo: "INSTANTIATE TERRALAND PUBLIC SALE VESTING",
        duration_months: 6,
        cliff_months: 0,
        initial_percentage: 20,
    },
    VestingPlan {
        role: Role::Team,
        contract: Contract::Team,
        name: "TERRALAND_TEAM_VESTING",
        memo: "INSTANTIATE TERRALAND TEAM VESTING",
        duration_months: 24,
        cliff_months: 6,
        initial_percentage: 0,
    },
];

/// 5 days
pub const UNBONDING_PERIOD: u64 = 432_000;
pub const BURN_ADDRESS: &str = "terra17hk7d34mg77w6ujcr6n58p8hjl9ez8w9gj6auk";
pub const INSTANT_CLAIM_PERCENTAGE_LOSS: u64 = 5;
pub const STAKING_FEE_OPERATIONS: [&str; 4] = ["claim", "unbond", "instant_claim", "withdraw"];

/// LP staking emissions as (amount, start week, end week) after TGE.
pub const STAKING_EMISSIONS: [(&str, u64, u64); 13] = [
    ("600000000000", 0, 4),
    ("202000000000", 4, 6),
    ("205500000000", 6, 8),
    ("210000000000", 8, 10),
    ("430000000000", 10, 14),
    ("440000000000", 14, 18),
    ("900000000000", 18, 26),
    ("920000000000", 26, 34),
    ("1527500000000", 34, 47),
    ("980000000000", 47, 55),
    ("1560000000000", 55, 68),
    ("1495000000000", 68, 81),
    ("2530000000000", 81, 104),
];

pub fn distribution_schedule(tge: u64) -> Vec<DistributionPeriod> {
    STAKING_EMISSIONS
        .iter()
        .map(|(amount, start, end)| DistributionPeriod {
            amount: amount.to_string(),
            start_time: tge + start * WEEK,
            end_time: tge + end * WEEK,
        })
        .collect()
}

/// Beneficiary files registered on each contract, in submission order.
pub struct Registration {
    pub role: Role,
    pub contract: Contract,
    pub file: &'static str,
    pub memo: &'static str,
}

pub const REGISTRATIONS: [Registration; 6] = [
    Registration {
        role: Role::DevFund,
        contract: Contract::DevFund,
        file: "devfund_members.json",
        memo: "REGISTER DEVELOPMENT FUND ADDRESSES",
    },
    Registration {
        role: Role::Team,
        contract: Contract::Team,
        file: "team_members.json",
        memo: "REGISTER TEAM ADDRESSES",
    },
    Registration {
        role: Role::Advisors,
        contract: Contract::Advisors,
        file: "advisors_members.json",
        memo: "REGISTER ADVISORS ADDRESSES",
    },
    Registration {
        role: Role::PrivSale,
        contract: Contract::PrivSale,
        file: "privsale_members.json",
        memo: "REGISTER PRIVATE SALE ADDRESSES",
    },
    Registration {
        role: Role::PubSale,
        contract: Contract::PubSale,
        file: "pubsale_members.json",
        memo: "REGISTER PUBLIC SALE ADDRESSES",
    },
    Registration {
        role: Role::Airdrop,
        contract: Contract::Airdrop,
        file: "stt_and_lp_stakers.json",
        memo: "REGISTER AIRDROP ADDRESSES",
    },
];

/// Tokens each owner moves into its contract once everything is deployed.
pub const TRANSFERS: [(Role, Contract, &str); 7] = [
    (Role::Team, Contract::Team, "17000000000000"),
    (Role::Staking, Contract::LpStaking, "12000000000000"),
    (Role::PrivSale, Contract::PrivSale, "20000000000000"),
    (Role::PubSale, Contract::PubSale, "1111111120000"),
    (Role::DevFund, Contract::DevFund, "5000000000000"),
    (Role::Advisors, Contract::Advisors, "4000000000000"),
    (Role::Airdrop, Contract::Airdrop, "1000000000000"),
];
