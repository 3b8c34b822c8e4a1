// src/manifest.rs
//! Deployment manifests handed from one pipeline stage to the next.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use cosmrs::AccountId;
use tracing::info;

pub const CODE_IDS_FILE: &str = "code_ids.json";
pub const CONTRACT_ADDRESSES_FILE: &str = "contract_addresses.json";

/// Uploaded wasm blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Token,
    Staking,
    Airdrop,
    Vesting,
}

impl Code {
    pub const ALL: [Code; 4] = [Code::Token, Code::Staking, Code::Airdrop, Code::Vesting];

    pub fn key(&self) -> &'static str {
        match self {
            Code::Token => "token_code_id",
            Code::Staking => "staking_code_id",
            Code::Airdrop => "airdrop_code_id",
            Code::Vesting => "vesting_code_id",
        }
    }

    pub fn artifact(&self) -> &'static str {
        match self {
            Code::Token => "tland_token.wasm",
            Code::Staking => "staking.wasm",
            Code::Airdrop => "airdrop.wasm",
            Code::Vesting => "vesting.wasm",
        }
    }
}

/// Deployed contract instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contract {
    Token,
    DevFund,
    Advisors,
    PrivSale,
    PubSale,
    Team,
    LpStaking,
    Airdrop,
    TerraswapPair,
}

impl Contract {
    pub fn key(&self) -> &'static str {
        match self {
            Contract::Token => "token_address",
            Contract::DevFund => "devfund_address",
            Contract::Advisors => "advisors_address",
            Contract::PrivSale => "privsale_address",
            Contract::PubSale => "pubsale_address",
            Contract::Team => "team_address",
            Contract::LpStaking => "lp_staking_address",
            Contract::Airdrop => "airdrop_address",
            Contract::TerraswapPair => "terraswap_pair_address",
        }
    }
}

/// Flat JSON object of strings. Saving re-reads the file and keeps every key
/// on disk that was not overwritten in memory.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading manifest {} (has the previous stage run?)", path.display()))?;
        let entries = serde_json::from_str(&content).with_context(|| format!("parsing manifest {}", path.display()))?;
        Ok(Self { path, entries })
    }

    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                path,
                entries: BTreeMap::new(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow!("`{key}` missing from {}", self.path.display()))
    }

    pub fn code_id(&self, code: Code) -> Result<u64> {
        let raw = self.require(code.key())?;
        raw.parse()
            .with_context(|| format!("`{}` in {} is not a code id: {raw}", code.key(), self.path.display()))
    }

    pub fn address(&self, contract: Contract) -> Result<AccountId> {
        let raw = self.require(contract.key())?;
        raw.parse::<AccountId>()
            .map_err(|e| anyhow!("`{}` in {} is not an address: {e}", contract.key(), self.path.display()))
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.to_string(), value.into())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let mut merged = if self.path.exists() {
            Self::load(&self.path)?.entries
        } else {
            BTreeMap::new()
        };
        merged.extend(self.entries.clone());
        let json = serde_json::to_string_pretty(&merged)?;
        std::fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        info!(path = %self.path.display(), keys = merged.len(), "manifest saved");
        Ok(())
    }
}
