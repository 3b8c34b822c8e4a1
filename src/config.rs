// src/config.rs
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::ledger::lcd::lcd_base_url;
use crate::registrar::{BATCH_SIZE, BatchPlan, Beneficiary, GROUP_SIZE};
use crate::utils::{parse_amount, sum_amounts};
use crate::wallet::TxSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    pub url: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    /// Token generation event, unix seconds. Every vesting and staking schedule starts here.
    pub tge: u64,
    pub terraswap_factory_address: String,
    pub ust_liquidity_amount: String,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub batching: BatchingConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub price: f64,
    pub denom: String,
    pub adjustment: f64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            price: 0.15,
            denom: "uusd".to_string(),
            adjustment: 1.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    pub group_size: usize,
    pub batch_size: usize,
    pub delay_ms: u64,
    pub confirm_interval_ms: u64,
    pub confirm_attempts: u32,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            group_size: GROUP_SIZE,
            batch_size: BATCH_SIZE,
            delay_ms: 10_000,
            confirm_interval_ms: 2_000,
            confirm_attempts: 30,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: DeployConfig =
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        lcd_base_url(&self.url)?;
        if self.chain_id.is_empty() {
            bail!("chainID must not be empty");
        }
        if parse_amount(&self.ust_liquidity_amount).is_none() {
            bail!("invalid ust_liquidity_amount: {}", self.ust_liquidity_amount);
        }
        if self.batching.group_size == 0 || self.batching.batch_size == 0 {
            bail!("batching.group_size and batching.batch_size must be positive");
        }
        if self.batching.confirm_attempts == 0 {
            bail!("batching.confirm_attempts must be positive");
        }
        if !(self.gas.price >= 0.0 && self.gas.adjustment >= 1.0) {
            bail!("gas.price must be >= 0 and gas.adjustment >= 1");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.batching.delay_ms)
    }

    pub fn batch_plan(&self) -> BatchPlan {
        let defaults = BatchPlan::default();
        BatchPlan {
            group_size: NonZeroUsize::new(self.batching.group_size).unwrap_or(defaults.group_size),
            batch_size: NonZeroUsize::new(self.batching.batch_size).unwrap_or(defaults.batch_size),
            delay: self.delay(),
        }
    }

    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            chain_id: self.chain_id.clone(),
            gas_price: self.gas.price,
            fee_denom: self.gas.denom.clone(),
            gas_adjustment: self.gas.adjustment,
            confirm_interval: Duration::from_millis(self.batching.confirm_interval_ms),
            confirm_attempts: self.batching.confirm_attempts,
        }
    }
}

/// Owner of one signing key; each contract is administered by its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Token,
    DevFund,
    Advisors,
    PrivSale,
    PubSale,
    Team,
    Staking,
    Lp,
    Airdrop,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Token,
        Role::DevFund,
        Role::Advisors,
        Role::PrivSale,
        Role::PubSale,
        Role::Team,
        Role::Staking,
        Role::Lp,
        Role::Airdrop,
    ];

    pub fn env_var(&self) -> &'static str {
        match self {
            Role::Token => "TERRALAND_TOKEN",
            Role::DevFund => "TERRALAND_DEVFUND",
            Role::Advisors => "TERRALAND_ADVISORS",
            Role::PrivSale => "TERRALAND_PRIVSALE",
            Role::PubSale => "TERRALAND_PUBSALE",
            Role::Team => "TERRALAND_TEAM",
            Role::Staking => "TERRALAND_STAKING",
            Role::Lp => "TERRALAND_LP",
            Role::Airdrop => "TERRALAND_AIRDROP",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Mnemonics per role. Roles without a mnemonic only fail when used.
#[derive(Default)]
pub struct Keyring {
    mnemonics: HashMap<Role, String>,
}

impl Keyring {
    pub fn from_env() -> Self {
        let mnemonics = Role::ALL
            .into_iter()
            .filter_map(|role| std::env::var(role.env_var()).ok().map(|m| (role, m)))
            .collect();
        Self { mnemonics }
    }

    pub fn with(mut self, role: Role, mnemonic: impl Into<String>) -> Self {
        self.mnemonics.insert(role, mnemonic.into());
        self
    }

    pub fn mnemonic(&self, role: Role) -> Result<&str> {
        match self.mnemonics.get(&role) {
            Some(m) => Ok(m),
            None => bail!("environment variable {} is not set", role.env_var()),
        }
    }
}

impl fmt::Debug for Keyring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.mnemonics.keys()).finish()
    }
}

pub fn read_beneficiaries(path: &Path) -> Result<Vec<Beneficiary>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let entries: Vec<Beneficiary> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    for (i, entry) in entries.iter().enumerate() {
        if parse_amount(&entry.amount).is_none() {
            bail!("{}: entry {i} ({}) has invalid amount `{}`", path.display(), entry.address, entry.amount);
        }
    }
    Ok(entries)
}

/// Summary of a beneficiary list. Duplicates are reported, never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberListReport {
    pub records: usize,
    pub duplicates: Vec<String>,
    pub total: U256,
}

pub fn validate_member_list(entries: &[Beneficiary]) -> Result<MemberListReport> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        if !seen.insert(entry.address.as_str()) {
            duplicates.push(entry.address.clone());
        }
    }

    let total = match sum_amounts(entries.iter().map(|e| e.amount.as_str())) {
        Some(total) => total,
        None => bail!("beneficiary amounts are invalid or overflow"),
    };

    Ok(MemberListReport {
        records: entries.len(),
        duplicates,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "url": "https://bombay-lcd.terra.dev",
        "chainID": "bombay-12",
        "tge": 1640995200,
        "terraswap_factory_address": "terra18qpjm4zkvqnpjpw0zn0tdr8gdzvt8au35v45xf",
        "ust_liquidity_amount": "175000000000"
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_applies_defaults() {
        let file = write_temp(MINIMAL);
        let config = DeployConfig::load(file.path()).unwrap();
        assert_eq!(config.chain_id, "bombay-12");
        assert_eq!(config.batching.group_size, 40);
        assert_eq!(config.batching.batch_size, 25);
        assert_eq!(config.delay(), Duration::from_secs(10));
        assert_eq!(config.gas.denom, "uusd");
        assert_eq!(config.timeout(), Duration::from_secs(30));

        let plan = config.batch_plan();
        assert_eq!(plan.group_size.get(), 40);
        let settings = config.tx_settings();
        assert_eq!(settings.confirm_attempts, 30);
        assert_eq!(settings.confirm_interval, Duration::from_secs(2));
    }

    #[test]
    fn load_honours_overrides() {
        let mut value: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
        value["batching"] = serde_json::json!({"group_size": 10, "delay_ms": 0});
        let file = write_temp(&value.to_string());
        let config = DeployConfig::load(file.path()).unwrap();
        assert_eq!(config.batching.group_size, 10);
        assert_eq!(config.batching.batch_size, 25);
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn load_rejects_zero_batch_size() {
        let mut value: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
        value["batching"] = serde_json::json!({"batch_size": 0});
        let file = write_temp(&value.to_string());
        assert!(DeployConfig::load(file.path()).is_err());
    }

    #[test]
    fn load_rejects_bad_url_and_amount() {
        let mut value: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
        value["url"] = "ftp://lcd.example.com".into();
        let err = DeployConfig::load(write_temp(&value.to_string()).path()).unwrap_err();
        assert!(format!("{err:#}").contains("LCD url must be http(s)"), "{err:#}");

        let mut value: serde_json::Value = serde_json::from_str(MINIMAL).unwrap();
        value["ust_liquidity_amount"] = "1.5".into();
        assert!(DeployConfig::load(write_temp(&value.to_string()).path()).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DeployConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.json"));
    }

    #[test]
    fn keyring_reports_missing_role() {
        let keyring = Keyring::default().with(Role::Team, "words");
        assert_eq!(keyring.mnemonic(Role::Team).unwrap(), "words");
        let err = keyring.mnemonic(Role::Lp).unwrap_err();
        assert!(err.to_string().contains("TERRALAND_LP"));
    }

    #[test]
    fn keyring_debug_hides_mnemonics() {
        let keyring = Keyring::default().with(Role::Token, "secret phrase");
        assert!(!format!("{keyring:?}").contains("secret"));
    }

    #[test]
    fn read_beneficiaries_rejects_bad_amount() {
        let file = write_temp(r#"[{"address": "terra1a", "amount": "10"}, {"address": "terra1b", "amount": "ten"}]"#);
        let err = read_beneficiaries(file.path()).unwrap_err();
        assert!(err.to_string().contains("terra1b"));
    }

    #[test]
    fn member_list_report_finds_duplicates() {
        let file = write_temp(
            r#"[
                {"address": "terra1a", "amount": "10"},
                {"address": "terra1b", "amount": "20"},
                {"address": "terra1a", "amount": "5"}
            ]"#,
        );
        let entries = read_beneficiaries(file.path()).unwrap();
        let report = validate_member_list(&entries).unwrap();
        assert_eq!(report.records, 3);
        assert_eq!(report.duplicates, vec!["terra1a".to_string()]);
        assert_eq!(report.total, U256::from(35));
    }
}
