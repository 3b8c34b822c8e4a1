// src/main.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyhowResult, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tland_deploy::allocation::{self, StakerSnapshot};
use tland_deploy::config::{self, DeployConfig, Keyring};
use tland_deploy::{DeployContext, LcdClient, stages, utils};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// TerraLand listing deployment
///
/// Each subcommand is one step of the listing and records its results under
/// the files directory for the next step.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Network and fee configuration
    #[arg(long, default_value = "config/config.json", value_name = "PATH")]
    config: PathBuf,

    /// Directory holding manifests and beneficiary lists
    #[arg(long, default_value = "files", value_name = "DIR")]
    files: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload contract bytecode and record code ids
    StoreCodes {
        #[arg(long, default_value = "artifacts", value_name = "DIR")]
        artifacts: PathBuf,
    },
    /// Instantiate token, vesting, staking and airdrop contracts
    DeployContracts,
    /// Register vesting and airdrop beneficiaries in batches
    RegisterMembers,
    /// Create the TLAND/UST Terraswap pair
    CreatePair,
    /// Seed the Terraswap pair
    ProvideLiquidity,
    /// Move each contract's allocation into it
    SendTokens,
    /// Compute airdrop amounts from a staker snapshot
    AllocateAirdrop {
        #[arg(long, default_value = "files/stt_and_lp_stakers_for_TLAND.json")]
        snapshot: PathBuf,
        #[arg(long, default_value = "files/stt_and_lp_stakers.json")]
        output: PathBuf,
        #[arg(long, default_value_t = allocation::AIRDROP_POOL)]
        pool: u128,
        #[arg(long, default_value_t = allocation::MIN_STAKE)]
        min_stake: f64,
    },
    /// Report duplicates and totals of a beneficiary list
    CheckMembers {
        file: PathBuf,
        #[arg(long, default_value_t = 6)]
        decimals: u8,
    },
}

fn allocate_airdrop(snapshot: &Path, output: &Path, pool: u128, min_stake: f64) -> AnyhowResult<()> {
    let content = std::fs::read_to_string(snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
    let stakers: Vec<StakerSnapshot> = serde_json::from_str(&content)?;
    let beneficiaries = allocation::allocate(&stakers, pool, min_stake);
    info!(stakers = stakers.len(), eligible = beneficiaries.len(), "airdrop allocated");
    std::fs::write(output, serde_json::to_string(&beneficiaries)?)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn check_members(file: &Path, decimals: u8) -> AnyhowResult<()> {
    let entries = config::read_beneficiaries(file)?;
    let report = config::validate_member_list(&entries)?;
    for address in &report.duplicates {
        warn!(%address, "repeated");
    }
    info!(
        records = report.records,
        duplicates = report.duplicates.len(),
        total = %utils::u256_to_human(report.total, decimals),
        "member list checked"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::AllocateAirdrop {
            snapshot,
            output,
            pool,
            min_stake,
        } => allocate_airdrop(&snapshot, &output, pool, min_stake),
        Command::CheckMembers { file, decimals } => check_members(&file, decimals),
        online => run_stage(online, &cli.config, cli.files).await,
    }
}

async fn run_stage(command: Command, config_path: &Path, files: PathBuf) -> AnyhowResult<()> {
    let config = DeployConfig::load(config_path)?;
    let ledger = LcdClient::new(&config.url, config.timeout())?;
    info!(url = %config.url, chain_id = %config.chain_id, "connected");
    let ctx = DeployContext::new(config, Keyring::from_env(), ledger, files);

    match command {
        Command::StoreCodes { artifacts } => {
            stages::store_codes(&ctx, &artifacts).await?;
        }
        Command::DeployContracts => {
            stages::deploy_contracts(&ctx).await?;
        }
        Command::RegisterMembers => {
            let receipts = stages::register_all_members(&ctx).await?;
            info!(transactions = receipts.len(), "members registered");
        }
        Command::CreatePair => {
            stages::create_pair(&ctx).await?;
        }
        Command::ProvideLiquidity => {
            stages::provide_liquidity(&ctx).await?;
        }
        Command::SendTokens => {
            stages::send_tokens(&ctx).await?;
        }
        offline @ (Command::AllocateAirdrop { .. } | Command::CheckMembers { .. }) => {
            bail!("{offline:?} does not use the node");
        }
    }

    Ok(())
}
