// src/lib.rs
pub mod allocation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod manifest;
pub mod msg;
pub mod plan;
pub mod registrar;
pub mod stages;
pub mod utils;
pub mod wallet;

pub use error::LedgerError;
pub use ledger::{Ledger, LcdClient, TxResponse};
pub use registrar::{BatchPlan, BatchReceipt, Beneficiary, RegistrarError};
pub use stages::DeployContext;
pub use wallet::{TxSettings, Wallet};
