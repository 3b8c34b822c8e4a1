// src/allocation.rs
use serde::Deserialize;

use crate::registrar::Beneficiary;

/// 500 000 TLAND
pub const AIRDROP_POOL: u128 = 500_000_000_000;
pub const MIN_STAKE: f64 = 250.0;

/// One entry of the STT / LP staker snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct StakerSnapshot {
    pub staker: String,
    pub ste: f64,
}

/// Split `pool` between stakers above `min_stake`, weighted by the square root
/// of their stake. Amounts are floored, so the sum never exceeds `pool`.
pub fn allocate(stakers: &[StakerSnapshot], pool: u128, min_stake: f64) -> Vec<Beneficiary> {
    let eligible: Vec<_> = stakers.iter().filter(|s| s.ste > min_stake).collect();
    let weight: f64 = eligible.iter().map(|s| s.ste.sqrt()).sum();
    if weight <= 0.0 {
        return Vec::new();
    }

    let ratio = pool as f64 / weight;
    eligible
        .into_iter()
        .map(|s| Beneficiary {
            address: s.staker.clone(),
            amount: ((s.ste.sqrt() * ratio).floor() as u128).to_string(),
        })
        .collect()
}
