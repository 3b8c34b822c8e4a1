// src/utils.rs
use ethers::types::U256;

/// Parse a decimal amount string, rejecting anything that does not fit a cosmwasm `Uint128`.
pub fn parse_amount(amount: &str) -> Option<U256> {
    // from_dec_str maps "" to zero
    if amount.is_empty() {
        return None;
    }
    let value = U256::from_dec_str(amount).ok()?;
    if value > U256::from(u128::MAX) {
        return None;
    }
    Some(value)
}

pub fn sum_amounts<'a>(amounts: impl IntoIterator<Item = &'a str>) -> Option<U256> {
    amounts
        .into_iter()
        .try_fold(U256::zero(), |acc, amount| acc.checked_add(parse_amount(amount)?))
}

pub fn u256_to_human(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let divisor = U256::exp10(decimals as usize);
    let integer = value / divisor;
    let mut fraction = (value % divisor).to_string();
    let width = decimals as usize;
    while fraction.len() < width {
        fraction.insert(0, '0');
    }
    while fraction.ends_with('0') {
        fraction.pop();
    }
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}
