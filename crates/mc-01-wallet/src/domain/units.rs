//! Conversions between wei and 18-decimal display amounts.

use super::errors::WalletError;
use shared_types::U256;

const DECIMALS: usize = 18;

fn one_ether() -> U256 {
    U256::exp10(DECIMALS)
}

/// Format wei as a decimal string, trimming trailing zeros (`1.5`, `0.0`).
#[must_use]
pub fn format_ether(wei: U256) -> String {
    let unit = one_ether();
    let whole = wei / unit;
    let frac = wei % unit;
    let frac_str = format!("{:0>width$}", frac.to_string(), width = DECIMALS);
    let trimmed = frac_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Parse a decimal amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, WalletError> {
    let invalid = || WalletError::InvalidAmount(amount.to_string());
    let s = amount.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if (whole.is_empty() && frac.is_empty())
        || frac.len() > DECIMALS
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| invalid())?
    };
    let frac = if frac.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&format!("{frac:0<width$}", width = DECIMALS)).map_err(|_| invalid())?
    };
    whole
        .checked_mul(one_ether())
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)
}
