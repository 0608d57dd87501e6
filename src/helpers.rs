use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::BigDecimal;

use crate::error::Error;

/// Decimals of the native MON token.
pub const NATIVE_DECIMALS: i64 = 18;

/// Round to two decimal places, the display precision used across the
/// dashboard (and by the contract's own reporting).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a raw 18-decimal wei amount into whole MON.
pub fn from_wei(amount: U256) -> Result<BigDecimal, Error> {
    let raw = BigDecimal::from_str(&amount.to_string())?;
    Ok(raw / BigDecimal::from(10_u64.pow(NATIVE_DECIMALS as u32)))
}

/// Convert a MON amount into its 18-decimal wei representation.
/// Fractional wei is truncated.
pub fn to_wei(amount: &BigDecimal) -> Result<U256, Error> {
    let scaled = (amount * BigDecimal::from(10_u64.pow(NATIVE_DECIMALS as u32)))
        .with_scale(0);
    U256::from_str(&scaled.to_string())
        .map_err(|e| Error::InvalidTrade(format!("amount out of range: {}", e)))
}

/// Parse a comma separated env value into a list, dropping empties.
pub fn parse_string_list(data: String) -> Vec<String> {
    data.split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(50.016), 50.02);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(-3.333_333), -3.33);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_wei_round_trip() {
        let amount = BigDecimal::from_str("1.5").unwrap();
        let wei = to_wei(&amount).unwrap();
        assert_eq!(wei.to_string(), "1500000000000000000");

        let back = from_wei(wei).unwrap();
        assert_eq!(back.with_scale(1), amount);
    }

    #[test]
    fn test_to_wei_truncates_sub_wei() {
        // 19 fractional digits, the last one cannot be represented
        let amount = BigDecimal::from_str("0.0000000000000000019").unwrap();
        let wei = to_wei(&amount).unwrap();
        assert_eq!(wei.to_string(), "1");
    }

    #[test]
    fn test_parse_string_list() {
        let items =
            parse_string_list(String::from("hosseeb, simononchain,,moo9000"));
        assert_eq!(items, vec!["hosseeb", "simononchain", "moo9000"]);
    }
}
