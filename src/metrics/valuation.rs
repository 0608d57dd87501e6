use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Fraction of collateral that may be lost before liquidation.
pub const MAINTENANCE_MARGIN: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn is_long(&self) -> bool {
        matches!(self, Direction::Long)
    }
}

/// Reject open inputs the liquidation formula cannot price. Leverage
/// at or above `1 / M` would place the liquidation level at or below
/// zero, so it is an error rather than a clamp.
pub fn validate_open(
    entry_price: f64,
    leverage: f64,
) -> Result<(), Error> {
    if entry_price <= 0.0 {
        return Err(Error::InvalidTrade(format!(
            "entry price must be positive, got {}",
            entry_price
        )));
    }
    if leverage < 1.0 {
        return Err(Error::InvalidTrade(format!(
            "leverage must be at least 1, got {}",
            leverage
        )));
    }
    if 1.0 - MAINTENANCE_MARGIN / leverage <= 0.0 {
        return Err(Error::InvalidTrade(format!(
            "leverage {} gives a non-positive liquidation level",
            leverage
        )));
    }
    Ok(())
}

/// Price at which the position loses the maintenance fraction of its
/// collateral. Long: `entry * (1 - M / lev)`; short mirrored upward.
pub fn liquidation_price(
    entry_price: f64,
    leverage: f64,
    direction: Direction,
) -> f64 {
    match direction {
        Direction::Long => {
            entry_price * (1.0 - MAINTENANCE_MARGIN / leverage)
        },
        Direction::Short => {
            entry_price * (1.0 + MAINTENANCE_MARGIN / leverage)
        },
    }
}

/// Leveraged return in percent against the entry price.
pub fn pnl_percentage(
    entry_price: f64,
    current_price: f64,
    leverage: f64,
    direction: Direction,
) -> f64 {
    let raw = match direction {
        Direction::Long => (current_price - entry_price) / entry_price,
        Direction::Short => (entry_price - current_price) / entry_price,
    };
    raw * leverage * 100.0
}

/// Absolute PnL in collateral units.
pub fn pnl_abs(collateral: f64, pnl_pct: f64) -> f64 {
    collateral * pnl_pct / 100.0
}

pub fn is_liquidatable(
    current_price: f64,
    liquidation: f64,
    direction: Direction,
) -> bool {
    match direction {
        Direction::Long => current_price <= liquidation,
        Direction::Short => current_price >= liquidation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidation_price_long() {
        // entry 100, 5x long: 100 * (1 - 0.8 / 5) = 84
        let liq = liquidation_price(100.0, 5.0, Direction::Long);
        assert!((liq - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_liquidation_price_short() {
        let liq = liquidation_price(100.0, 5.0, Direction::Short);
        assert!((liq - 116.0).abs() < 1e-9);
    }

    #[test]
    fn test_liquidation_monotonic_in_leverage() {
        // higher leverage moves the long liquidation closer to entry
        let mut prev = liquidation_price(100.0, 1.5, Direction::Long);
        for lev in [2.0, 3.0, 5.0, 10.0, 20.0] {
            let liq = liquidation_price(100.0, lev, Direction::Long);
            assert!(liq > prev);
            assert!(liq < 100.0);
            prev = liq;
        }
    }

    #[test]
    fn test_pnl_percentage_long_gain() {
        // entry 100, current 110, 5x long: +50%
        let pct = pnl_percentage(100.0, 110.0, 5.0, Direction::Long);
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_percentage_short_gain() {
        // entry 100, current 90, 5x short: +50%
        let pct = pnl_percentage(100.0, 90.0, 5.0, Direction::Short);
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_signs_mirror() {
        let up_long = pnl_percentage(100.0, 105.0, 2.0, Direction::Long);
        let up_short = pnl_percentage(100.0, 105.0, 2.0, Direction::Short);
        assert!(up_long > 0.0);
        assert!((up_long + up_short).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_abs_from_collateral() {
        assert!((pnl_abs(10.0, 50.0) - 5.0).abs() < 1e-9);
        assert!((pnl_abs(10.0, -25.0) + 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_is_liquidatable() {
        assert!(is_liquidatable(84.0, 84.0, Direction::Long));
        assert!(is_liquidatable(80.0, 84.0, Direction::Long));
        assert!(!is_liquidatable(85.0, 84.0, Direction::Long));

        assert!(is_liquidatable(116.0, 116.0, Direction::Short));
        assert!(!is_liquidatable(110.0, 116.0, Direction::Short));
    }

    #[test]
    fn test_validate_open_rejects() {
        assert!(validate_open(0.0, 5.0).is_err());
        assert!(validate_open(-1.0, 5.0).is_err());
        assert!(validate_open(100.0, 0.5).is_err());
        // lev = 0.8 would put the liquidation level at zero
        assert!(validate_open(100.0, MAINTENANCE_MARGIN).is_err());
        assert!(validate_open(100.0, 1.0).is_ok());
        assert!(validate_open(100.0, 20.0).is_ok());
    }
}
