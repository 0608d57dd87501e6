use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::Direction;

/// A position as read from the vault contract, collateral in MON.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: u64,
    pub trader: String,
    pub yapper_handle: String,
    pub direction: Direction,
    pub collateral: BigDecimal,
    pub leverage: f64,
    pub entry_price: f64,
    pub open: bool,
    pub opened_at: Option<DateTime<Utc>>,
}

/// A position annotated against the current index value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    #[serde(flatten)]
    pub position: Position,
    pub current_price: f64,
    pub liquidation_price: f64,
    pub pnl_percentage: f64,
    pub pnl_abs: f64,
    pub liquidatable: bool,
    /// Notional in USDC at the reference MON price.
    pub size_usdc: f64,
}

/// Pre-trade estimate for the open-position form.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeQuote {
    pub yapper_handle: String,
    pub direction: Direction,
    pub collateral: BigDecimal,
    pub leverage: f64,
    pub entry_price: f64,
    pub liquidation_price: f64,
    pub position_size: BigDecimal,
    pub size_usdc: f64,
}
