use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::Direction;
use crate::model::Position;

/// A closed position, kept as a terminal snapshot. The contract does
/// not record exit price or realized PnL, so both stay `None` when
/// read back from chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    pub trader: String,
    pub yapper_handle: String,
    pub direction: Direction,
    pub collateral: BigDecimal,
    pub leverage: f64,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub pnl: Option<BigDecimal>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<Position> for Trade {
    fn from(position: Position) -> Trade {
        Trade {
            id: position.id,
            trader: position.trader,
            yapper_handle: position.yapper_handle,
            direction: position.direction,
            collateral: position.collateral,
            leverage: position.leverage,
            entry_price: position.entry_price,
            exit_price: None,
            pnl: None,
            closed_at: None,
        }
    }
}
