use std::str::FromStr;

use actix_web::{get, post, web, Responder};
use alloy_primitives::Address;
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::round2,
    metrics::{
        is_liquidatable, liquidation_price, pnl_abs, pnl_percentage,
        validate_open, Direction,
    },
    model::{Position, PositionView, TradeQuote},
};

pub fn to_view(
    position: Position,
    current_price: f64,
    mon_price_usdc: f64,
) -> PositionView {
    let liq_price = liquidation_price(
        position.entry_price,
        position.leverage,
        position.direction,
    );
    let pnl_pct = pnl_percentage(
        position.entry_price,
        current_price,
        position.leverage,
        position.direction,
    );
    let collateral = position.collateral.to_f64().unwrap_or_default();

    PositionView {
        current_price: round2(current_price),
        liquidation_price: round2(liq_price),
        pnl_percentage: round2(pnl_pct),
        pnl_abs: round2(pnl_abs(collateral, pnl_pct)),
        liquidatable: is_liquidatable(
            current_price,
            liq_price,
            position.direction,
        ),
        size_usdc: round2(collateral * position.leverage * mon_price_usdc),
        position,
    }
}

// =============================================================================
// Position quote (pre-trade estimate)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    yapper: String,
    direction: Direction,
    collateral: BigDecimal,
    leverage: f64,
}

#[get("/position-quote")]
pub async fn quote(
    state: web::Data<AppState<State>>,
    query: web::Query<QuoteQuery>,
) -> Result<impl Responder, Error> {
    let yapper = state
        .find_yapper(&query.yapper)
        .await
        .ok_or_else(|| Error::YapperNotFound(query.yapper.to_owned()))?;

    if query.leverage > state.config.max_leverage {
        return Err(Error::InvalidTrade(format!(
            "leverage {} exceeds the {} cap",
            query.leverage, state.config.max_leverage
        )));
    }
    if query.collateral <= BigDecimal::from(0) {
        return Err(Error::InvalidTrade(String::from(
            "collateral must be positive",
        )));
    }

    let entry_price = yapper.x_index;
    validate_open(entry_price, query.leverage)?;

    let liq_price =
        liquidation_price(entry_price, query.leverage, query.direction);
    let position_size =
        &query.collateral * BigDecimal::try_from(query.leverage)?;
    let collateral_mon = query.collateral.to_f64().unwrap_or_default();

    Ok(web::Json(TradeQuote {
        yapper_handle: yapper.handle,
        direction: query.direction,
        collateral: query.collateral.to_owned(),
        leverage: query.leverage,
        entry_price: round2(entry_price),
        liquidation_price: round2(liq_price),
        position_size: position_size.with_scale(2),
        size_usdc: round2(
            collateral_mon
                * query.leverage
                * state.config.mon_price_usdc,
        ),
    }))
}

// =============================================================================
// Position list
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    address: String,
    open: Option<bool>,
}

#[get("/positions")]
pub async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, Error> {
    let trader = Address::from_str(&query.address)?;
    let positions = state.vault.positions_for(trader, query.open).await?;

    let mut views = Vec::with_capacity(positions.len());
    for position in positions {
        let current = state
            .index_price(&position.yapper_handle)
            .await
            .unwrap_or(position.entry_price);
        views.push(to_view(position, current, state.config.mon_price_usdc));
    }

    Ok(web::Json(views))
}

// =============================================================================
// Liquidation check (contract-side)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LiquidationQuery {
    id: u64,
}

/// The contract's own view of a position's liquidation state,
/// alongside the locally computed valuation.
#[get("/positions/liquidation")]
pub async fn liquidation(
    state: web::Data<AppState<State>>,
    query: web::Query<LiquidationQuery>,
) -> Result<impl Responder, Error> {
    let status = state.vault.check_liquidation(query.id).await?;
    Ok(web::Json(status))
}

// =============================================================================
// Open / close
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub address: String,
    pub yapper: String,
    pub direction: Direction,
    pub collateral: BigDecimal,
    pub leverage: f64,
}

#[post("/positions/open")]
pub async fn open(
    state: web::Data<AppState<State>>,
    body: web::Json<OpenRequest>,
) -> Result<impl Responder, Error> {
    let request = body.into_inner();
    let from = Address::from_str(&request.address)?;

    let yapper = state
        .find_yapper(&request.yapper)
        .await
        .ok_or_else(|| Error::YapperNotFound(request.yapper.to_owned()))?;

    if request.leverage > state.config.max_leverage {
        return Err(Error::InvalidTrade(format!(
            "leverage {} exceeds the {} cap",
            request.leverage, state.config.max_leverage
        )));
    }
    if request.collateral <= BigDecimal::from(0) {
        return Err(Error::InvalidTrade(String::from(
            "collateral must be positive",
        )));
    }
    validate_open(yapper.x_index, request.leverage)?;

    state.wallet.ensure_chain().await?;
    let position_id = state
        .vault
        .open_position(
            from,
            yapper.handle,
            request.direction,
            &request.collateral,
        )
        .await?;

    Ok(web::Json(OpenResponse { position_id }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResponse {
    pub position_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRequest {
    pub address: String,
    pub position_id: u64,
}

#[post("/positions/close")]
pub async fn close(
    state: web::Data<AppState<State>>,
    body: web::Json<CloseRequest>,
) -> Result<impl Responder, Error> {
    let request = body.into_inner();
    let from = Address::from_str(&request.address)?;

    let position = state.vault.get_position(request.position_id).await?;
    if !position.trader.eq_ignore_ascii_case(&request.address) {
        return Err(Error::InvalidTrade(format!(
            "position {} does not belong to {}",
            request.position_id, request.address
        )));
    }
    if !position.open {
        return Err(Error::InvalidTrade(format!(
            "position {} is already closed",
            request.position_id
        )));
    }

    state.wallet.ensure_chain().await?;
    // waits for the receipt, so the re-read below sees the close
    state
        .vault
        .close_position(from, request.position_id)
        .await?;

    let closed = state.vault.get_position(request.position_id).await?;
    let current = state
        .index_price(&closed.yapper_handle)
        .await
        .unwrap_or(closed.entry_price);

    Ok(web::Json(to_view(closed, current, state.config.mon_price_usdc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Direction;
    use bigdecimal::BigDecimal;

    fn position(direction: Direction) -> Position {
        Position {
            id: 1,
            trader: String::from(
                "0x91DcF137f42130E5095558Ee1D143F0282B114B0",
            ),
            yapper_handle: String::from("hosseeb"),
            direction,
            collateral: BigDecimal::from(10),
            leverage: 5.0,
            entry_price: 100.0,
            open: true,
            opened_at: None,
        }
    }

    #[test]
    fn test_to_view_long_gain() {
        let view = to_view(position(Direction::Long), 110.0, 20.0);
        assert_eq!(view.pnl_percentage, 50.0);
        assert_eq!(view.pnl_abs, 5.0);
        assert_eq!(view.liquidation_price, 84.0);
        assert!(!view.liquidatable);
        // 10 MON collateral at 5x and 20 USDC per MON
        assert_eq!(view.size_usdc, 1000.0);
    }

    #[test]
    fn test_to_view_short_loss_and_liquidation() {
        let view = to_view(position(Direction::Short), 117.0, 20.0);
        assert_eq!(view.pnl_percentage, -85.0);
        assert_eq!(view.liquidation_price, 116.0);
        assert!(view.liquidatable);
    }
}
