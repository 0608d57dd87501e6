use std::str::FromStr;

use actix_web::{get, post, web, Responder};
use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    provider::VaultLiquidity,
};

#[derive(Debug, Deserialize)]
pub struct Query {
    address: Option<String>,
}

/// Pooled liquidity, plus the caller's LP share when an address is
/// given.
#[get("/vault/liquidity")]
pub async fn liquidity(
    state: web::Data<AppState<State>>,
    query: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let total_liquidity = state.vault.total_liquidity().await?;

    let lp_balance = match &query.address {
        Some(address) => {
            let account = Address::from_str(address)?;
            Some(state.vault.lp_balance(account).await?)
        },
        None => None,
    };

    Ok(web::Json(VaultLiquidity {
        total_liquidity,
        lp_balance,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRequest {
    pub address: String,
    pub amount: BigDecimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityResponse {
    pub total_liquidity: BigDecimal,
    pub lp_balance: BigDecimal,
}

async fn liquidity_after(
    state: &AppState<State>,
    account: Address,
) -> Result<LiquidityResponse, Error> {
    Ok(LiquidityResponse {
        total_liquidity: state.vault.total_liquidity().await?,
        lp_balance: state.vault.lp_balance(account).await?,
    })
}

#[post("/vault/liquidity/add")]
pub async fn add(
    state: web::Data<AppState<State>>,
    body: web::Json<LiquidityRequest>,
) -> Result<impl Responder, Error> {
    let request = body.into_inner();
    let account = Address::from_str(&request.address)?;
    if request.amount <= BigDecimal::from(0) {
        return Err(Error::InvalidTrade(String::from(
            "amount must be positive",
        )));
    }

    state.wallet.ensure_chain().await?;
    state.vault.add_liquidity(account, &request.amount).await?;

    Ok(web::Json(liquidity_after(&state, account).await?))
}

#[post("/vault/liquidity/remove")]
pub async fn remove(
    state: web::Data<AppState<State>>,
    body: web::Json<LiquidityRequest>,
) -> Result<impl Responder, Error> {
    let request = body.into_inner();
    let account = Address::from_str(&request.address)?;
    if request.amount <= BigDecimal::from(0) {
        return Err(Error::InvalidTrade(String::from(
            "amount must be positive",
        )));
    }

    state.wallet.ensure_chain().await?;
    state
        .vault
        .remove_liquidity(account, &request.amount)
        .await?;

    Ok(web::Json(liquidity_after(&state, account).await?))
}
