use std::str::FromStr;

use actix_web::{get, web, Responder};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[derive(Debug, Deserialize)]
pub struct Query {
    address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsResponse {
    pub accounts: Vec<String>,
    pub chain_id: u64,
    pub network_ok: bool,
}

/// Accounts the connected node/wallet exposes, with the chain check
/// the client needs before picking one to trade from.
#[get("/wallet/accounts")]
pub async fn accounts(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let accounts = state.wallet.accounts().await?;
    let chain_id = state.rpc.chain_id().await?;

    Ok(web::Json(AccountsResponse {
        accounts: accounts
            .into_iter()
            .map(|a| a.to_checksum(None))
            .collect(),
        chain_id,
        network_ok: chain_id == state.config.chain_id,
    }))
}

/// Connection status for an account: chain id, whether it matches the
/// configured network, native balance, and the add-chain parameters
/// when a switch is needed.
#[get("/wallet/status")]
pub async fn status(
    state: web::Data<AppState<State>>,
    query: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let address = Address::from_str(&query.address)?;
    let status = state.wallet.status(address).await?;
    Ok(web::Json(status))
}
