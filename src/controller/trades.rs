use std::str::FromStr;

use actix_web::{get, web, Responder};
use alloy_primitives::Address;
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Trade,
};

#[derive(Debug, Deserialize)]
pub struct Query {
    address: String,
}

/// Closed positions for an address, as terminal trade records.
#[get("/trades")]
pub async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let trader = Address::from_str(&query.address)?;
    let closed = state
        .vault
        .positions_for(trader, Some(false))
        .await?;

    let trades: Vec<Trade> = closed.into_iter().map(Trade::from).collect();
    Ok(web::Json(trades))
}
