use actix_web::{get, web, Responder};
use chrono::Utc;
use rand::thread_rng;
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    metrics::build_history,
};

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    id: String,
}

#[get("/yapper")]
pub async fn detail(
    state: web::Data<AppState<State>>,
    query: web::Query<DetailQuery>,
) -> Result<impl Responder, Error> {
    let yapper = state
        .find_yapper(&query.id)
        .await
        .ok_or_else(|| Error::YapperNotFound(query.id.to_owned()))?;
    Ok(web::Json(yapper))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    id: String,
    days: Option<u32>,
}

/// Daily activity series for one yapper. The default-window series is
/// generated once per fetch cycle and cached so every chart render of
/// a session sees the same curve; custom windows are built on demand.
#[get("/yap-history")]
pub async fn history(
    state: web::Data<AppState<State>>,
    query: web::Query<HistoryQuery>,
) -> Result<impl Responder, Error> {
    let yapper = state
        .find_yapper(&query.id)
        .await
        .ok_or_else(|| Error::YapperNotFound(query.id.to_owned()))?;

    let window = query.days.unwrap_or(state.config.history_window_days);
    if window == 0 || window > 365 {
        return Err(Error::InvalidOption(format!(
            "days must be between 1 and 365, got {}",
            window
        )));
    }

    if window == state.config.history_window_days {
        if let Some(cached) =
            state.api_cache.yap_history.get(&yapper.id).await
        {
            return Ok(web::Json(cached));
        }
    }

    let today = Utc::now().date_naive();
    let series = build_history(
        yapper.total_yaps,
        window,
        today,
        &mut thread_rng(),
    );

    if window == state.config.history_window_days {
        state
            .api_cache
            .yap_history
            .set(&yapper.id, series.clone())
            .await;
    }

    Ok(web::Json(series))
}
