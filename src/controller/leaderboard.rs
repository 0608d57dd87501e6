use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::{AppState, State},
    error::Error,
    metrics::{filter_roster, sort_roster, SortKey, SortOrder},
    model::Yapper,
};

#[derive(Debug, Deserialize)]
pub struct Query {
    search: Option<String>,
    sort: Option<SortKey>,
    order: Option<SortOrder>,
}

/// Filtered, sorted roster cards. Ranks are whatever the last fetch
/// cycle assigned; sorting here never reassigns them.
#[get("/leaderboard")]
pub async fn index(
    state: web::Data<AppState<State>>,
    query: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let (mut yappers, placeholder) = {
        let roster = state.roster.read().await;
        (roster.yappers.to_vec(), roster.placeholder)
    };

    if let Some(search) = &query.search {
        yappers = filter_roster(&yappers, search);
    }

    sort_roster(
        &mut yappers,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    );

    Ok(web::Json(Response {
        yappers,
        placeholder,
    }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub yappers: Vec<Yapper>,
    /// True while the bundled dataset is being served instead of a
    /// live feed.
    pub placeholder: bool,
}
