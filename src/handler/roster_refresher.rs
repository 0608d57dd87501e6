use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use rand::thread_rng;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    metrics::{assign_ranks, build_history, yap_change_24h},
    model::{YapDataPoint, Yapper},
    provider::YapsEntry,
};

/// Periodically re-fetch the roster from the yaps feed, recompute
/// dense ranks and 24h deltas, and swap the shared snapshot. Fetch
/// failures keep the previous snapshot in place.
pub async fn roster_refresher(state: AppState<State>) -> Result<(), Error> {
    if !state.config.enable_roster_sync {
        info!("roster sync disabled, serving bundled roster");
        return Ok(());
    }

    let mut timer =
        interval(Duration::from_secs(state.config.roster_refresh_interval));

    loop {
        timer.tick().await;
        if let Err(e) = refresh(&state).await {
            error!("roster refresh failed: {}", e);
        }
    }
}

async fn refresh(state: &AppState<State>) -> Result<(), Error> {
    // remember which snapshot this cycle started from
    let (base_version, previous) = {
        let roster = state.roster.read().await;
        (roster.version, roster.yappers.to_vec())
    };

    let entries = state.http.get_roster().await?;
    let mut yappers = merge_roster(&previous, entries);
    assign_ranks(&mut yappers);

    let today = Utc::now().date_naive();
    let window = state.config.history_window_days;
    let mut rng = thread_rng();
    let mut histories = Vec::with_capacity(yappers.len());

    for yapper in &mut yappers {
        let history =
            build_history(yapper.total_yaps, window, today, &mut rng);
        yapper.yap_change_24h = yap_change_24h(&history, yapper.yaps_l24h);
        histories.push((yapper.id.to_owned(), history));
    }

    if !commit(state, base_version, yappers, histories).await {
        warn!(
            "dropping stale roster fetch (version {} superseded)",
            base_version
        );
    }

    Ok(())
}

/// Fold the fetched feed entries over the previous roster. The feed
/// owns the activity totals; profile and index fields it does not
/// report carry over from the entry we already had for the handle.
fn merge_roster(previous: &[Yapper], entries: Vec<YapsEntry>) -> Vec<Yapper> {
    let by_handle: HashMap<String, &Yapper> = previous
        .iter()
        .map(|y| (y.handle.to_lowercase(), y))
        .collect();

    let mut yappers: Vec<Yapper> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_yapper(index))
        .collect();

    for yapper in &mut yappers {
        if let Some(known) = by_handle.get(&yapper.handle.to_lowercase()) {
            yapper.name = known.name.to_owned();
            yapper.avatar = known.avatar.to_owned();
            yapper.followers = known.followers;
            yapper.smart_followers = known.smart_followers;
            yapper.smart_percentage = known.smart_percentage;
            yapper.x_index = known.x_index;
            yapper.x_index_change_24h = known.x_index_change_24h;
            // the feed reports totals only; keep the known referral
            // share and attribute the rest as earned
            yapper.referral_yaps = known.referral_yaps;
            yapper.earned_yaps =
                yapper.total_yaps.saturating_sub(known.referral_yaps);
        }
    }

    yappers
}

/// Swap the shared snapshot and the per-yapper history caches, unless
/// a newer cycle landed while this one was fetching. A stale cycle
/// writes nothing, histories included.
async fn commit(
    state: &AppState<State>,
    base_version: u64,
    yappers: Vec<Yapper>,
    histories: Vec<(String, Vec<YapDataPoint>)>,
) -> bool {
    let mut roster = state.roster.write().await;
    if roster.version != base_version {
        return false;
    }

    roster.version += 1;
    roster.placeholder = false;
    info!(
        "roster refreshed: {} yappers, version {}",
        yappers.len(),
        roster.version
    );
    roster.yappers = yappers;
    drop(roster);

    for (id, history) in histories {
        state.api_cache.yap_history.set(&id, history).await;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{configuration::Config, model::placeholder_roster};
    use alloy_primitives::Address;
    use chrono::NaiveDate;

    fn config() -> Config {
        Config {
            rpc_host: String::from("http://localhost:8545"),
            chain_id: 10143,
            chain_name: String::from("Monad Testnet"),
            explorer_url: String::from("https://testnet.monadscan.com"),
            vault_contract: Address::ZERO,
            mon_price_usdc: 20.0,
            server_host: String::from("127.0.0.1"),
            port: 8080,
            allowed_origins: vec![String::from("*")],
            static_dir: String::from("static"),
            yaps_api_host: String::from("https://api.kaito.ai"),
            roster_handles: vec![],
            roster_refresh_interval: 300,
            cache_ttl: 300,
            history_window_days: 30,
            max_leverage: 20.0,
            receipt_poll_interval_ms: 100,
            receipt_poll_max_attempts: 1,
            enable_roster_sync: false,
        }
    }

    fn entry(handle: &str, total: f64) -> YapsEntry {
        YapsEntry {
            user_id: String::new(),
            username: handle.to_owned(),
            yaps_all: total,
            yaps_l24h: 2.0,
            yaps_l48h: 4.0,
            yaps_l7d: 12.0,
            yaps_l30d: 50.0,
            yaps_l3m: 120.0,
            yaps_l6m: 200.0,
            yaps_l12m: total,
        }
    }

    fn sample_history() -> Vec<YapDataPoint> {
        vec![YapDataPoint {
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            count: 10,
            change_from_previous: 0,
            change_percentage: 0.0,
        }]
    }

    #[test]
    fn test_merge_carries_profile_and_index() {
        let previous = placeholder_roster();
        let merged =
            merge_roster(&previous, vec![entry("hosseeb", 530.0)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Haseeb");
        assert_eq!(merged[0].total_yaps, 530);
        // the feed has no composite index of its own
        assert_eq!(merged[0].x_index, 125.5);
        assert_eq!(merged[0].x_index_change_24h, 5.2);
        assert_eq!(merged[0].followers, 132363);
    }

    #[test]
    fn test_merge_keeps_referral_share() {
        let previous = placeholder_roster();
        let merged =
            merge_roster(&previous, vec![entry("moo9000", 270.0)]);

        assert_eq!(merged[0].referral_yaps, 7);
        assert_eq!(merged[0].earned_yaps, 263);
    }

    #[test]
    fn test_merge_unknown_handle_defaults() {
        let merged = merge_roster(&[], vec![entry("newcomer", 10.0)]);

        assert_eq!(merged[0].x_index, 0.0);
        assert_eq!(merged[0].followers, 0);
        assert_eq!(merged[0].earned_yaps, 10);
    }

    #[tokio::test]
    async fn test_commit_applies_fresh_cycle() {
        let state = AppState::new(State::new(config()).unwrap());
        let mut yappers = placeholder_roster();
        assign_ranks(&mut yappers);

        let histories = vec![(String::from("1"), sample_history())];
        assert!(commit(&state, 0, yappers, histories).await);

        let roster = state.roster.read().await;
        assert_eq!(roster.version, 1);
        assert!(!roster.placeholder);
        drop(roster);
        assert!(state.api_cache.yap_history.get("1").await.is_some());
    }

    #[tokio::test]
    async fn test_commit_drops_stale_cycle_entirely() {
        let state = AppState::new(State::new(config()).unwrap());
        state.roster.write().await.version = 2;

        let histories = vec![(String::from("1"), sample_history())];
        assert!(!commit(&state, 0, Vec::new(), histories).await);

        let roster = state.roster.read().await;
        assert_eq!(roster.version, 2);
        assert!(roster.placeholder);
        assert!(!roster.yappers.is_empty());
        drop(roster);
        // the stale cycle's histories never reach the cache
        assert!(state.api_cache.yap_history.get("1").await.is_none());
    }
}
