use std::{env, fs, ops::Deref, str::FromStr, sync::Arc};

use alloy_primitives::Address;
use tokio::sync::RwLock;

use crate::{
    cache::{ApiCache, RosterSnapshot},
    error::Error,
    helpers::parse_string_list,
    metrics::{assign_ranks, yap_change_24h},
    model::placeholder_roster,
    provider::{Rpc, Vault, Wallet, HTTP},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub http: HTTP,
    pub rpc: Rpc,
    pub vault: Vault,
    pub wallet: Wallet,
    pub roster: RwLock<RosterSnapshot>,
    pub api_cache: ApiCache,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let rpc = Rpc::new(
            config.rpc_host.to_owned(),
            config.receipt_poll_interval_ms,
            config.receipt_poll_max_attempts,
        );
        let vault = Vault::new(rpc.clone(), config.vault_contract);
        let wallet = Wallet::new(rpc.clone(), &config);
        let http = HTTP::new(config.clone());
        let api_cache = ApiCache::new(config.cache_ttl);

        // serve the bundled roster until the first fetch cycle lands
        let mut yappers = placeholder_roster();
        assign_ranks(&mut yappers);
        for yapper in &mut yappers {
            yapper.yap_change_24h = yap_change_24h(&[], yapper.yaps_l24h);
        }

        Ok(Self {
            config,
            http,
            rpc,
            vault,
            wallet,
            roster: RwLock::new(RosterSnapshot {
                version: 0,
                yappers,
                placeholder: true,
            }),
            api_cache,
        })
    }

    /// Look a yapper up by id or handle, case-insensitive on the
    /// handle, against the current snapshot.
    pub async fn find_yapper(&self, key: &str) -> Option<crate::model::Yapper> {
        let roster = self.roster.read().await;
        roster
            .yappers
            .iter()
            .find(|y| {
                y.id == key || y.handle.eq_ignore_ascii_case(key)
            })
            .cloned()
    }

    /// Current index value for a handle, used as the mark price.
    pub async fn index_price(&self, handle: &str) -> Option<f64> {
        let roster = self.roster.read().await;
        roster
            .yappers
            .iter()
            .find(|y| y.handle.eq_ignore_ascii_case(handle))
            .map(|y| y.x_index)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_host: String,
    pub chain_id: u64,
    pub chain_name: String,
    pub explorer_url: String,
    pub vault_contract: Address,
    pub mon_price_usdc: f64,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub yaps_api_host: String,
    pub roster_handles: Vec<String>,
    pub roster_refresh_interval: u64,
    pub cache_ttl: u64,
    pub history_window_days: u32,
    pub max_leverage: f64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_poll_max_attempts: u32,
    pub enable_roster_sync: bool,
}

impl Config {
    pub fn get_yaps_url(&self, handle: &str) -> String {
        format!(
            "{}/api/v1/yaps?username={}",
            self.yaps_api_host, handle
        )
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let rpc_host = env::var("RPC_HOST")?;
    url::Url::parse(&rpc_host)?;
    let chain_id: u64 = env::var("CHAIN_ID")?.parse()?;
    let chain_name = env::var("CHAIN_NAME")?;
    let explorer_url = env::var("EXPLORER_URL")?;
    let vault_contract = Address::from_str(&env::var("VAULT_CONTRACT")?)?;
    let mon_price_usdc: f64 = env::var("MON_PRICE_USDC")?.parse()?;

    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = parse_string_list(env::var("ALLOWED_ORIGINS")?);
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );

    let yaps_api_host = env::var("YAPS_API_HOST")?;
    url::Url::parse(&yaps_api_host)?;
    let roster_handles = parse_string_list(env::var("ROSTER_HANDLES")?);
    let roster_refresh_interval =
        env::var("ROSTER_REFRESH_INTERVAL_IN_SEC")?.parse()?;
    let cache_ttl = env::var("CACHE_TTL_IN_SEC")?.parse()?;
    let history_window_days = match env::var("HISTORY_WINDOW_DAYS") {
        Ok(value) => value.parse()?,
        Err(_) => crate::metrics::DEFAULT_WINDOW_DAYS,
    };
    let max_leverage: f64 = env::var("MAX_LEVERAGE")?.parse()?;
    let receipt_poll_interval_ms =
        env::var("RECEIPT_POLL_INTERVAL_MS")?.parse()?;
    let receipt_poll_max_attempts =
        env::var("RECEIPT_POLL_MAX_ATTEMPTS")?.parse()?;
    let enable_roster_sync = env::var("ENABLE_ROSTER_SYNC")?.parse()?;

    if max_leverage < 1.0 {
        return Err(Error::ConfigurationError(format!(
            "MAX_LEVERAGE must be at least 1, got {}",
            max_leverage
        )));
    }

    let config = Config {
        rpc_host,
        chain_id,
        chain_name,
        explorer_url,
        vault_contract,
        mon_price_usdc,
        server_host,
        port,
        allowed_origins,
        static_dir,
        yaps_api_host,
        roster_handles,
        roster_refresh_interval,
        cache_ttl,
        history_window_days,
        max_leverage,
        receipt_poll_interval_ms,
        receipt_poll_max_attempts,
        enable_roster_sync,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string);

    Ok(())
}

fn parse_config_string(config: String) {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        env::set_var(key, value);
    }
}
