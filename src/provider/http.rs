use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{configuration::Config, error::Error, model::Yapper};

/// One roster record from the yaps feed.
#[derive(Debug, Clone, Deserialize)]
pub struct YapsEntry {
    pub user_id: String,
    pub username: String,
    pub yaps_all: f64,
    pub yaps_l24h: f64,
    pub yaps_l48h: f64,
    pub yaps_l7d: f64,
    pub yaps_l30d: f64,
    pub yaps_l3m: f64,
    pub yaps_l6m: f64,
    pub yaps_l12m: f64,
}

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
}

impl HTTP {
    pub fn new(config: Config) -> Self {
        HTTP { config }
    }

    async fn get_yaps(&self, handle: &str) -> Result<YapsEntry, Error> {
        let url = self.config.get_yaps_url(handle);
        info!("{}", &url);
        let json = reqwest::get(url).await?.json::<YapsEntry>().await?;
        Ok(json)
    }

    /// Fetch the configured roster handle by handle. Handles that
    /// fail are dropped with a warning; an entirely empty result is a
    /// data source error so the caller can fall back.
    pub async fn get_roster(&self) -> Result<Vec<YapsEntry>, Error> {
        let fetches = self
            .config
            .roster_handles
            .iter()
            .map(|handle| self.get_yaps(handle));
        let results = join_all(fetches).await;

        let mut entries = Vec::new();
        for (handle, result) in
            self.config.roster_handles.iter().zip(results)
        {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("roster fetch failed for {}: {}", handle, e),
            }
        }

        if entries.is_empty() {
            return Err(Error::DataSource(String::from(
                "no roster entries could be fetched",
            )));
        }

        Ok(entries)
    }
}

impl YapsEntry {
    /// Shape a feed record into the dashboard model. The feed only
    /// reports activity counts, so index and profile metrics start at
    /// zero; the merge step carries them over from the previous
    /// snapshot, and ranks and 24h deltas are assigned there too.
    pub fn into_yapper(self, id_fallback: usize) -> Yapper {
        let id = if self.user_id.is_empty() {
            (id_fallback + 1).to_string()
        } else {
            self.user_id
        };
        let total_yaps = self.yaps_all.round().max(0.0) as u64;
        Yapper {
            id,
            name: self.username.to_owned(),
            handle: self.username,
            avatar: None,
            total_yaps,
            earned_yaps: total_yaps,
            referral_yaps: 0,
            yaps_l24h: self.yaps_l24h,
            x_index: 0.0,
            x_index_change_24h: 0.0,
            yap_change_24h: 0,
            followers: 0,
            smart_followers: 0,
            smart_percentage: 0.0,
            rank: 0,
        }
    }
}
