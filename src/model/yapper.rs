use serde::{Deserialize, Serialize};

/// A tracked social account and its influence metrics. `rank` is
/// assigned on fetch by dense rank over `total_yaps`, not by the feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Yapper {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub avatar: Option<String>,
    pub total_yaps: u64,
    /// Decomposition of the total: yaps earned directly versus yaps
    /// credited through referrals. The parts track the total but the
    /// feed rounds them independently.
    pub earned_yaps: u64,
    pub referral_yaps: u64,
    pub yaps_l24h: f64,
    pub x_index: f64,
    pub x_index_change_24h: f64,
    /// Delta of the last two daily activity counts, in yaps. Distinct
    /// from `x_index_change_24h`, which is the index's own move.
    pub yap_change_24h: i64,
    pub followers: u64,
    pub smart_followers: u64,
    pub smart_percentage: f64,
    pub rank: u32,
}
