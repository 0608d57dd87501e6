use serde::{Deserialize, Serialize};

use crate::model::{YapDataPoint, Yapper};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Rank,
    TotalYaps,
    XIndex,
    XIndexChange24h,
    Followers,
    SmartPercentage,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Assign dense ranks over descending total yaps. Ties share a rank
/// and keep their incoming order; the next distinct total takes the
/// next rank, without gaps. Called only when a roster has been
/// freshly fetched, never on per-request sorts.
pub fn assign_ranks(yappers: &mut [Yapper]) {
    yappers.sort_by(|a, b| b.total_yaps.cmp(&a.total_yaps));

    let mut rank = 0;
    let mut last_total = None;
    for yapper in yappers.iter_mut() {
        if last_total != Some(yapper.total_yaps) {
            rank += 1;
            last_total = Some(yapper.total_yaps);
        }
        yapper.rank = rank;
    }
}

/// Stable sort by the requested key. Ties keep their incoming order,
/// so equal values stay in roster (rank) order.
pub fn sort_roster(yappers: &mut [Yapper], key: SortKey, order: SortOrder) {
    yappers.sort_by(|a, b| {
        let ord = match key {
            SortKey::Rank => a.rank.cmp(&b.rank),
            SortKey::TotalYaps => a.total_yaps.cmp(&b.total_yaps),
            SortKey::XIndex => a.x_index.total_cmp(&b.x_index),
            SortKey::XIndexChange24h => {
                a.x_index_change_24h.total_cmp(&b.x_index_change_24h)
            },
            SortKey::Followers => a.followers.cmp(&b.followers),
            SortKey::SmartPercentage => {
                a.smart_percentage.total_cmp(&b.smart_percentage)
            },
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

/// Case-insensitive substring match over name or handle. Ranks on the
/// surviving entries are untouched.
pub fn filter_roster(yappers: &[Yapper], search: &str) -> Vec<Yapper> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return yappers.to_vec();
    }
    yappers
        .iter()
        .filter(|y| {
            y.name.to_lowercase().contains(&needle)
                || y.handle.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// 24h activity delta in yap counts: the difference of the last two
/// daily points, or the feed's own 24h figure when the series is too
/// short to difference.
pub fn yap_change_24h(history: &[YapDataPoint], yaps_l24h: f64) -> i64 {
    match history {
        [.., prev, last] => last.count as i64 - prev.count as i64,
        _ => yaps_l24h.round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::placeholder_roster;
    use chrono::NaiveDate;

    fn yapper(id: &str, total_yaps: u64) -> Yapper {
        Yapper {
            id: id.to_owned(),
            name: format!("Yapper {}", id),
            handle: format!("yapper_{}", id),
            avatar: None,
            total_yaps,
            earned_yaps: total_yaps,
            referral_yaps: 0,
            yaps_l24h: 0.0,
            x_index: 0.0,
            x_index_change_24h: 0.0,
            yap_change_24h: 0,
            followers: 0,
            smart_followers: 0,
            smart_percentage: 0.0,
            rank: 0,
        }
    }

    fn point(day: u32, count: u64) -> YapDataPoint {
        YapDataPoint {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            count,
            change_from_previous: 0,
            change_percentage: 0.0,
        }
    }

    #[test]
    fn test_assign_ranks_descending_totals() {
        let mut roster =
            vec![yapper("a", 335), yapper("b", 512), yapper("c", 353)];
        assign_ranks(&mut roster);

        let got: Vec<(u64, u32)> =
            roster.iter().map(|y| (y.total_yaps, y.rank)).collect();
        assert_eq!(got, vec![(512, 1), (353, 2), (335, 3)]);
    }

    #[test]
    fn test_assign_ranks_dense_on_ties() {
        let mut roster = vec![
            yapper("a", 512),
            yapper("b", 512),
            yapper("c", 353),
        ];
        assign_ranks(&mut roster);

        let ranks: Vec<u32> = roster.iter().map(|y| y.rank).collect();
        assert_eq!(ranks, vec![1, 1, 2]);
        // stable: the tied pair keeps fetch order
        assert_eq!(roster[0].id, "a");
        assert_eq!(roster[1].id, "b");
    }

    #[test]
    fn test_filter_preserves_ranks() {
        let mut roster = placeholder_roster();
        assign_ranks(&mut roster);

        let filtered = filter_roster(&roster, "hase");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].handle, "hosseeb");
        assert_eq!(filtered[0].rank, 1);
    }

    #[test]
    fn test_filter_matches_name_or_handle() {
        let roster = placeholder_roster();
        assert_eq!(filter_roster(&roster, "MONKE").len(), 1);
        assert_eq!(filter_roster(&roster, "donalt").len(), 1);
        assert_eq!(filter_roster(&roster, "").len(), roster.len());
        assert!(filter_roster(&roster, "nobody").is_empty());
    }

    #[test]
    fn test_sort_roster_by_x_index() {
        let mut roster = placeholder_roster();
        sort_roster(&mut roster, SortKey::XIndex, SortOrder::Desc);
        assert_eq!(roster[0].handle, "hosseeb");

        sort_roster(&mut roster, SortKey::XIndex, SortOrder::Asc);
        assert_eq!(roster[0].handle, "santiagoroel");
    }

    #[test]
    fn test_yap_change_from_last_two_points() {
        let history = vec![point(1, 10), point(2, 14), point(3, 11)];
        assert_eq!(yap_change_24h(&history, 99.0), -3);
    }

    #[test]
    fn test_yap_change_falls_back_to_feed() {
        assert_eq!(yap_change_24h(&[], 7.4), 7);
        assert_eq!(yap_change_24h(&[point(1, 10)], 7.6), 8);
    }
}
