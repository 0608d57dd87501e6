use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of yap activity. The first point of a series always
/// carries zero deltas.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YapDataPoint {
    pub date: NaiveDate,
    pub count: u64,
    pub change_from_previous: i64,
    pub change_percentage: f64,
}
