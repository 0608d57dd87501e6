mod history;
mod ranking;
mod valuation;

pub use history::{build_history, DEFAULT_WINDOW_DAYS};
pub use ranking::{
    assign_ranks, filter_roster, sort_roster, yap_change_24h, SortKey,
    SortOrder,
};
pub use valuation::{
    is_liquidatable, liquidation_price, pnl_abs, pnl_percentage,
    validate_open, Direction, MAINTENANCE_MARGIN,
};
