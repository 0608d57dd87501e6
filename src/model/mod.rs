mod placeholder;
mod position;
mod trade;
mod yap_history;
mod yapper;

pub use placeholder::placeholder_roster;
pub use position::{Position, PositionView, TradeQuote};
pub use trade::Trade;
pub use yap_history::YapDataPoint;
pub use yapper::Yapper;
