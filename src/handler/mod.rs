mod roster_refresher;

pub use roster_refresher::roster_refresher;
