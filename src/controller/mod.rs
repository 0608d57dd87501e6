pub mod leaderboard;
pub mod positions;
pub mod trades;
pub mod vault;
pub mod version;
pub mod wallet;
pub mod yappers;
