use serde::{Deserialize, Serialize};

/// A player's position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub name: String,
    pub rank: u32,
    pub percentile: f64,
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
    pub games_played: u32
}
