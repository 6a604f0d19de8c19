//! Per-game result types: minutes allocation, derived team ratings, the
//! final box score, and the game result envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Minutes assigned to each player (by name) for one game. Must sum to
/// `240 + 25 * ot_periods` across the roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinutesAllocation {
    pub minutes: HashMap<String, i32>,
}

impl MinutesAllocation {
    pub fn minutes_for(&self, player: &str) -> i32 {
        self.minutes.get(player).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i32 {
        self.minutes.values().sum()
    }
}

/// Team rating derived for one game from (players, minutes).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeamRating {
    pub overall: i32,
    pub off: i32,
    pub def: i32,
}

/// One player's complete box-score line for a single game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxLine {
    pub player: String,
    pub min: i32,
    pub pts: i32,
    pub fgm: i32,
    pub fga: i32,
    pub tpm: i32,
    pub tpa: i32,
    pub ftm: i32,
    pub fta: i32,
    pub reb: i32,
    pub ast: i32,
    pub stl: i32,
    pub blk: i32,
    pub to: i32,
    pub pf: i32,
}

impl BoxLine {
    pub fn zero(player: impl Into<String>) -> Self {
        BoxLine { player: player.into(), ..Default::default() }
    }
}

/// Final result of one simulated game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub home_final: i32,
    pub away_final: i32,
    pub quarters_home: Vec<i32>,
    pub quarters_away: Vec<i32>,
    pub ot_periods: i32,
    pub box_home: Vec<BoxLine>,
    pub box_away: Vec<BoxLine>,
}
