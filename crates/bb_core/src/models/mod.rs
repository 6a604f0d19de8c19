pub mod game;
pub mod player;
pub mod season;
pub mod team;

pub use game::{BoxLine, GameResult, MinutesAllocation, TeamRating};
pub use player::{DevTrait, Player, Position};
pub use season::{Standing, SeasonAggregate};
pub use team::Team;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level league container: conferences of teams, loaded from and saved
/// to the roster JSON (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    pub conferences: HashMap<String, Vec<Team>>,
    #[serde(default)]
    pub season_year: Option<i32>,
}

impl League {
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.conferences.values().flatten()
    }

    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.conferences.values_mut().flatten()
    }
}
