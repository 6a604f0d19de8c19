//! Player data model: positions, development traits, and the attribute
//! vector that drives every downstream calculator.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// The five closed positional slots. Order matters: it is also the starter
/// slot order used by lineup autocomplete (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const ALL: [Position; 5] =
        [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];
}

/// Development trajectory bucket applied as a multiplier during
/// progression (§4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Default)]
pub enum DevTrait {
    Bust,
    #[default]
    Normal,
    High,
    Star,
}

impl DevTrait {
    pub fn multiplier(self) -> f64 {
        match self {
            DevTrait::Bust => 0.80,
            DevTrait::Normal => 1.00,
            DevTrait::High => 1.15,
            DevTrait::Star => 1.30,
        }
    }
}

/// Stable attribute indices into [`Player::attrs`].
pub mod attr_idx {
    pub const THREE_PT: usize = 0;
    pub const MID_RANGE: usize = 1;
    pub const CLOSE_SHOT: usize = 2;
    pub const FREE_THROW: usize = 3;
    pub const BALL_HANDLING: usize = 4;
    pub const PASSING: usize = 5;
    pub const SPEED: usize = 6;
    pub const ATHLETICISM: usize = 7;
    pub const PERIMETER_DEFENSE: usize = 8;
    pub const INTERIOR_DEFENSE: usize = 9;
    pub const BLOCK: usize = 10;
    pub const STEAL: usize = 11;
    pub const REBOUNDING: usize = 12;
    pub const OFFENSIVE_IQ: usize = 13;
    pub const DEFENSIVE_IQ: usize = 14;
}

pub const ATTR_COUNT: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub pos: Position,
    #[serde(default)]
    pub secondary_pos: Option<Position>,
    pub age: i32,
    pub stamina: i32,
    pub overall: i32,
    pub off_rating: i32,
    pub def_rating: i32,
    pub scoring_rating: f64,
    pub attrs: [i32; ATTR_COUNT],

    #[serde(default)]
    pub potential: Option<i32>,
    #[serde(default)]
    pub dev_trait: Option<DevTrait>,
    #[serde(default)]
    pub birth_month: Option<i32>,
    #[serde(default)]
    pub birth_day: Option<i32>,
    #[serde(default)]
    pub last_birthday_year: Option<i32>,
}

impl Player {
    pub fn eligible_positions(&self) -> Vec<Position> {
        let mut v = vec![self.pos];
        if let Some(p) = self.secondary_pos {
            if p != self.pos {
                v.push(p);
            }
        }
        v
    }

    /// True when real-date birthday aging applies for this player (both
    /// `birthMonth`/`birthDay` set to valid calendar values).
    pub fn has_real_birthday(&self) -> bool {
        matches!(self.birth_month, Some(m) if (1..=12).contains(&m))
            && matches!(self.birth_day, Some(d) if (1..=31).contains(&d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_trait_multipliers() {
        assert_eq!(DevTrait::Bust.multiplier(), 0.80);
        assert_eq!(DevTrait::Star.multiplier(), 1.30);
    }

    #[test]
    fn eligible_positions_dedups_equal_secondary() {
        let p = Player {
            name: "T".into(),
            pos: Position::SG,
            secondary_pos: Some(Position::SG),
            age: 25,
            stamina: 80,
            overall: 80,
            off_rating: 80,
            def_rating: 80,
            scoring_rating: 80.0,
            attrs: [80; ATTR_COUNT],
            potential: None,
            dev_trait: None,
            birth_month: None,
            birth_day: None,
            last_birthday_year: None,
        };
        assert_eq!(p.eligible_positions(), vec![Position::SG]);
    }
}
