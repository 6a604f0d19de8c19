//! Roster load + validation (§4.12, §6, §7). Never coerces or clamps
//! malformed input — violations are reported as `BbError::InvalidRoster`
//! (or a more specific variant) describing the offending player/team.

use std::path::Path;

use crate::error::{BbError, Result};
use crate::models::player::ATTR_COUNT;
use crate::models::{League, Player};

fn validate_rating(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value < min || value > max {
        return Err(BbError::RatingOutOfRange { field: field.to_string(), value, min, max });
    }
    Ok(())
}

fn validate_player(team: &str, player: &Player) -> Result<()> {
    if player.name.trim().is_empty() {
        return Err(BbError::InvalidRoster(format!("team {team} has a player with an empty name")));
    }
    if player.attrs.len() != ATTR_COUNT {
        return Err(BbError::InvalidAttributes {
            player: player.name.clone(),
            reason: format!("attrs.len() must be {ATTR_COUNT}, found {}", player.attrs.len()),
        });
    }
    for (i, a) in player.attrs.iter().enumerate() {
        validate_rating(&format!("{}.attrs[{i}]", player.name), *a as f64, 25.0, 99.0)?;
    }
    validate_rating(&format!("{}.overall", player.name), player.overall as f64, 25.0, 99.0)?;
    validate_rating(&format!("{}.offRating", player.name), player.off_rating as f64, 25.0, 99.0)?;
    validate_rating(&format!("{}.defRating", player.name), player.def_rating as f64, 25.0, 99.0)?;
    validate_rating(&format!("{}.stamina", player.name), player.stamina as f64, 25.0, 99.0)?;
    validate_rating(&format!("{}.scoringRating", player.name), player.scoring_rating, 0.0, 100.0)?;
    Ok(())
}

fn validate_league(league: &League) -> Result<()> {
    if league.conferences.is_empty() {
        return Err(BbError::InvalidRoster("roster has no conferences".into()));
    }
    for teams in league.conferences.values() {
        for team in teams {
            if team.name.trim().is_empty() {
                return Err(BbError::InvalidRoster("a team is missing a name".into()));
            }
            for player in &team.players {
                validate_player(&team.name, player)?;
            }
        }
    }
    Ok(())
}

/// Parse and validate the roster JSON shape documented in §6.
pub fn load_roster(path: impl AsRef<Path>) -> Result<League> {
    let bytes = std::fs::read(path)?;
    let league: League = serde_json::from_slice(&bytes)?;
    validate_league(&league)?;
    Ok(league)
}

/// Validate an already-parsed roster without touching the filesystem
/// (used by tests and by callers that construct a `League` in memory).
pub fn validate(league: &League) -> Result<()> {
    validate_league(league)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid_player(name: &str) -> Player {
        Player {
            name: name.into(),
            pos: crate::models::Position::PG,
            secondary_pos: None,
            age: 24,
            stamina: 80,
            overall: 80,
            off_rating: 80,
            def_rating: 80,
            scoring_rating: 80.0,
            attrs: [80; ATTR_COUNT],
            potential: Some(70),
            dev_trait: None,
            birth_month: None,
            birth_day: None,
            last_birthday_year: None,
        }
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut p = valid_player("A");
        p.overall = 200;
        let mut conferences = HashMap::new();
        conferences.insert("East".to_string(), vec![Team { name: "T".into(), players: vec![p] }]);
        let league = League { conferences, season_year: None };
        assert!(validate(&league).is_err());
    }

    #[test]
    fn accepts_valid_roster_round_trip() {
        let mut conferences = HashMap::new();
        conferences.insert(
            "East".to_string(),
            vec![Team { name: "T".into(), players: vec![valid_player("A"), valid_player("B")] }],
        );
        let league = League { conferences, season_year: Some(2026) };
        let json = serde_json::to_vec(&league).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&json).unwrap();
        let loaded = load_roster(file.path()).unwrap();
        assert_eq!(loaded.teams().count(), 1);
    }
}
