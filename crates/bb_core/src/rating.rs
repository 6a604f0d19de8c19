//! Team rating derivation (§4.3): folds per-player minutes, fatigue, star
//! boost, and coverage/empty-minutes penalties into a single `{overall, off,
//! def}` rating per game.

use crate::efficiency::{
    coverage_penalty, empty_minutes_penalty, fatigue_penalty, scale_to_range, star_boost,
    Channel, StarCandidate,
};
use crate::models::{MinutesAllocation, Team, TeamRating};

fn channel_rating(player: &crate::models::Player, channel: Channel) -> f64 {
    match channel {
        Channel::Overall => player.overall as f64,
        Channel::Off => player.off_rating as f64,
        Channel::Def => player.def_rating as f64,
    }
}

fn derive_channel(team: &Team, minutes: &MinutesAllocation, channel: Channel) -> f64 {
    let played: Vec<_> = team
        .players
        .iter()
        .map(|p| (p, minutes.minutes_for(&p.name) as f64))
        .filter(|(_, m)| *m > 0.0)
        .collect();

    if played.is_empty() {
        return 25.0;
    }

    let mut wavg = 0.0;
    let mut candidates = Vec::with_capacity(played.len());
    for (p, m) in &played {
        let eff = channel_rating(p, channel) * fatigue_penalty(*m, p.stamina as f64);
        wavg += (m / 240.0) * eff;
        candidates.push(StarCandidate {
            effective_rating: eff,
            overall: p.overall as f64,
            minutes: *m,
        });
    }

    let boost = star_boost(&candidates, channel);

    let mut positional_minutes = Vec::new();
    for (p, m) in &played {
        positional_minutes.push((p.pos, *m));
        if let Some(sec) = p.secondary_pos {
            if sec != p.pos {
                positional_minutes.push((sec, 0.2 * *m));
            }
        }
    }
    let cov = coverage_penalty(&positional_minutes);

    let total_played: f64 = played.iter().map(|(_, m)| *m).sum();
    let empty = empty_minutes_penalty(total_played);

    let raw = wavg + boost - cov - empty;
    scale_to_range(raw)
}

/// Derive a team's `{overall, off, def}` rating for one game from its
/// roster and the minutes allocated for that game.
pub fn compute_team_rating(team: &Team, minutes: &MinutesAllocation) -> TeamRating {
    TeamRating {
        overall: derive_channel(team, minutes, Channel::Overall).round() as i32,
        off: derive_channel(team, minutes, Channel::Off).round() as i32,
        def: derive_channel(team, minutes, Channel::Def).round() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::ATTR_COUNT;
    use crate::models::{Player, Position};
    use std::collections::HashMap;

    fn make_player(name: &str, pos: Position, overall: i32) -> Player {
        Player {
            name: name.into(),
            pos,
            secondary_pos: None,
            age: 25,
            stamina: 80,
            overall,
            off_rating: overall,
            def_rating: overall,
            scoring_rating: overall as f64,
            attrs: [overall; ATTR_COUNT],
            potential: None,
            dev_trait: None,
            birth_month: None,
            birth_day: None,
            last_birthday_year: None,
        }
    }

    #[test]
    fn rating_in_range() {
        let players = vec![
            make_player("A", Position::PG, 80),
            make_player("B", Position::SG, 80),
            make_player("C", Position::SF, 80),
            make_player("D", Position::PF, 80),
            make_player("E", Position::C, 80),
        ];
        let team = Team { name: "T".into(), players };
        let mut minutes = HashMap::new();
        for n in ["A", "B", "C", "D", "E"] {
            minutes.insert(n.to_string(), 48);
        }
        let alloc = MinutesAllocation { minutes };
        let r = compute_team_rating(&team, &alloc);
        assert!((25..=99).contains(&r.overall));
        assert!((25..=99).contains(&r.off));
        assert!((25..=99).contains(&r.def));
    }

    #[test]
    fn star_player_lifts_rating() {
        let mut players = vec![
            make_player("Star", Position::PG, 95),
            make_player("B", Position::SG, 75),
            make_player("C", Position::SF, 75),
            make_player("D", Position::PF, 75),
            make_player("E", Position::C, 75),
        ];
        let team_star = Team { name: "T".into(), players: players.clone() };
        players[0].overall = 75;
        players[0].off_rating = 75;
        players[0].def_rating = 75;
        let team_flat = Team { name: "T".into(), players };

        let mut minutes = HashMap::new();
        for n in ["Star", "B", "C", "D", "E"] {
            minutes.insert(n.to_string(), 48);
        }
        let alloc = MinutesAllocation { minutes };

        let with_star = compute_team_rating(&team_star, &alloc);
        let without_star = compute_team_rating(&team_flat, &alloc);
        assert!(with_star.overall >= without_star.overall);
    }
}
