//! Efficiency model (§4.2): fatigue, positional coverage, empty-minutes,
//! and star-boost adjustments that feed team rating derivation (C3).
//!
//! Constants are taken verbatim from the reference `efficiency.py` model.

use crate::curves::clamp;
use crate::models::Position;

const STAR_K_OVERALL: f64 = 1.22;
const STAR_K_OFF: f64 = 1.20;
const STAR_K_DEF: f64 = 1.20;

const TR_COV_ALPHA: f64 = 15.0;
const TR_OVERPOS_MAXPT: f64 = 6.0;
const TR_EMPTY_MIN_PTS: f64 = 35.0;

/// Minutes threshold past which a player's rating starts to decay, as a
/// function of their stamina.
pub fn fatigue_threshold(stamina: f64) -> f64 {
    0.359 * stamina + 2.46
}

/// Multiplicative rating penalty in `[0.68, 1.0]` for playing `minutes`
/// beyond the stamina-scaled threshold.
pub fn fatigue_penalty(minutes: f64, stamina: f64) -> f64 {
    let threshold = fatigue_threshold(stamina);
    let over = (minutes - threshold).max(0.0);
    (1.0 - 0.010 * over).max(0.68)
}

/// Channel a rating calculation applies to; determines which star-boost
/// exponent is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Overall,
    Off,
    Def,
}

impl Channel {
    fn star_k(self) -> f64 {
        match self {
            Channel::Overall => STAR_K_OVERALL,
            Channel::Off => STAR_K_OFF,
            Channel::Def => STAR_K_DEF,
        }
    }
}

/// Coverage penalty: loss from failing to cover all five positions for 48
/// minutes each (primary counts 100%, secondary 20%).
pub fn coverage_penalty(positional_minutes: &[(Position, f64)]) -> f64 {
    let mut p: std::collections::HashMap<Position, f64> = std::collections::HashMap::new();
    for pos in Position::ALL {
        p.insert(pos, 0.0);
    }
    for (pos, m) in positional_minutes {
        *p.entry(*pos).or_insert(0.0) += m;
    }
    let sum_abs_dev: f64 = Position::ALL.iter().map(|pos| (p[pos] - 48.0).abs()).sum();
    let max_p = Position::ALL.iter().map(|pos| p[pos]).fold(0.0_f64, f64::max);
    (sum_abs_dev / 240.0) * TR_COV_ALPHA + ((max_p - 48.0).max(0.0) / 192.0) * TR_OVERPOS_MAXPT
}

/// Empty-minutes penalty: loss for a team whose played minutes fall short
/// of a full game (`240` player-minutes across the floor).
pub fn empty_minutes_penalty(total_played_minutes: f64) -> f64 {
    if total_played_minutes >= 240.0 {
        0.0
    } else {
        TR_EMPTY_MIN_PTS * ((240.0 - total_played_minutes) / 240.0).powf(0.85)
    }
}

/// One candidate for star-boost consideration: effective rating in the
/// channel being scaled, raw `overall` (always used for the gap term), and
/// minutes played.
pub struct StarCandidate {
    pub effective_rating: f64,
    pub overall: f64,
    pub minutes: f64,
}

/// Additive team-rating bump contributed by up to the top two players by
/// `effective_rating` in `channel`.
pub fn star_boost(candidates: &[StarCandidate], channel: Channel) -> f64 {
    let mut sorted: Vec<&StarCandidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
        b.effective_rating.partial_cmp(&a.effective_rating).unwrap_or(std::cmp::Ordering::Equal)
    });
    let k = channel.star_k();
    let mut pull = 0.0;
    for c in sorted.into_iter().take(2) {
        let gap = (c.overall - 84.0).max(0.0);
        let share = (c.minutes / 240.0).max(0.0).powf(0.45);
        pull += gap.powf(k) * share;
    }
    pull.powf(0.85)
}

/// Scale a raw rating into the displayed `[25, 99]` range.
pub fn scale_to_range(raw: f64) -> f64 {
    clamp((raw - 75.0) * 1.30 + 75.0, 25.0, 99.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatigue_penalty_floor_is_068() {
        assert_eq!(fatigue_penalty(1000.0, 50.0), 0.68);
    }

    #[test]
    fn fatigue_penalty_no_overage_is_one() {
        assert_eq!(fatigue_penalty(10.0, 90.0), 1.0);
    }

    #[test]
    fn coverage_penalty_zero_when_perfectly_covered() {
        let pm: Vec<(Position, f64)> = Position::ALL.iter().map(|p| (*p, 48.0)).collect();
        assert!((coverage_penalty(&pm)).abs() < 1e-9);
    }

    #[test]
    fn empty_minutes_penalty_zero_when_full() {
        assert_eq!(empty_minutes_penalty(240.0), 0.0);
        assert!(empty_minutes_penalty(0.0) > 0.0);
    }

    #[test]
    fn scale_to_range_clamps() {
        assert_eq!(scale_to_range(1000.0), 99.0);
        assert_eq!(scale_to_range(-1000.0), 25.0);
    }

    #[test]
    fn star_boost_uses_raw_overall_for_gap() {
        let cands = vec![
            StarCandidate { effective_rating: 95.0, overall: 95.0, minutes: 36.0 },
            StarCandidate { effective_rating: 80.0, overall: 80.0, minutes: 30.0 },
        ];
        let boost = star_boost(&cands, Channel::Off);
        assert!(boost > 0.0);
    }
}
