//! Awards (§4.10): MVP, DPOY, 6MOY, All-NBA, and Finals MVP, computed from
//! a season's frozen aggregates and standings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{SeasonAggregate, Standing};
use crate::season_driver::SimSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceEntry {
    pub player: String,
    pub team: String,
    pub score: f64,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwardRace {
    pub winner: Option<String>,
    pub race: Vec<RaceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwardsReport {
    pub mvp: AwardRace,
    pub dpoy: AwardRace,
    pub sixth_man: AwardRace,
    pub all_nba_first: Vec<String>,
    pub all_nba_second: Vec<String>,
    pub all_nba_third: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalsMvpReport {
    pub winner: Option<String>,
    pub race: Vec<RaceEntry>,
}

fn norm(v: f64, vmax: f64) -> f64 {
    if vmax <= 0.0 {
        0.0
    } else {
        crate::curves::clamp(v / vmax, 0.0, 1.0)
    }
}

fn norm_def(v: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        0.0
    } else {
        crate::curves::clamp((hi - v) / (hi - lo), 0.0, 1.0)
    }
}

/// Synthetic per-player defensive rating proxy: lower is better
/// defensively, scaled from opponent points allowed per game by the
/// player's team. Used only to feed `norm_def` in award formulas.
fn def_rating_proxy(agg: &SeasonAggregate, standings: &[Standing]) -> f64 {
    standings
        .iter()
        .find(|s| s.team == agg.team)
        .map(|s| if s.g > 0 { s.pa as f64 / s.g as f64 } else { 110.0 })
        .unwrap_or(110.0)
}

fn team_wins(agg: &SeasonAggregate, standings: &[Standing]) -> f64 {
    standings.iter().find(|s| s.team == agg.team).map(|s| s.w as f64).unwrap_or(0.0)
}

fn race_entry(agg: &SeasonAggregate, score: f64) -> RaceEntry {
    RaceEntry {
        player: agg.player.clone(),
        team: agg.team.clone(),
        score,
        ppg: agg.ppg(),
        rpg: agg.rpg(),
        apg: agg.apg(),
        spg: agg.spg(),
        bpg: agg.bpg(),
    }
}

fn eligible_pool<'a>(aggs: &'a [&'a SeasonAggregate], min_gp: i32) -> Vec<&'a SeasonAggregate> {
    let qualified: Vec<&SeasonAggregate> = aggs.iter().filter(|a| a.gp >= min_gp).copied().collect();
    if qualified.is_empty() {
        aggs.to_vec()
    } else {
        qualified
    }
}

fn top5(mut race: Vec<RaceEntry>) -> (Option<String>, Vec<RaceEntry>) {
    race.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    race.truncate(5);
    let winner = race.first().map(|r| r.player.clone());
    (winner, race)
}

/// Compute the full MVP/DPOY/6MOY/All-NBA report for a completed season.
pub fn compute_awards(
    aggregates: &[SeasonAggregate],
    standings: &[Standing],
    settings: &SimSettings,
) -> AwardsReport {
    let all: Vec<&SeasonAggregate> = aggregates.iter().collect();
    let pool = eligible_pool(&all, settings.award_min_gp);

    let max_ppg = pool.iter().map(|a| a.ppg()).fold(0.0_f64, f64::max).max(1.0);
    let max_apg = pool.iter().map(|a| a.apg()).fold(0.0_f64, f64::max).max(1.0);
    let max_rpg = pool.iter().map(|a| a.rpg()).fold(0.0_f64, f64::max).max(1.0);
    let max_spg = pool.iter().map(|a| a.spg()).fold(0.0_f64, f64::max).max(1.0);
    let max_bpg = pool.iter().map(|a| a.bpg()).fold(0.0_f64, f64::max).max(1.0);
    let max_wins = standings.iter().map(|s| s.w as f64).fold(0.0_f64, f64::max).max(1.0);
    let (def_lo, def_hi) = def_range(&pool, standings);

    let mvp_race: Vec<RaceEntry> = pool
        .iter()
        .map(|a| {
            let def = def_rating_proxy(a, standings);
            let score = 0.30 * norm(a.ppg(), max_ppg)
                + 0.15 * norm(a.apg(), max_apg)
                + 0.15 * norm(a.rpg(), max_rpg)
                + 0.20 * norm(team_wins(a, standings), max_wins)
                + 0.075 * norm(a.spg(), max_spg)
                + 0.075 * norm(a.bpg(), max_bpg)
                + 0.05 * norm_def(def, def_lo, def_hi);
            race_entry(a, score)
        })
        .collect();
    let (mvp_winner, mvp_top) = top5(mvp_race);

    let dpoy_race: Vec<RaceEntry> = pool
        .iter()
        .map(|a| {
            let def = def_rating_proxy(a, standings);
            let score = 0.35 * norm(a.spg(), max_spg)
                + 0.35 * norm(a.bpg(), max_bpg)
                + 0.20 * norm_def(def, def_lo, def_hi)
                + 0.10 * norm(team_wins(a, standings), max_wins);
            race_entry(a, score)
        })
        .collect();
    let (dpoy_winner, dpoy_top) = top5(dpoy_race);

    let sixth_pool: Vec<&SeasonAggregate> = all
        .iter()
        .filter(|a| {
            a.gp >= settings.award_min_gp
                && a.mpg() >= 14.0
                && (a.started as f64) <= 0.20 * a.gp as f64
                && (a.sixth as f64) >= (10.0_f64).max(0.25 * a.gp as f64)
        })
        .copied()
        .collect();
    let sixth_race: Vec<RaceEntry> = sixth_pool
        .iter()
        .map(|a| {
            let def = def_rating_proxy(a, standings);
            let score = 0.35 * norm(a.ppg(), max_ppg)
                + 0.20 * norm(a.apg(), max_apg)
                + 0.20 * norm(a.rpg(), max_rpg)
                + 0.10 * norm(a.spg(), max_spg)
                + 0.10 * norm(a.bpg(), max_bpg)
                + 0.05 * norm_def(def, def_lo, def_hi);
            race_entry(a, score)
        })
        .collect();
    let (sixth_winner, sixth_top) = top5(sixth_race);

    let mut all_nba: Vec<(f64, String)> = all
        .iter()
        .map(|a| (1.0 * a.ppg() + 0.7 * a.apg() + 0.5 * a.rpg(), a.player.clone()))
        .collect();
    all_nba.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let top15: Vec<String> = all_nba.into_iter().take(15).map(|(_, n)| n).collect();
    let all_nba_first = top15.get(0..5).unwrap_or(&[]).to_vec();
    let all_nba_second = top15.get(5..10).unwrap_or(&[]).to_vec();
    let all_nba_third = top15.get(10..15).unwrap_or(&[]).to_vec();

    AwardsReport {
        mvp: AwardRace { winner: mvp_winner, race: mvp_top },
        dpoy: AwardRace { winner: dpoy_winner, race: dpoy_top },
        sixth_man: AwardRace { winner: sixth_winner, race: sixth_top },
        all_nba_first,
        all_nba_second,
        all_nba_third,
    }
}

fn def_range(pool: &[&SeasonAggregate], standings: &[Standing]) -> (f64, f64) {
    let vals: Vec<f64> = pool.iter().map(|a| def_rating_proxy(a, standings)).collect();
    let lo = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        (95.0, 115.0)
    } else {
        (lo, hi)
    }
}

/// Finals MVP: restrict the pool to the championship team, then rank by
/// the same weighted formula as 6MOY (minus role-eligibility gates).
pub fn compute_finals_mvp(aggregates: &[SeasonAggregate], champion: &str) -> FinalsMvpReport {
    let pool: Vec<&SeasonAggregate> = aggregates.iter().filter(|a| a.team == champion).collect();
    if pool.is_empty() {
        return FinalsMvpReport::default();
    }
    let max_ppg = pool.iter().map(|a| a.ppg()).fold(0.0_f64, f64::max).max(1.0);
    let max_apg = pool.iter().map(|a| a.apg()).fold(0.0_f64, f64::max).max(1.0);
    let max_rpg = pool.iter().map(|a| a.rpg()).fold(0.0_f64, f64::max).max(1.0);
    let max_spg = pool.iter().map(|a| a.spg()).fold(0.0_f64, f64::max).max(1.0);
    let max_bpg = pool.iter().map(|a| a.bpg()).fold(0.0_f64, f64::max).max(1.0);

    let race: Vec<RaceEntry> = pool
        .iter()
        .map(|a| {
            let score = 0.35 * norm(a.ppg(), max_ppg)
                + 0.20 * norm(a.apg(), max_apg)
                + 0.20 * norm(a.rpg(), max_rpg)
                + 0.10 * norm(a.spg(), max_spg)
                + 0.10 * norm(a.bpg(), max_bpg);
            race_entry(a, score)
        })
        .collect();
    let (winner, top) = top5(race);
    FinalsMvpReport { winner, race: top }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeasonReportOutput {
    pub standings: Vec<Standing>,
    pub players: Vec<SeasonAggregate>,
    pub awards: AwardsReport,
    pub finals_mvp: FinalsMvpReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(player: &str, team: &str, gp: i32, pts: i32, wins: i32) -> (SeasonAggregate, Standing) {
        let mut a = SeasonAggregate::new(player, team);
        a.gp = gp;
        a.pts = pts;
        a.min = gp * 30;
        let mut s = Standing { team: team.to_string(), ..Default::default() };
        s.g = gp;
        s.w = wins;
        s.l = gp - wins;
        s.pf = (pts as i64) + 500;
        s.pa = 500;
        (a, s)
    }

    #[test]
    fn low_gp_player_never_wins_mvp() {
        let (low_gp_star, s1) = agg("Flash", "A", 5, 400, 4);
        let (steady, s2) = agg("Workhorse", "B", 70, 1800, 50);
        let settings = SimSettings::default();
        let report = compute_awards(&[low_gp_star, steady], &[s1, s2], &settings);
        assert_ne!(report.mvp.winner.as_deref(), Some("Flash"));
    }

    #[test]
    fn all_nba_falls_back_to_whole_pool_when_empty_eligible() {
        let (a, s) = agg("Rookie", "A", 2, 50, 1);
        let settings = SimSettings { award_min_gp: 40, ..SimSettings::default() };
        let report = compute_awards(&[a], &[s], &settings);
        assert!(report.mvp.winner.is_some());
    }
}
