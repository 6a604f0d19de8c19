//! Season driver (§4.9): round-robin scheduling across every unordered
//! team pair, `K` repetitions each, dispatched across a `rayon` thread pool
//! with deterministic per-work-item RNG seeding and a commutative merge of
//! partial standings/aggregates.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::Result;
use crate::models::{MinutesAllocation, SeasonAggregate, Standing, Team};
use crate::models::season::sort_standings;
use crate::percentile::LeagueContext;
use crate::{lineup, score};

/// Tunables a deployment may override without recompiling; never read from
/// global/env state inside the simulation core (§3.1).
#[derive(Debug, Clone)]
pub struct SimSettings {
    pub repetitions: u32,
    pub n_retry: u32,
    pub base_seed: u64,
    pub award_min_gp: i32,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings { repetitions: 50, n_retry: 3, base_seed: 0, award_min_gp: 40 }
    }
}

#[derive(Debug, Default)]
pub struct SeasonReport {
    pub standings: Vec<Standing>,
    pub aggregates: HashMap<String, SeasonAggregate>,
}

fn seed_for(base: u64, pair_idx: usize, rep: usize) -> u64 {
    let mut h = base;
    h ^= (pair_idx as u64).wrapping_mul(0x9E3779B97F4A7C15);
    h ^= (rep as u64).wrapping_mul(0xC2B2AE3D27D4EB4F);
    h ^ h.rotate_left(17)
}

/// Run a full round-robin season across `teams`, `settings.repetitions`
/// times per unordered pair.
pub fn run_season(teams: &[Team], ctx: &LeagueContext, settings: &SimSettings) -> Result<SeasonReport> {
    let pairs: Vec<(usize, usize)> = (0..teams.len())
        .flat_map(|i| ((i + 1)..teams.len()).map(move |j| (i, j)))
        .collect();

    let work: Vec<(usize, usize, usize, usize)> = pairs
        .iter()
        .enumerate()
        .flat_map(|(pair_idx, &(i, j))| {
            (0..settings.repetitions as usize).map(move |rep| (pair_idx, i, j, rep))
        })
        .collect();

    let partials: Vec<(Standing, Standing, HashMap<String, SeasonAggregate>)> = work
        .par_iter()
        .map(|&(pair_idx, i, j, rep)| simulate_one(teams, i, j, pair_idx, rep, ctx, settings))
        .collect::<Result<Vec<_>>>()?;

    let mut standings_by_team: HashMap<String, Standing> = HashMap::new();
    let mut aggregates: HashMap<String, SeasonAggregate> = HashMap::new();

    for (home_standing, away_standing, game_aggs) in partials {
        merge_standing(&mut standings_by_team, home_standing);
        merge_standing(&mut standings_by_team, away_standing);
        for (key, agg) in game_aggs {
            aggregates.entry(key).or_insert_with(|| SeasonAggregate::new(&agg.player, &agg.team)).merge(&agg);
        }
    }

    let mut standings: Vec<Standing> = standings_by_team.into_values().collect();
    sort_standings(&mut standings);

    Ok(SeasonReport { standings, aggregates })
}

fn merge_standing(map: &mut HashMap<String, Standing>, s: Standing) {
    map.entry(s.team.clone()).or_insert_with(|| Standing { team: s.team.clone(), ..Default::default() }).merge(&s);
}

fn simulate_one(
    teams: &[Team],
    i: usize,
    j: usize,
    pair_idx: usize,
    rep: usize,
    ctx: &LeagueContext,
    settings: &SimSettings,
) -> Result<(Standing, Standing, HashMap<String, SeasonAggregate>)> {
    let home = &teams[i];
    let away = &teams[j];

    let mut last_err = None;
    for attempt in 0..=settings.n_retry {
        let seed = seed_for(settings.base_seed, pair_idx, rep).wrapping_add(attempt as u64 * 0xFFFF_FFFF);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let home_minutes = lineup::autocomplete(home);
        let away_minutes = lineup::autocomplete(away);
        match score::simulate_game(home, &home_minutes, away, &away_minutes, ctx, &mut rng) {
            Ok(result) => {
                return Ok(build_result(home, away, &home_minutes, &away_minutes, &result));
            }
            Err(e) if e.is_retryable() && attempt < settings.n_retry => {
                tracing::warn!(pair_idx, rep, attempt, error = %e, "game retry after invariant failure");
                last_err = Some(e);
                continue;
            }
            Err(e) => {
                tracing::error!(pair_idx, rep, error = %e, "game failed, dropping repetition");
                last_err = Some(e);
                break;
            }
        }
    }
    Err(last_err.expect("loop always assigns an error before exiting without success"))
}

fn build_result(
    home: &Team,
    away: &Team,
    home_minutes: &MinutesAllocation,
    away_minutes: &MinutesAllocation,
    result: &crate::models::GameResult,
) -> (Standing, Standing, HashMap<String, SeasonAggregate>) {
    let mut home_standing = Standing { team: home.name.clone(), g: 1, ..Default::default() };
    let mut away_standing = Standing { team: away.name.clone(), g: 1, ..Default::default() };
    home_standing.pf = result.home_final as i64;
    home_standing.pa = result.away_final as i64;
    away_standing.pf = result.away_final as i64;
    away_standing.pa = result.home_final as i64;
    if result.home_final > result.away_final {
        home_standing.w = 1;
        away_standing.l = 1;
    } else {
        away_standing.w = 1;
        home_standing.l = 1;
    }

    let starters_home = starters_for(home, home_minutes);
    let starters_away = starters_for(away, away_minutes);
    let sixth_home = sixth_man_for(home, home_minutes, &starters_home);
    let sixth_away = sixth_man_for(away, away_minutes, &starters_away);

    let mut aggs = HashMap::new();
    for (line, team_name, starters, sixth) in result
        .box_home
        .iter()
        .map(|l| (l, &home.name, &starters_home, &sixth_home))
        .chain(result.box_away.iter().map(|l| (l, &away.name, &starters_away, &sixth_away)))
    {
        if line.min <= 0 {
            // DNP: skip entirely so a player with no minutes all season
            // never gets an aggregate entry (keeps `aggregates.get` at
            // `None`, not a zero-`gp` placeholder).
            continue;
        }
        let key = format!("{}::{}", team_name, line.player);
        let entry = aggs.entry(key).or_insert_with(|| SeasonAggregate::new(&line.player, team_name));
        entry.gp += 1;
        entry.min += line.min;
        entry.pts += line.pts;
        entry.reb += line.reb;
        entry.ast += line.ast;
        entry.stl += line.stl;
        entry.blk += line.blk;
        entry.to += line.to;
        entry.pf += line.pf;
        entry.fgm += line.fgm;
        entry.fga += line.fga;
        entry.tpm += line.tpm;
        entry.tpa += line.tpa;
        entry.ftm += line.ftm;
        entry.fta += line.fta;
        if starters.contains(&line.player) {
            entry.started += 1;
        }
        if sixth.as_deref() == Some(line.player.as_str()) {
            entry.sixth += 1;
        }
    }

    (home_standing, away_standing, aggs)
}

fn starters_for(team: &Team, minutes: &MinutesAllocation) -> std::collections::HashSet<String> {
    let rotation = lineup::select_rotation(team);
    lineup::assign_starters(&rotation)
        .into_iter()
        .map(|p| p.name.clone())
        .filter(|n| minutes.minutes_for(n) > 0)
        .collect()
}

/// The highest-scoring bench player (first player off the bench by minutes)
/// qualifies as the "sixth man" candidate for a given game.
fn sixth_man_for(
    team: &Team,
    minutes: &MinutesAllocation,
    starters: &std::collections::HashSet<String>,
) -> Option<String> {
    let rotation = lineup::select_rotation(team);
    let mut bench: Vec<&crate::models::Player> =
        rotation.into_iter().filter(|p| !starters.contains(&p.name)).collect();
    bench.sort_by(|a, b| minutes.minutes_for(&b.name).cmp(&minutes.minutes_for(&a.name)));
    bench.first().map(|p| p.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::ATTR_COUNT;
    use crate::models::{Player, Position};

    fn make_team(name: &str, base_overall: i32) -> Team {
        let players = Position::ALL
            .iter()
            .enumerate()
            .map(|(i, pos)| Player {
                name: format!("{name}-{i}"),
                pos: *pos,
                secondary_pos: None,
                age: 26,
                stamina: 82,
                overall: base_overall,
                off_rating: base_overall,
                def_rating: base_overall,
                scoring_rating: base_overall as f64,
                attrs: [base_overall; ATTR_COUNT],
                potential: None,
                dev_trait: None,
                birth_month: None,
                birth_day: None,
                last_birthday_year: None,
            })
            .chain((0..5).map(|i| Player {
                name: format!("{name}-bench-{i}"),
                pos: Position::SF,
                secondary_pos: None,
                age: 24,
                stamina: 78,
                overall: base_overall - 10,
                off_rating: base_overall - 10,
                def_rating: base_overall - 10,
                scoring_rating: (base_overall - 10) as f64,
                attrs: [base_overall - 10; ATTR_COUNT],
                potential: None,
                dev_trait: None,
                birth_month: None,
                birth_day: None,
                last_birthday_year: None,
            }))
            .collect();
        Team { name: name.into(), players }
    }

    #[test]
    fn season_produces_standings_for_all_teams() {
        let teams = vec![make_team("Alpha", 82), make_team("Beta", 78), make_team("Gamma", 75)];
        let ctx = LeagueContext::build(teams.iter());
        let settings = SimSettings { repetitions: 2, n_retry: 1, base_seed: 7, award_min_gp: 1 };
        let report = run_season(&teams, &ctx, &settings).unwrap();
        assert_eq!(report.standings.len(), 3);
        let total_games: i32 = report.standings.iter().map(|s| s.g).sum();
        assert_eq!(total_games, 3 * 2 * 2);
    }
}
