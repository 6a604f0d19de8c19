//! Box synthesis (§4.7): turns a team's final score and minutes allocation
//! into one [`BoxLine`] per player, reconciled so every counting stat sums
//! to its team target exactly.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::curves::{clamp, poisson};
use crate::error::Result;
use crate::models::player::attr_idx;
use crate::models::{BoxLine, MinutesAllocation, Player, Team};
use crate::percentile::LeagueContext;
use crate::shooting;

const BASE_TO: f64 = 14.3;
const BASE_PF: f64 = 20.8;

struct Active<'a> {
    player: &'a Player,
    minutes: i32,
}

fn build_active<'a>(team: &'a Team, minutes: &MinutesAllocation) -> (Vec<Active<'a>>, Vec<&'a Player>) {
    let (active, inactive): (Vec<&Player>, Vec<&Player>) =
        team.players.iter().partition(|p| minutes.minutes_for(&p.name) > 0);
    let active: Vec<Active> =
        active.into_iter().map(|p| Active { player: p, minutes: minutes.minutes_for(&p.name) }).collect();
    (active, inactive)
}

/// Synthesize the full box score for one team in one game. `opp_team` /
/// `opp_minutes` are the opponent's roster and allocation for the same
/// game, used to source the opposing team's average attributes in
/// `apply_turnovers`/`apply_fouls` (§4.7 step 4).
pub fn synthesize_box(
    team: &Team,
    minutes: &MinutesAllocation,
    team_final: i32,
    opp_team: &Team,
    opp_minutes: &MinutesAllocation,
    ctx: &LeagueContext,
    rng: &mut impl Rng,
) -> Result<Vec<BoxLine>> {
    let (active, inactive) = build_active(team, minutes);
    let (opp_active, _) = build_active(opp_team, opp_minutes);

    let targets = point_targets(&active, team_final, ctx, rng);

    let mut lines = Vec::with_capacity(team.players.len());
    for (i, a) in active.iter().enumerate() {
        let target = targets[i];
        let shot = shooting::simulate_shot_line(
            rng,
            &a.player.name,
            &a.player.attrs,
            a.player.off_rating,
            a.minutes,
            target,
        )?;

        let reb = rate_stat(rng, ctx.reb_per36(a.player.attrs[attr_idx::REBOUNDING] as f64), a.minutes, 0.5);
        let ast = rate_stat(rng, ctx.ast_per36(a.player.attrs[attr_idx::PASSING] as f64), a.minutes, 0.4);
        let stl = rate_stat(rng, ctx.stl_per36(a.player.attrs[attr_idx::STEAL] as f64), a.minutes, 0.3);
        let blk = rate_stat(rng, ctx.blk_per36(a.player.attrs[attr_idx::BLOCK] as f64), a.minutes, 0.2);

        lines.push(BoxLine {
            player: a.player.name.clone(),
            min: a.minutes,
            pts: shot.pts,
            fgm: shot.fgm,
            fga: shot.fga,
            tpm: shot.tpm,
            tpa: shot.tpa,
            ftm: shot.ftm,
            fta: shot.fta,
            reb,
            ast,
            stl,
            blk,
            to: 0,
            pf: 0,
        });
    }

    apply_turnovers(
        &mut lines,
        &active,
        team_avg_off_iq(&active),
        team_avg_overall(&active),
        team_avg_off_iq(&opp_active),
        team_avg_overall(&opp_active),
        rng,
    );
    apply_fouls(
        &mut lines,
        &active,
        team_avg_def_iq(&active),
        team_avg_def_iq(&opp_active),
        rng,
    );

    for p in inactive {
        lines.push(BoxLine::zero(p.name.clone()));
    }

    Ok(lines)
}

/// Per-36 rate stat sampled with Gaussian noise, clamped at zero.
fn rate_stat(rng: &mut impl Rng, per36: f64, minutes: i32, floor: f64) -> i32 {
    let expected = per36 * minutes as f64 / 36.0;
    let sigma = (floor.max(expected.sqrt() * 0.7)) * 1.35;
    let raw = expected + StandardNormal.sample::<f64, _>(rng) * sigma;
    raw.max(0.0).round() as i32
}

/// §4.7 step 1: per-player point targets, reconciled so their sum equals
/// `team_final` exactly.
fn point_targets(active: &[Active], team_final: i32, ctx: &LeagueContext, rng: &mut impl Rng) -> Vec<i32> {
    let mut targets: Vec<i32> = active
        .iter()
        .map(|a| {
            let exp = ctx.pts_per36(a.player.scoring_rating) * a.minutes as f64 / 36.0;
            let sigma = 1.2_f64.max(exp.sqrt() * 0.9);
            let raw = (exp + StandardNormal.sample::<f64, _>(rng) * sigma).max(0.0);
            raw.round() as i32
        })
        .collect();

    if targets.is_empty() {
        return targets;
    }

    let mut diff = team_final - targets.iter().sum::<i32>();
    let mut guard = 0;
    while diff != 0 && guard < 100_000 {
        let i = rng.gen_range(0..targets.len());
        if diff > 0 {
            targets[i] += 1;
            diff -= 1;
        } else if targets[i] > 0 {
            targets[i] -= 1;
            diff += 1;
        }
        guard += 1;
    }
    targets
}

fn team_avg_off_iq(active: &[Active]) -> f64 {
    avg(active, |p| p.attrs[attr_idx::OFFENSIVE_IQ] as f64)
}

fn team_avg_overall(active: &[Active]) -> f64 {
    avg(active, |p| p.overall as f64)
}

fn team_avg_def_iq(active: &[Active]) -> f64 {
    avg(active, |p| p.attrs[attr_idx::DEFENSIVE_IQ] as f64)
}

fn avg(active: &[Active], f: impl Fn(&Player) -> f64) -> f64 {
    if active.is_empty() {
        return 0.0;
    }
    active.iter().map(|a| f(a.player)).sum::<f64>() / active.len() as f64
}

fn is_guard(pos: crate::models::Position) -> bool {
    matches!(pos, crate::models::Position::PG | crate::models::Position::SG)
}

fn apply_turnovers(
    lines: &mut [BoxLine],
    active: &[Active],
    own_off_iq: f64,
    own_overall: f64,
    opp_off_iq: f64,
    opp_overall: f64,
    rng: &mut impl Rng,
) {
    if active.is_empty() {
        return;
    }
    // Per-player penalty compares a player against their own team's average
    // (§4.7 step 4's L_offIQ/L_overall); the team-level multiplier compares
    // the team to the opponent's average (tm_offIQ/tm_overall).
    let league_off_iq = own_off_iq;
    let league_overall = own_overall;

    let mut usage_order: Vec<usize> = (0..active.len()).collect();
    usage_order.sort_by(|&a, &b| lines[b].pts.cmp(&lines[a].pts));
    let top3: std::collections::HashSet<usize> = usage_order.into_iter().take(3).collect();

    for (i, a) in active.iter().enumerate() {
        let touches = lines[i].fga as f64 + 0.44 * lines[i].fta as f64 + 0.30 * lines[i].ast as f64;
        let guard_factor = if is_guard(a.player.pos) { 1.15 } else { 0.90 };
        let iq_step = if is_guard(a.player.pos) { 0.015 } else { 0.008 };
        let iq_pen = 1.0 + (league_off_iq - a.player.attrs[attr_idx::OFFENSIVE_IQ] as f64).max(0.0) * iq_step;
        let ov_pen = 1.0 + (league_overall - a.player.overall as f64).max(0.0) * 0.008;
        let lambda = clamp(guard_factor * iq_pen * ov_pen * touches / 8.0, 0.05, 5.0);
        let cap_extra = if top3.contains(&i) { 3 } else { 0 };
        let cap = (0.40 * touches).ceil().min((8 + cap_extra) as f64) as i32;
        let to = (poisson(rng, lambda) as i32).min(cap.max(0));
        lines[i].to = to;
    }

    let to_mult = clamp(
        1.0 + 0.25 * (league_off_iq - opp_off_iq) / 10.0 + 0.10 * (league_overall - opp_overall) / 10.0
            + StandardNormal.sample::<f64, _>(rng) * 0.07,
        0.75,
        1.40,
    );
    let team_target = (BASE_TO * to_mult).round() as i32;
    rebalance(lines, active, team_target, |l| l.to, |l, v| l.to = v, rng);
}

fn apply_fouls(lines: &mut [BoxLine], active: &[Active], own_def_iq: f64, opp_def_iq: f64, rng: &mut impl Rng) {
    if active.is_empty() {
        return;
    }
    let league_def_iq = own_def_iq;
    for (i, a) in active.iter().enumerate() {
        let pos_fac =
            if matches!(a.player.pos, crate::models::Position::PF | crate::models::Position::C) {
                1.20
            } else {
                0.90
            };
        let iq_pen = 1.0
            + (league_def_iq - a.player.attrs[attr_idx::DEFENSIVE_IQ] as f64).max(0.0) * 0.010;
        let lambda = clamp(pos_fac * iq_pen * (a.minutes as f64 / 36.0) * 2.8, 0.05, 4.5);
        let pf = (poisson(rng, lambda) as i32).min(6);
        lines[i].pf = pf;
    }

    let pf_mult = clamp(
        1.0 + 0.20 * (league_def_iq - opp_def_iq) / 10.0 + StandardNormal.sample::<f64, _>(rng) * 0.06,
        0.75,
        1.40,
    );
    let team_target = (BASE_PF * pf_mult).round() as i32;
    rebalance(lines, active, team_target, |l| l.pf, |l, v| l.pf = v, rng);
}

/// Nudge `field` (via `get`/`set`) per active player up or down by one until
/// the sum matches `target`, never pushing a player below zero.
fn rebalance(
    lines: &mut [BoxLine],
    active: &[Active],
    target: i32,
    get: impl Fn(&BoxLine) -> i32,
    set: impl Fn(&mut BoxLine, i32),
    rng: &mut impl Rng,
) {
    if active.is_empty() {
        return;
    }
    let n = active.len();
    let mut diff = target - lines.iter().take(n).map(&get).sum::<i32>();
    let cap_per_player = match target {
        t if t > 40 => 8,
        _ => 6,
    };
    let mut guard = 0;
    while diff != 0 && guard < 10_000 {
        let i = rng.gen_range(0..n);
        if diff > 0 && get(&lines[i]) < cap_per_player {
            set(&mut lines[i], get(&lines[i]) + 1);
            diff -= 1;
        } else if diff < 0 && get(&lines[i]) > 0 {
            set(&mut lines[i], get(&lines[i]) - 1);
            diff += 1;
        }
        guard += 1;
    }
}
