//! Shot model (§4.6): given a player's shooting attributes and an exact
//! point total to reach, synthesizes a plausible `{FGM, FGA, 3PM, 3PA, FTM,
//! FTA}` line whose scoring sums to `target_pts` exactly.
//!
//! Constants and the overall algorithm are grounded on the reference
//! standalone shooting model, which this crate treats as authoritative over
//! a divergent inline variant found elsewhere in the reference sources (see
//! DESIGN.md).

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::curves::{clamp, interp};
use crate::error::{BbError, Result};
use crate::models::player::attr_idx;

const PP36_CURVE: &[(f64, f64)] = &[
    (60.0, 10.0),
    (65.0, 12.0),
    (70.0, 14.0),
    (75.0, 16.0),
    (80.0, 18.0),
    (82.0, 20.0),
    (85.0, 22.0),
    (88.0, 25.0),
    (90.0, 27.0),
    (92.0, 29.0),
    (95.0, 31.0),
    (97.0, 32.0),
    (99.0, 33.0),
];

const P3_CURVE: &[(f64, f64)] = &[(40.0, 0.01), (70.0, 0.30), (80.0, 0.36), (90.0, 0.40), (95.0, 0.42), (99.0, 0.44)];
const PMID_CURVE: &[(f64, f64)] = &[(40.0, 0.37), (70.0, 0.47), (90.0, 0.53), (99.0, 0.57)];
const PCLOSE_CURVE: &[(f64, f64)] = &[(40.0, 0.48), (70.0, 0.58), (85.0, 0.63), (99.0, 0.70)];
const LEAGUE_FT_AVG: f64 = 68.5;
const PFT_CURVE: &[(f64, f64)] = &[(0.0, 0.30), (25.0, 0.50), (LEAGUE_FT_AVG, 0.78), (99.0, 0.935)];

/// Per-36 scoring benchmark, informational only (the actual point total a
/// player must hit is supplied externally by box synthesis, §4.7 step 1).
pub fn pp36(off_rating: f64) -> f64 {
    interp(PP36_CURVE, off_rating)
}

fn p3(r: f64) -> f64 {
    if r < 40.0 {
        0.0
    } else {
        interp(P3_CURVE, r).min(0.46)
    }
}

fn p_mid(r: f64) -> f64 {
    if r < 40.0 {
        return 0.0;
    }
    let mut v = interp(PMID_CURVE, r);
    if (75.0..=88.0).contains(&r) {
        v *= 1.04;
    } else if r > 88.0 {
        v *= 1.015;
    }
    v.min(0.60)
}

fn p_close(r: f64) -> f64 {
    if r < 40.0 {
        return 0.48;
    }
    interp(PCLOSE_CURVE, r).min(0.75)
}

fn p_ft(r: f64) -> f64 {
    clamp(interp(PFT_CURVE, r), 0.0, 1.0)
}

/// `FTr`: free-throw attempt rate as a function of close-range shooting.
fn ftr(r_close: f64) -> f64 {
    clamp(0.12 + 0.25 * ((r_close - 50.0) / 50.0), 0.05, 0.45)
}

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct ShotLine {
    pub fgm: i32,
    pub fga: i32,
    pub tpm: i32,
    pub tpa: i32,
    pub ftm: i32,
    pub fta: i32,
    pub pts: i32,
}

struct ShotDistribution {
    f3: f64,
    f_mid: f64,
    f_close: f64,
}

fn shot_distribution(r3: f64, r_mid: f64, r_close: f64) -> ShotDistribution {
    let mut w3 = (r3 - 40.0).max(0.0) * 1.7;
    let mut w_mid = (r_mid - 40.0).max(0.0) * 0.8;
    let w_close = ((r_close - 50.0).max(1.0) + 18.0) * 0.95;

    if r3 <= 40.0 {
        w3 = 0.0;
    }
    if r_mid <= 40.0 {
        w_mid = 0.0;
    }

    let total = w3 + w_mid + w_close;
    let (mut f3, mut f_mid, f_close) = if total <= 0.0 {
        (0.0, 0.0, 1.0)
    } else {
        (w3 / total, w_mid / total, w_close / total)
    };

    if r_close >= 97.0 && r3 <= 75.0 && f3 > 0.15 {
        let slack = f3 - 0.15;
        f3 = 0.15;
        return ShotDistribution { f3, f_mid, f_close: f_close + slack };
    }

    ShotDistribution { f3, f_mid, f_close }
}

/// Reconciliation state machine (§9): `Expand -> Sample -> ReconcileUp /
/// ReconcileDown -> FtFallback -> Done`. Transition into `Done` only when
/// `pts == target_pts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconcileState {
    Sample,
    ReconcileUp,
    ReconcileDown,
    FtFallback,
    Done,
}

fn line_pts(three_m: i32, mid_m: i32, close_m: i32, ft_m: i32) -> i32 {
    2 * (mid_m + close_m) + 3 * three_m + ft_m
}

/// Synthesize a shot line for one player hitting `target_pts` exactly.
pub fn simulate_shot_line(
    rng: &mut impl Rng,
    player_name: &str,
    attrs: &[i32],
    off_rating: i32,
    minutes: i32,
    target_pts: i32,
) -> Result<ShotLine> {
    if attrs.len() < 4 {
        return Err(BbError::InvalidAttributes {
            player: player_name.to_string(),
            reason: "shot model requires attrs[0..=3] (3PT, mid, close, FT)".into(),
        });
    }
    let r3 = attrs[attr_idx::THREE_PT] as f64;
    let r_mid = attrs[attr_idx::MID_RANGE] as f64;
    let r_close = attrs[attr_idx::CLOSE_SHOT] as f64;
    let r_ft = attrs[attr_idx::FREE_THROW] as f64;
    let off = off_rating as f64;

    let _exp_pts = pp36(off) * minutes as f64 / 36.0;

    let dist = shot_distribution(r3, r_mid, r_close);
    let (p3v, pmidv, pclosev, pftv) = (p3(r3), p_mid(r_mid), p_close(r_close), p_ft(r_ft));

    let two_norm = (0.60 * r_close + 0.40 * r_mid - 75.0) / 18.0;
    let off_norm = (off - 78.0) / 20.0;
    let exp_pp_fga = clamp(1.28 + 0.12 * two_norm + 0.02 * off_norm, 1.00, 1.65);
    let e_noise = clamp(StandardNormal.sample(rng) * 0.08 + 1.0, 0.80, 1.20);

    let mut fga = {
        let raw = target_pts as f64 / (exp_pp_fga * e_noise);
        let jitter = clamp(StandardNormal.sample(rng) * 0.02 + 1.0, 0.5, 1.5);
        ((raw * jitter).floor() as i32).max(1)
    };

    let mut fta = compute_fta(fga, r_close, target_pts);

    // Expand (state 1): grow FGA until the theoretical max reachable score
    // can hit target_pts.
    let mut guard = 0;
    while guard < 100
        && fga < 80
        && max_reachable(fga, dist.f3, fta) < target_pts
    {
        fga += 1;
        fta = compute_fta(fga, r_close, target_pts);
        guard += 1;
    }

    let three_a = (fga as f64 * dist.f3).round() as i32;
    let mid_a = (fga as f64 * dist.f_mid).round() as i32;
    let close_a = (fga - three_a - mid_a).max(0);

    // Sample
    let mut three_m = crate::curves::binomial(rng, three_a.max(0) as u32, p3v) as i32;
    let mut mid_m = crate::curves::binomial(rng, mid_a.max(0) as u32, pmidv) as i32;
    let mut close_m = crate::curves::binomial(rng, close_a.max(0) as u32, pclosev) as i32;
    let mut ft_m = crate::curves::binomial(rng, fta.max(0) as u32, pftv) as i32;

    let mid_weight = if r_mid + r_close > 0.0 { r_mid / (r_mid + r_close) } else { 0.5 };

    let mut state = ReconcileState::Sample;
    let mut iters = 0u32;
    loop {
        if iters >= 200 {
            state = ReconcileState::FtFallback;
        }
        let pts = line_pts(three_m, mid_m, close_m, ft_m);
        let diff = target_pts - pts;
        state = match state {
            ReconcileState::Sample | ReconcileState::ReconcileUp if diff > 0 => {
                ReconcileState::ReconcileUp
            }
            ReconcileState::Sample | ReconcileState::ReconcileDown if diff < 0 => {
                ReconcileState::ReconcileDown
            }
            _ if diff == 0 => ReconcileState::Done,
            other => other,
        };

        match state {
            ReconcileState::Done => break,
            ReconcileState::FtFallback => {
                let pts = line_pts(three_m, mid_m, close_m, ft_m);
                let diff = target_pts - pts;
                if diff > 0 {
                    ft_m += diff;
                    fta += diff;
                } else if diff < 0 {
                    let mut remaining = -diff;
                    while remaining > 0 && ft_m > 0 {
                        ft_m -= 1;
                        remaining -= 1;
                    }
                    while remaining > 0 && close_m > 0 {
                        close_m -= 1;
                        remaining -= 2;
                    }
                    while remaining > 0 && mid_m > 0 {
                        mid_m -= 1;
                        remaining -= 2;
                    }
                    while remaining > 0 && three_m > 0 {
                        three_m -= 1;
                        remaining -= 3;
                    }
                    if remaining != 0 {
                        // Absorb any residual (rare, from odd overshoot) via FT.
                        ft_m = (ft_m - remaining).max(0);
                        fta = fta.max(ft_m);
                    }
                }
                break;
            }
            ReconcileState::ReconcileUp => {
                if diff >= 3 && three_m < three_a {
                    three_m += 1;
                } else if diff >= 2 && (mid_m < mid_a || close_m < close_a) {
                    let take_mid = mid_m < mid_a && (close_m >= close_a || rng.gen_bool(mid_weight));
                    if take_mid {
                        mid_m += 1;
                    } else {
                        close_m += 1;
                    }
                } else if ft_m < fta {
                    ft_m += 1;
                } else if diff == 1 && three_m < three_a && (mid_m > 0 || close_m > 0) {
                    // Only one point remains: convert a three into a two
                    // (net +1) instead of inflating FT attempts.
                    three_m += 1;
                    if mid_m > 0 && rng.gen_bool(mid_weight) {
                        mid_m -= 1;
                    } else if close_m > 0 {
                        close_m -= 1;
                    }
                } else {
                    fta += 1;
                    ft_m += 1;
                }
                iters += 1;
            }
            ReconcileState::ReconcileDown => {
                if ft_m > 0 {
                    ft_m -= 1;
                } else if diff == -1 && three_m > 0 && (mid_m < mid_a || close_m < close_a) {
                    // Only one point of overshoot: convert a two into a
                    // three (net -1) instead of stripping a whole make.
                    three_m -= 1;
                    if mid_m < mid_a && rng.gen_bool(mid_weight) {
                        mid_m += 1;
                    } else if close_m < close_a {
                        close_m += 1;
                    }
                } else if diff <= -3 && three_m > 0 {
                    three_m -= 1;
                } else if mid_m > 0 || close_m > 0 {
                    let take_mid = mid_m > 0 && (close_m == 0 || rng.gen_bool(mid_weight));
                    if take_mid {
                        mid_m -= 1;
                    } else {
                        close_m -= 1;
                    }
                } else {
                    break;
                }
                iters += 1;
            }
            ReconcileState::Sample => unreachable!(),
        }
    }

    let fgm = three_m + mid_m + close_m;
    let final_fga = three_a + mid_a + close_a;
    let pts = line_pts(three_m, mid_m, close_m, ft_m);
    if pts != target_pts {
        return Err(BbError::ReconciliationFailed { team: player_name.to_string(), iterations: iters });
    }

    Ok(ShotLine {
        fgm,
        fga: final_fga.max(fgm),
        tpm: three_m,
        tpa: three_a.max(three_m),
        ftm: ft_m,
        fta: fta.max(ft_m),
        pts,
    })
}

fn compute_fta(fga: i32, r_close: f64, target_pts: i32) -> i32 {
    let mut fta = (fga as f64 * ftr(r_close)).round() as i32;
    if fta % 2 == 1 && target_pts > 1 {
        fta += 1;
    }
    fta.max(0)
}

fn max_reachable(fga: i32, f3: f64, fta: i32) -> i32 {
    let three_a = (fga as f64 * f3).round() as i32;
    let two_a = fga - three_a;
    three_a * 3 + two_a * 2 + fta
}
