//! Score generator (§4.5): produces a final score, quarter-by-quarter
//! split, and overtime periods from two teams' derived ratings, then
//! delegates to box synthesis (C7) for the per-player lines.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::box_score;
use crate::curves::clamp;
use crate::error::Result;
use crate::models::{GameResult, MinutesAllocation, Team, TeamRating};
use crate::percentile::LeagueContext;

const OFF_MEAN: f64 = 80.0;
const DEF_MEAN: f64 = 80.0;
const BASE_O: f64 = 110.5;
const OFF_COEF: f64 = 0.545;
const DEF_COEF: f64 = 0.61;
const MARG_PER_OVR: f64 = 0.26;
const STYLE_MARGIN_K: f64 = 0.20;
const TOTAL_SKEW_K: f64 = 0.42;

struct ScoreSample {
    home_final: i32,
    away_final: i32,
    quarters_home: Vec<i32>,
    quarters_away: Vec<i32>,
    ot_periods: i32,
}

fn expected_points(off: f64, opp_def: f64) -> f64 {
    BASE_O + OFF_COEF * (off - OFF_MEAN) - DEF_COEF * (opp_def - DEF_MEAN)
}

fn sample_game_score(rng: &mut impl Rng, a: &TeamRating, b: &TeamRating) -> ScoreSample {
    let mu_a = expected_points(a.off as f64, b.def as f64);
    let mu_b = expected_points(b.off as f64, a.def as f64);

    let pace = clamp(
        1.0 + 0.0029 * ((a.off + b.off) as f64 - 160.0) - 0.0032 * ((a.def + b.def) as f64 - 160.0),
        0.83,
        1.05,
    );
    let mu_total = (mu_a + mu_b) * pace;

    let mut m = MARG_PER_OVR * (a.overall - b.overall) as f64
        + STYLE_MARGIN_K * (((a.off - b.def) - (b.off - a.def)) as f64);
    let d = (a.overall - b.overall).unsigned_abs() as f64;
    m /= 1.0 + 0.018 * d;

    let favored = if a.overall >= b.overall { a } else { b };
    let skew = TOTAL_SKEW_K * ((favored.off as f64 - 80.0) - (favored.def as f64 - 80.0)) / 2.0;
    let mu_total = mu_total + skew;

    let sigma_margin = clamp(10.0 - 0.09 * d + 0.5 * (d - 18.0).max(0.0), 7.5, 13.5) * 0.75;
    let sigma_total = clamp(14.0 - 0.10 * d, 7.5, 11.0) * 0.75;

    let p_upset = clamp(0.015 + 0.05 * (-d / 12.0).exp(), 0.02, 0.055);
    let m = if rng.gen_bool(p_upset) {
        -m * (0.60 + 0.80 * rng.gen::<f64>())
    } else {
        m
    };

    let total = mu_total + StandardNormal.sample::<f64, _>(rng) * sigma_total;
    let margin = m + StandardNormal.sample::<f64, _>(rng) * sigma_margin;

    let home = clamp(((total + margin) / 2.0).round(), 85.0, 150.0);
    let away = clamp(total.round() - home, 85.0, 150.0);
    let home = home as i32;
    let away = away as i32;

    let (mut qh, mut qa, ot) = qsplit(rng, home, away);
    let mut ot_periods = ot;
    while qh.iter().sum::<i32>() == qa.iter().sum::<i32>() {
        let h_ot = clamp(StandardNormal.sample::<f64, _>(rng) * 3.0 + 12.0, 6.0, 22.0).round() as i32;
        let a_ot = clamp(StandardNormal.sample::<f64, _>(rng) * 3.0 + 12.0, 6.0, 22.0).round() as i32;
        qh.push(h_ot);
        qa.push(a_ot);
        ot_periods += 1;
    }

    let home_final: i32 = qh.iter().sum();
    let away_final: i32 = qa.iter().sum();

    ScoreSample { home_final, away_final, quarters_home: qh, quarters_away: qa, ot_periods }
}

fn sum4(q: &[i32]) -> i32 {
    q[..4.min(q.len())].iter().sum()
}

/// Split a team's final score into 4 quarters with weights in `[0.22,
/// 0.28]`, draining rounding drift into the 4th.
fn qsplit(rng: &mut impl Rng, home: i32, away: i32) -> (Vec<i32>, Vec<i32>, i32) {
    (split_one(rng, home), split_one(rng, away), 0)
}

fn split_one(rng: &mut impl Rng, total: i32) -> Vec<i32> {
    let weights: Vec<f64> = (0..4).map(|_| rng.gen_range(0.22..=0.28)).collect();
    let sum_w: f64 = weights.iter().sum();
    let mut quarters: Vec<i32> =
        weights.iter().map(|w| ((w / sum_w) * total as f64).floor() as i32).collect();
    let drift = total - quarters.iter().sum::<i32>();
    quarters[3] += drift;
    quarters
}

/// Simulate one full game between two teams given their autocompleted
/// minutes allocations. Delegates box-score synthesis to [`box_score`].
pub fn simulate_game(
    home: &Team,
    home_minutes: &MinutesAllocation,
    away: &Team,
    away_minutes: &MinutesAllocation,
    ctx: &LeagueContext,
    rng: &mut impl Rng,
) -> Result<GameResult> {
    let home_rating = crate::rating::compute_team_rating(home, home_minutes);
    let away_rating = crate::rating::compute_team_rating(away, away_minutes);

    let sample = sample_game_score(rng, &home_rating, &away_rating);

    let box_home = box_score::synthesize_box(
        home,
        home_minutes,
        sample.home_final,
        away,
        away_minutes,
        ctx,
        rng,
    )?;
    let box_away = box_score::synthesize_box(
        away,
        away_minutes,
        sample.away_final,
        home,
        home_minutes,
        ctx,
        rng,
    )?;

    Ok(GameResult {
        home_final: sample.home_final,
        away_final: sample.away_final,
        quarters_home: sample.quarters_home,
        quarters_away: sample.quarters_away,
        ot_periods: sample.ot_periods,
        box_home,
        box_away,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn scores_never_tie() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = TeamRating { overall: 85, off: 85, def: 85 };
        let b = TeamRating { overall: 80, off: 78, def: 82 };
        for _ in 0..20 {
            let s = sample_game_score(&mut rng, &a, &b);
            assert_ne!(s.home_final, s.away_final);
            assert_eq!(sum4(&s.quarters_home) + ot_sum(&s.quarters_home), s.home_final);
        }
    }

    fn ot_sum(q: &[i32]) -> i32 {
        q[4.min(q.len())..].iter().sum()
    }
}
