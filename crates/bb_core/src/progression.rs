//! Progression (§4.11): end-of-season aging and attribute growth/decay
//! driven by age curve, development trait, potential, minutes played, and
//! recent production.

use std::collections::HashMap;

use chrono::Datelike;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::curves::{clamp, stoch_round};
use crate::models::player::ATTR_COUNT;
use crate::models::{League, Player, SeasonAggregate};
use crate::season_driver::SimSettings;

const AGE_CURVE: &[(f64, f64)] = &[
    (18.0, 1.60),
    (19.0, 1.50),
    (20.0, 1.35),
    (21.0, 1.20),
    (22.0, 1.00),
    (23.0, 0.90),
    (24.0, 0.75),
    (25.0, 0.60),
    (26.0, 0.40),
    (27.0, 0.20),
    (28.0, 0.10),
    (29.0, 0.05),
    (30.0, -0.20),
    (31.0, -0.35),
    (32.0, -0.50),
    (33.0, -0.65),
    (34.0, -0.80),
    (35.0, -0.95),
    (36.0, -1.10),
    (37.0, -1.25),
    (38.0, -1.40),
    (39.0, -1.55),
    (40.0, -1.70),
];

const POTENTIAL_SCALE: f64 = 0.060;
const MINUTES_CAP_MPG: f64 = 30.0;
const MINUTES_MIN_MPG: f64 = 5.0;
const NOISE_SIGMA: f64 = 0.20;
const MAX_ABS_DELTA_PER_ATTR: f64 = 6.0;

fn age_curve(age: i32) -> f64 {
    crate::curves::interp(AGE_CURVE, age as f64)
}

fn min_factor(mpg: Option<f64>) -> f64 {
    match mpg {
        None => 1.0,
        Some(m) if m <= MINUTES_MIN_MPG => 0.15,
        Some(m) if m >= MINUTES_CAP_MPG => 1.0,
        Some(m) => crate::curves::lerp(
            0.15,
            1.0,
            (m - MINUTES_MIN_MPG) / (MINUTES_CAP_MPG - MINUTES_MIN_MPG),
        ),
    }
}

fn prod_factor(agg: &SeasonAggregate) -> f64 {
    let raw = agg.ppg() + 1.5 * agg.apg() + 1.2 * agg.rpg() + 3.0 * agg.spg() + 3.0 * agg.bpg() - 20.0;
    clamp(1.0 + raw / 400.0, 0.95, 1.05)
}

/// Per-player attribute and rating deltas applied by one progression pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionDelta {
    pub player: String,
    pub attr_deltas: [i32; ATTR_COUNT],
    pub overall_delta: i32,
    pub off_rating_delta: i32,
    pub def_rating_delta: i32,
    pub stamina_delta: i32,
    pub scoring_rating_delta: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionDeltas {
    pub deltas: Vec<ProgressionDelta>,
}

fn base_delta(player: &Player, agg: Option<&SeasonAggregate>, rng: &mut impl Rng) -> f64 {
    let base = age_curve(player.age);
    let trait_mult = player.dev_trait.unwrap_or_default().multiplier();
    let potential = player.potential.unwrap_or(50) as f64;
    let dev_mult = trait_mult * (1.0 + (potential - 50.0) * POTENTIAL_SCALE);
    let mf = min_factor(agg.map(|a| a.mpg()));
    let pf = agg.map(prod_factor).unwrap_or(1.0);
    let noise = StandardNormal.sample::<f64, _>(rng) * NOISE_SIGMA;
    base * dev_mult * mf * pf * (1.0 + noise)
}

fn apply_age_multiplier(delta: f64, age: i32, cap: f64) -> f64 {
    let age_mult = if age >= 30 { 1.15 } else { 1.00 };
    clamp(delta * age_mult, -cap, cap)
}

/// Apply progression to a single player, returning its per-attribute and
/// per-rating deltas. `player` is mutated in place.
pub fn progress_player(
    player: &mut Player,
    agg: Option<&SeasonAggregate>,
    rng: &mut impl Rng,
) -> ProgressionDelta {
    let raw = base_delta(player, agg, rng);

    let mut attr_deltas = [0i32; ATTR_COUNT];
    for (i, a) in player.attrs.iter_mut().enumerate() {
        let d = apply_age_multiplier(raw, player.age, MAX_ABS_DELTA_PER_ATTR);
        let new = stoch_round(rng, *a as f64 + d) as i32;
        let new = clamp(new as f64, 25.0, 99.0) as i32;
        attr_deltas[i] = new - *a;
        *a = new;
    }

    let overall_delta = nudge_int(&mut player.overall, raw * 0.35, 4.0, rng, 25.0, 99.0);
    let off_delta = nudge_int(&mut player.off_rating, raw * 0.35, 4.0, rng, 25.0, 99.0);
    let def_delta = nudge_int(&mut player.def_rating, raw * 0.35, 4.0, rng, 25.0, 99.0);
    let stamina_delta = nudge_int(&mut player.stamina, raw * 0.50, 4.0, rng, 25.0, 99.0);

    let scoring_before = player.scoring_rating;
    let scoring_d = clamp(raw * 0.25, -4.0, 4.0);
    player.scoring_rating = clamp(player.scoring_rating + scoring_d, 0.0, 100.0);
    let scoring_rating_delta = player.scoring_rating - scoring_before;

    ProgressionDelta {
        player: player.name.clone(),
        attr_deltas,
        overall_delta,
        off_rating_delta: off_delta,
        def_rating_delta: def_delta,
        stamina_delta,
        scoring_rating_delta,
    }
}

fn nudge_int(field: &mut i32, raw_delta: f64, cap: f64, rng: &mut impl Rng, lo: f64, hi: f64) -> i32 {
    let before = *field;
    let d = clamp(raw_delta, -cap, cap);
    let new = stoch_round(rng, *field as f64 + d) as i32;
    *field = clamp(new as f64, lo, hi) as i32;
    *field - before
}

/// Age every player by one year, called once at `current_date` (the point
/// in `year` at which end-of-season progression runs), guarded by
/// `lastBirthdayYear` so repeated calls within the same offseason are
/// idempotent. A player with a real birthday (valid `birthMonth`/
/// `birthDay`) ages once `current_date` has reached or passed that date
/// within `year`; a player with no real birthday on file always ages, since
/// this call is itself the once-per-season aging event.
pub fn age_players(league: &mut League, current_date: chrono::NaiveDate, year: i32) {
    let today = (current_date.month() as i32, current_date.day() as i32);
    for player in league.teams_mut().flat_map(|t| t.players.iter_mut()) {
        if player.last_birthday_year == Some(year) {
            continue;
        }
        if player.has_real_birthday() {
            let birthday = (player.birth_month.unwrap(), player.birth_day.unwrap());
            if today >= birthday {
                player.age += 1;
                player.last_birthday_year = Some(year);
            }
        } else {
            player.age += 1;
            player.last_birthday_year = Some(year);
        }
    }
}

/// Run a full end-of-season progression pass over `league`, using
/// `aggregates` keyed as in [`crate::season_driver::SeasonReport`]
/// (`"{team}::{player}"`).
pub fn apply_end_of_season(
    league: &mut League,
    aggregates: &HashMap<String, SeasonAggregate>,
    _settings: &SimSettings,
    seed: u64,
    year: i32,
) -> ProgressionDeltas {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

    age_players(league, chrono::NaiveDate::from_ymd_opt(year, 12, 31).unwrap(), year);

    let mut deltas = Vec::new();
    for team in league.teams_mut() {
        let team_name = team.name.clone();
        for player in team.players.iter_mut() {
            let key = format!("{}::{}", team_name, player.name);
            let agg = aggregates.get(&key);
            deltas.push(progress_player(player, agg, &mut rng));
        }
    }
    ProgressionDeltas { deltas }
}
