//! Lineup autocomplete (§4.4): picks a ~10-player rotation, distributes
//! minutes to maximize team overall rating, then assigns 5 starters to the
//! five positional slots.

use std::collections::HashMap;

use crate::models::{MinutesAllocation, Player, Position, Team};
use crate::rating::compute_team_rating;

const ROTATION_SIZE: usize = 10;
const SEED_MINUTES: i32 = 12;
const TOTAL_MINUTES: i32 = 240;

fn score(p: &Player) -> f64 {
    p.overall as f64 + 0.15 * (p.stamina as f64 - 70.0)
}

/// Autocomplete a full lineup (rotation + minutes + starters) for `team`.
pub fn autocomplete(team: &Team) -> MinutesAllocation {
    let rotation = select_rotation(team);
    let mut minutes: HashMap<String, i32> = rotation.iter().map(|p| (p.name.clone(), SEED_MINUTES)).collect();
    seed_remaining_minutes(&mut minutes, &rotation);
    hill_climb(team, &rotation, &mut minutes);
    MinutesAllocation { minutes }
}

pub fn select_rotation(team: &Team) -> Vec<&Player> {
    let mut by_score: Vec<&Player> = team.players.iter().collect();
    by_score.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(std::cmp::Ordering::Equal));

    let mut chosen: Vec<&Player> = Vec::new();
    let mut chosen_names: std::collections::HashSet<&str> = std::collections::HashSet::new();

    for pos in Position::ALL {
        if let Some(p) = by_score
            .iter()
            .find(|p| !chosen_names.contains(p.name.as_str()) && p.eligible_positions().contains(&pos))
        {
            chosen.push(p);
            chosen_names.insert(p.name.as_str());
        }
    }

    for p in &by_score {
        if chosen.len() >= ROTATION_SIZE {
            break;
        }
        if !chosen_names.contains(p.name.as_str()) {
            chosen.push(p);
            chosen_names.insert(p.name.as_str());
        }
    }

    chosen
}

fn seed_remaining_minutes(minutes: &mut HashMap<String, i32>, rotation: &[&Player]) {
    let n = rotation.len() as i32;
    if n == 0 {
        return;
    }
    let remaining = TOTAL_MINUTES - SEED_MINUTES * n;
    let mut idx = 0;
    let mut left = remaining;
    while left > 0 {
        let name = &rotation[idx % rotation.len()].name;
        *minutes.get_mut(name).unwrap() += 1;
        left -= 1;
        idx += 1;
    }
}

/// §4.4 step 4: move one minute a→b when it improves team overall, subject
/// to a's minutes > 12, b's minutes < 48, and b either already top-5 by
/// minutes or under 24 (prevents over-loading a single bench player).
fn hill_climb(team: &Team, rotation: &[&Player], minutes: &mut HashMap<String, i32>) {
    if rotation.len() < 2 {
        return;
    }
    let top5: std::collections::HashSet<String> = top_five_by_minutes(minutes);
    let mut current = compute_team_rating(team, &MinutesAllocation { minutes: minutes.clone() }).overall;

    for _ in 0..30 {
        let mut improved = false;
        for a in rotation {
            for b in rotation {
                if a.name == b.name {
                    continue;
                }
                let a_min = minutes[&a.name];
                let b_min = minutes[&b.name];
                if a_min <= SEED_MINUTES {
                    continue;
                }
                let b_eligible = b_min < TOTAL_MINUTES / 5 && (top5.contains(&b.name) || b_min < 24);
                if !b_eligible {
                    continue;
                }
                *minutes.get_mut(&a.name).unwrap() -= 1;
                *minutes.get_mut(&b.name).unwrap() += 1;
                let candidate =
                    compute_team_rating(team, &MinutesAllocation { minutes: minutes.clone() }).overall;
                if candidate > current {
                    current = candidate;
                    improved = true;
                } else {
                    *minutes.get_mut(&a.name).unwrap() += 1;
                    *minutes.get_mut(&b.name).unwrap() -= 1;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

fn top_five_by_minutes(minutes: &HashMap<String, i32>) -> std::collections::HashSet<String> {
    let mut v: Vec<(&String, &i32)> = minutes.iter().collect();
    v.sort_by(|a, b| b.1.cmp(a.1));
    v.into_iter().take(5).map(|(n, _)| n.clone()).collect()
}

/// Enumerate 5-subsets of the rotation and permutations onto the five
/// positional slots; bounded at `C(10,5) * 120 = 30240` candidates. Returns
/// the 5 starters in positional order (PG, SG, SF, PF, C).
pub fn assign_starters<'a>(rotation: &[&'a Player]) -> Vec<&'a Player> {
    if rotation.len() <= 5 {
        return rotation.to_vec();
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Option<[&Player; 5]> = None;

    for subset in combinations5(rotation) {
        for perm in permutations5(&subset) {
            if let Some(s) = evaluate_assignment(&perm) {
                if s > best_score {
                    best_score = s;
                    best = Some(perm);
                }
            }
        }
    }

    match best {
        Some(arr) => arr.to_vec(),
        None => {
            let mut by_overall: Vec<&Player> = rotation.to_vec();
            by_overall.sort_by(|a, b| b.overall.cmp(&a.overall));
            by_overall.into_iter().take(5).collect()
        }
    }
}

/// §4.4 step 6: order the full team roster as starters (positional order),
/// then remaining rotation players by minutes descending, then inactive
/// players.
pub fn order_roster<'a>(team: &'a Team, rotation: &[&'a Player], minutes: &MinutesAllocation) -> Vec<&'a Player> {
    let starters = assign_starters(rotation);
    let starter_names: std::collections::HashSet<&str> =
        starters.iter().map(|p| p.name.as_str()).collect();

    let mut bench: Vec<&Player> =
        rotation.iter().filter(|p| !starter_names.contains(p.name.as_str())).copied().collect();
    bench.sort_by(|a, b| minutes.minutes_for(&b.name).cmp(&minutes.minutes_for(&a.name)));

    let rotation_names: std::collections::HashSet<&str> =
        rotation.iter().map(|p| p.name.as_str()).collect();
    let inactive: Vec<&Player> =
        team.players.iter().filter(|p| !rotation_names.contains(p.name.as_str())).collect();

    starters.into_iter().chain(bench).chain(inactive).collect()
}

fn evaluate_assignment(perm: &[&Player; 5]) -> Option<f64> {
    let mut total_overall = 0.0;
    let mut primary_matches = 0;
    let mut secondary_uses = 0;
    for (slot, player) in Position::ALL.iter().zip(perm.iter()) {
        if player.pos == *slot {
            primary_matches += 1;
        } else if player.secondary_pos == Some(*slot) {
            secondary_uses += 1;
        } else {
            return None;
        }
        total_overall += player.overall as f64;
    }
    let avg_overall = total_overall / 5.0;
    Some(avg_overall + 0.02 * primary_matches as f64 - 0.01 * secondary_uses as f64)
}

fn combinations5<'a>(items: &[&'a Player]) -> Vec<Vec<&'a Player>> {
    let n = items.len();
    let mut result = Vec::new();
    if n < 5 {
        return result;
    }
    let mut idx = [0usize; 5];
    for i in 0..5 {
        idx[i] = i;
    }
    loop {
        result.push(idx.iter().map(|&i| items[i]).collect());
        let mut i = 4;
        loop {
            if idx[i] < n - 5 + i {
                idx[i] += 1;
                for j in (i + 1)..5 {
                    idx[j] = idx[j - 1] + 1;
                }
                break;
            }
            if i == 0 {
                return result;
            }
            i -= 1;
        }
    }
}

fn permutations5<'a>(items: &[&'a Player]) -> Vec<[&'a Player; 5]> {
    let mut result = Vec::new();
    let mut indices = [0, 1, 2, 3, 4];
    heap_permute(&mut indices, 5, &mut |perm| {
        result.push([items[perm[0]], items[perm[1]], items[perm[2]], items[perm[3]], items[perm[4]]]);
    });
    result
}

fn heap_permute(arr: &mut [usize; 5], k: usize, visit: &mut impl FnMut(&[usize; 5])) {
    if k == 1 {
        visit(arr);
        return;
    }
    for i in 0..k {
        heap_permute(arr, k - 1, visit);
        if k % 2 == 0 {
            arr.swap(i, k - 1);
        } else {
            arr.swap(0, k - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::ATTR_COUNT;

    fn make_player(name: &str, pos: Position, secondary: Option<Position>, overall: i32) -> Player {
        Player {
            name: name.into(),
            pos,
            secondary_pos: secondary,
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
    fn autocomplete_allocates_full_minutes() {
        let players: Vec<Player> = Position::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| make_player(&format!("P{i}"), *p, None, 75))
            .chain((0..7).map(|i| make_player(&format!("Bench{i}"), Position::SF, None, 65)))
            .collect();
        let team = Team { name: "T".into(), players };
        let alloc = autocomplete(&team);
        assert_eq!(alloc.total(), TOTAL_MINUTES);
    }

    #[test]
    fn combinations5_count_for_ten_items() {
        let players: Vec<Player> = (0..10).map(|i| make_player(&format!("P{i}"), Position::PG, None, 70)).collect();
        let refs: Vec<&Player> = players.iter().collect();
        let combos = combinations5(&refs);
        assert_eq!(combos.len(), 252);
    }
}
