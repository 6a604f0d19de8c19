//! Season-long accumulation types: per-player aggregates and the standings
//! table.

use serde::{Deserialize, Serialize};

/// Running totals for one (player, team) pair across a season.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonAggregate {
    pub player: String,
    pub team: String,
    pub gp: i32,
    pub min: i32,
    pub pts: i32,
    pub reb: i32,
    pub ast: i32,
    pub stl: i32,
    pub blk: i32,
    pub to: i32,
    pub pf: i32,
    pub fgm: i32,
    pub fga: i32,
    pub tpm: i32,
    pub tpa: i32,
    pub ftm: i32,
    pub fta: i32,
    pub started: i32,
    pub sixth: i32,
}

impl SeasonAggregate {
    pub fn new(player: impl Into<String>, team: impl Into<String>) -> Self {
        SeasonAggregate { player: player.into(), team: team.into(), ..Default::default() }
    }

    pub fn ppg(&self) -> f64 {
        per_game(self.pts, self.gp)
    }
    pub fn rpg(&self) -> f64 {
        per_game(self.reb, self.gp)
    }
    pub fn apg(&self) -> f64 {
        per_game(self.ast, self.gp)
    }
    pub fn spg(&self) -> f64 {
        per_game(self.stl, self.gp)
    }
    pub fn bpg(&self) -> f64 {
        per_game(self.blk, self.gp)
    }
    pub fn mpg(&self) -> f64 {
        per_game(self.min, self.gp)
    }

    /// Merge another aggregate's totals into this one (commutative,
    /// associative — safe to use as a rayon fold/reduce operator).
    pub fn merge(&mut self, other: &SeasonAggregate) {
        self.gp += other.gp;
        self.min += other.min;
        self.pts += other.pts;
        self.reb += other.reb;
        self.ast += other.ast;
        self.stl += other.stl;
        self.blk += other.blk;
        self.to += other.to;
        self.pf += other.pf;
        self.fgm += other.fgm;
        self.fga += other.fga;
        self.tpm += other.tpm;
        self.tpa += other.tpa;
        self.ftm += other.ftm;
        self.fta += other.fta;
        self.started += other.started;
        self.sixth += other.sixth;
    }
}

fn per_game(total: i32, gp: i32) -> f64 {
    if gp <= 0 {
        0.0
    } else {
        total as f64 / gp as f64
    }
}

/// One team's win/loss/point-differential record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Standing {
    pub team: String,
    pub w: i32,
    pub l: i32,
    pub pf: i64,
    pub pa: i64,
    pub g: i32,
}

impl Standing {
    pub fn win_pct(&self) -> f64 {
        if self.g == 0 {
            0.0
        } else {
            self.w as f64 / self.g as f64
        }
    }

    pub fn point_diff(&self) -> i64 {
        self.pf - self.pa
    }

    pub fn merge(&mut self, other: &Standing) {
        self.w += other.w;
        self.l += other.l;
        self.pf += other.pf;
        self.pa += other.pa;
        self.g += other.g;
    }
}

/// Sort standings by win% descending, then point differential descending.
pub fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| {
        b.win_pct()
            .partial_cmp(&a.win_pct())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.point_diff().cmp(&a.point_diff()))
    });
}
