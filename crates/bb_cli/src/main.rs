//! CLI wrapper for the basketball league simulation engine.
//!
//! Exposes the engine's conceptual API (§6) as subcommands: simulate a
//! single game, run a full round-robin season, validate a roster file, or
//! apply end-of-season progression to one.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bb_core::models::MinutesAllocation;

#[derive(Parser)]
#[command(name = "bb_cli")]
#[command(about = "Basketball league simulation engine CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a roster JSON file against the league's input-shape rules.
    ValidateRoster {
        /// Input roster JSON path
        #[arg(long)]
        roster: PathBuf,
    },

    /// Simulate a single game between two teams drawn from a roster file.
    SimulateGame {
        /// Input roster JSON path
        #[arg(long)]
        roster: PathBuf,

        /// Home team name as it appears in the roster
        #[arg(long)]
        home: String,

        /// Away team name as it appears in the roster
        #[arg(long)]
        away: String,

        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output game result JSON path (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run a full round-robin season and write standings/aggregates/awards.
    Season {
        /// Input roster JSON path
        #[arg(long)]
        roster: PathBuf,

        /// RNG base seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Repetitions per unordered team pair
        #[arg(long, default_value_t = 50)]
        repetitions: u32,

        /// Per-game retry budget on invariant failure
        #[arg(long, default_value_t = 3)]
        retries: u32,

        /// Minimum games played for awards eligibility
        #[arg(long, default_value_t = 40)]
        award_min_gp: i32,

        /// Champion team name, used to restrict the Finals MVP pool
        #[arg(long)]
        champion: Option<String>,

        /// Output results JSON path
        #[arg(long)]
        out: PathBuf,
    },

    /// Apply end-of-season progression to a roster, using a prior season's
    /// results file for per-player production aggregates.
    Progress {
        /// Input roster JSON path
        #[arg(long)]
        roster: PathBuf,

        /// Season results JSON produced by `season` (optional; without it
        /// every player ages with no production signal)
        #[arg(long)]
        results: Option<PathBuf>,

        /// Offseason year (guards idempotent birthday aging)
        #[arg(long)]
        year: i32,

        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output roster JSON path
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command) {
        tracing::error!(error = %err, "bb_cli failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("bb_cli={default_level},bb_core={default_level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::ValidateRoster { roster } => validate_roster(&roster),
        Commands::SimulateGame { roster, home, away, seed, out } => {
            simulate_game(&roster, &home, &away, seed, out.as_deref())
        }
        Commands::Season { roster, seed, repetitions, retries, award_min_gp, champion, out } => {
            run_season(&roster, seed, repetitions, retries, award_min_gp, champion.as_deref(), &out)
        }
        Commands::Progress { roster, results, year, seed, out } => {
            run_progress(&roster, results.as_deref(), year, seed, &out)
        }
    }
}

fn validate_roster(path: &PathBuf) -> Result<()> {
    let league = bb_core::load_roster(path)
        .with_context(|| format!("loading roster {}", path.display()))?;
    let team_count = league.teams().count();
    let player_count: usize = league.teams().map(|t| t.players.len()).sum();
    println!("roster ok: {team_count} team(s), {player_count} player(s)");
    Ok(())
}

fn simulate_game(
    roster_path: &PathBuf,
    home_name: &str,
    away_name: &str,
    seed: u64,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let league =
        bb_core::load_roster(roster_path).with_context(|| format!("loading roster {}", roster_path.display()))?;
    let teams: Vec<_> = league.teams().collect();

    let home = teams
        .iter()
        .find(|t| t.name == home_name)
        .copied()
        .with_context(|| format!("no team named {home_name:?} in roster"))?;
    let away = teams
        .iter()
        .find(|t| t.name == away_name)
        .copied()
        .with_context(|| format!("no team named {away_name:?} in roster"))?;

    let ctx = bb_core::LeagueContext::build(teams.iter().copied());
    let home_minutes: MinutesAllocation = bb_core::lineup::autocomplete(home);
    let away_minutes: MinutesAllocation = bb_core::lineup::autocomplete(away);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let result = bb_core::simulate_game(home, &home_minutes, away, &away_minutes, &ctx, &mut rng)
        .context("simulating game")?;

    emit_json(&result, out)
}

fn run_season(
    roster_path: &PathBuf,
    seed: u64,
    repetitions: u32,
    retries: u32,
    award_min_gp: i32,
    champion: Option<&str>,
    out: &PathBuf,
) -> Result<()> {
    let league =
        bb_core::load_roster(roster_path).with_context(|| format!("loading roster {}", roster_path.display()))?;
    let teams: Vec<_> = league.teams().cloned().collect();
    let ctx = bb_core::LeagueContext::build(teams.iter());

    let settings =
        bb_core::SimSettings { repetitions, n_retry: retries, base_seed: seed, award_min_gp };

    tracing::info!(teams = teams.len(), repetitions, "starting season");
    let report = bb_core::run_season(&teams, &ctx, &settings).context("running season")?;

    let aggregates: Vec<_> = report.aggregates.values().cloned().collect();
    let awards = bb_core::compute_awards(&aggregates, &report.standings, &settings);

    let finals_mvp = match champion {
        Some(team) => bb_core::compute_finals_mvp(&aggregates, team),
        None => bb_core::FinalsMvpReport::default(),
    };

    let output = bb_core::SeasonReportOutput {
        standings: report.standings,
        players: aggregates,
        awards,
        finals_mvp,
    };

    bb_core::write_results(out, &output).context("writing season results")?;
    println!("season results written to {}", out.display());
    Ok(())
}

fn run_progress(
    roster_path: &PathBuf,
    results_path: Option<&std::path::Path>,
    year: i32,
    seed: u64,
    out: &PathBuf,
) -> Result<()> {
    let mut league =
        bb_core::load_roster(roster_path).with_context(|| format!("loading roster {}", roster_path.display()))?;

    let aggregates: HashMap<String, bb_core::SeasonAggregate> = match results_path {
        Some(p) => {
            let bytes = std::fs::read(p).with_context(|| format!("reading results {}", p.display()))?;
            let report: bb_core::SeasonReportOutput =
                serde_json::from_slice(&bytes).context("parsing results JSON")?;
            report
                .players
                .into_iter()
                .map(|a| (format!("{}::{}", a.team, a.player), a))
                .collect()
        }
        None => HashMap::new(),
    };

    let settings = bb_core::SimSettings::default();
    let deltas = bb_core::apply_end_of_season(&mut league, &aggregates, &settings, seed, year);
    tracing::info!(players = deltas.deltas.len(), year, "applied end-of-season progression");

    let json = serde_json::to_vec_pretty(&league).context("serializing progressed roster")?;
    std::fs::write(out, json).with_context(|| format!("writing roster {}", out.display()))?;
    println!("progressed roster written to {}", out.display());
    Ok(())
}

fn emit_json<T: serde::Serialize>(value: &T, out: Option<&std::path::Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
