use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use threes_2x3::episode;
use threes_2x3::serialization::{read_snapshot, write_snapshot};
use threes_2x3::solver::Solver;
use threes_2x3::state::Query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "threes2x3", about = "Exact expected scores for the 2x3 Threes board")]
struct Args {
    /// Load tables from a snapshot instead of enumerating
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Write tables to this path after building
    #[arg(long)]
    save_snapshot: Option<PathBuf>,
    /// Suppress the progress spinner
    #[arg(long, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Play games with the solver's policy against a random dealer
    Simulate {
        #[arg(long, default_value_t = 1000)]
        games: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let solver = build_solver(&args)?;
    if let Some(path) = &args.save_snapshot {
        write_snapshot(path, &solver).with_context(|| format!("writing snapshot to {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    match args.cmd {
        Some(Cmd::Simulate { games, seed }) => simulate(&solver, games, seed),
        None => answer_queries(&solver),
    }
}

fn build_solver(args: &Args) -> anyhow::Result<Solver> {
    if let Some(path) = &args.snapshot {
        let solver = read_snapshot(path).with_context(|| format!("reading snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot loaded");
        return Ok(solver);
    }
    let pb = (!args.quiet).then(ProgressBar::new_spinner);
    if let Some(pb) = &pb {
        pb.set_style(ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}")?.tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"));
        pb.set_message("enumerating states");
        pb.enable_steady_tick(Duration::from_millis(120));
    }
    let solver = Solver::new();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(solver)
}

/// One query per line in, `<query> = <answer>` out.
fn answer_queries(solver: &Solver) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Query>() {
            Ok(query) => {
                let answer = solver.solve(&query.board, query.kind);
                writeln!(out, "{query} = {answer}")?;
            }
            Err(e) => warn!(line = %line, "skipping query: {e}"),
        }
    }
    Ok(())
}

fn simulate(solver: &Solver, games: u32, seed: u64) -> anyhow::Result<()> {
    if games == 0 {
        anyhow::bail!("--games must be positive");
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0);
    let mut moves = 0u64;
    for _ in 0..games {
        let ep = episode::play(solver, &mut rng);
        min = min.min(ep.score);
        max = max.max(ep.score);
        sum += ep.score;
        moves += ep.moves as u64;
    }
    println!(
        "games: {} | score min/avg/max: {} {} {} | avg moves: {:.2}",
        games,
        min,
        sum / games as f64,
        max,
        moves as f64 / games as f64
    );
    Ok(())
}
