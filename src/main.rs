use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::{rngs::StdRng, thread_rng, SeedableRng};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use eight_puzzle::batch;
use eight_puzzle::config::{Overrides, SolveConfig};
use eight_puzzle::render::Renderer;
use eight_puzzle::{Board, SearchOutcome};

#[derive(Parser)]
#[command(name = "eight-puzzle", version, about = "A* solver for the 3x3 sliding-tile puzzle")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one board and print every step
    Solve(SolveArgs),
    /// Solve random boards on worker threads and print a summary
    Batch(BatchArgs),
}

#[derive(Args, Default)]
struct SolveArgs {
    /// Start board, e.g. "1 0 3 4 2 5 7 8 6" or "103/425/786"
    #[arg(long)]
    start: Option<Board>,

    /// Goal board (defaults to 123/456/780)
    #[arg(long)]
    goal: Option<Board>,

    /// TOML file with start, goal, max_expansions and color
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many expansions
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Start from a random solvable board
    #[arg(long, conflicts_with = "start")]
    shuffle: bool,

    /// Seed for --shuffle
    #[arg(long, requires = "shuffle")]
    seed: Option<u64>,

    /// Plain output without colors
    #[arg(long)]
    no_color: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Number of random boards
    #[arg(short = 'n', long, default_value_t = 8)]
    count: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Solve(args)) => run_solve(args),
        Some(Command::Batch(args)) => run_batch(args),
        None => run_solve(SolveArgs::default()),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "eight_puzzle=info",
        1 => "eight_puzzle=debug",
        _ => "eight_puzzle=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_solve(args: SolveArgs) -> Result<ExitCode> {
    let loaded = match &args.config {
        Some(path) => SolveConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SolveConfig::default(),
    };

    let start = if args.shuffle {
        Some(match args.seed {
            Some(seed) => Board::shuffled(&mut StdRng::seed_from_u64(seed)),
            None => Board::shuffled(&mut thread_rng()),
        })
    } else {
        args.start
    };

    let config = loaded
        .merge(Overrides {
            start,
            goal: args.goal,
            max_expansions: args.max_expansions,
            color: args.no_color.then_some(false),
        })
        .context("invalid settings")?;

    let solver = config.solver();
    if !config.start.is_solvable_towards(solver.goal()) {
        warn!(
            start = %config.start.packed(),
            goal = %solver.goal().packed(),
            "inversion parity differs; the search will exhaust every reachable board",
        );
    }

    let report = solver.solve(config.start);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    Renderer::new(config.color).print_report(&mut out, &report)?;
    out.flush()?;

    Ok(match report.outcome {
        SearchOutcome::Solved(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn run_batch(args: BatchArgs) -> Result<ExitCode> {
    let threads = args
        .threads
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);

    let boards = batch::random_boards(args.count, args.seed);
    let entries = batch::solve_all(&boards, Board::GOAL, threads);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_solved = true;
    for (i, entry) in entries.iter().enumerate() {
        let result = match entry.report.outcome.solution() {
            Some(solution) => format!("{} moves", solution.len()),
            None => {
                all_solved = false;
                "no solution".to_string()
            }
        };
        writeln!(
            out,
            "#{:<3} {} -> {:<12} expanded {:>7}  {:.2?}",
            i + 1,
            entry.start.packed(),
            result,
            entry.report.stats.expanded,
            entry.elapsed,
        )?;
    }
    out.flush()?;

    Ok(if all_solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
