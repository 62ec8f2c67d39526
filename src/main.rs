use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simple_logger::SimpleLogger;

use puppet_cube::actions::{Action, Actions};
use puppet_cube::cube::Cube;
use puppet_cube::errors::InitError;
use puppet_cube::heuristic::HeuristicTables;
use puppet_cube::scramble;
use puppet_cube::solver::{self, SolverConfig};
use puppet_cube::stats::RunStatistics;
use puppet_cube::tablebase::Tablebase;

/// Scramble-and-solve driver for the Puppet Cube V2.
#[derive(Parser)]
#[command(name = "puppet-cube")]
struct Args {
    /// Hand actions to an external renderer thread
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    gui: bool,

    /// Base directory holding position_data/*.bin
    #[arg(long = "rootPath", default_value = ".")]
    root_path: PathBuf,

    /// Logging verbosity
    #[arg(long = "errorLevel", value_enum, default_value_t = Verbosity::All)]
    error_level: Verbosity,

    /// Worker thread count; defaults to the hardware concurrency
    #[arg(long)]
    threads: Option<usize>,

    /// Number of scramble-and-solve runs
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Maximum positions expanded per solve
    #[arg(long, default_value_t = 10_000_000)]
    positions: u64,

    /// Radius of exact coverage to grow around the solved state
    #[arg(long, default_value_t = 5)]
    tablebase_depth: usize,

    /// Random rotations per scramble
    #[arg(long, default_value_t = 20)]
    scramble_depth: usize,

    /// Skip this many scrambles first to warm up the generator
    #[arg(long, default_value_t = 0)]
    start_offset: usize,

    /// Stop a solve early once a solution at most this long is found
    #[arg(long, default_value_t = 0)]
    min_depth: usize,

    /// Keep scrambling until the corner heuristic reaches this floor
    #[arg(long, default_value_t = 0)]
    min_corner_heuristic: u16,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
enum Verbosity {
    #[value(name = "criticalError")]
    CriticalError,
    #[value(name = "error")]
    Error,
    #[value(name = "warning")]
    Warning,
    #[value(name = "info")]
    Info,
    #[value(name = "all")]
    All,
    #[value(name = "extra")]
    Extra,
    #[value(name = "memory")]
    Memory,
}

impl Verbosity {
    fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::CriticalError | Verbosity::Error => LevelFilter::Error,
            Verbosity::Warning => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::All => LevelFilter::Debug,
            Verbosity::Extra | Verbosity::Memory => LevelFilter::Trace,
        }
    }
}

fn main() {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(args.error_level.level_filter())
        .init()
        .expect("logger initialises once");

    if let Err(error) = run(&args) {
        log::error!("CRITICAL ERROR: {error}");
        std::process::exit(-1);
    }
}

fn run(args: &Args) -> Result<(), InitError> {
    let threads = args.threads.unwrap_or_else(num_cpus::get);
    if let Err(error) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        log::warn!("thread pool already configured: {error}");
    }

    let tables = HeuristicTables::load(&args.root_path)?;

    let mut tablebase = Tablebase::new();
    tablebase.grow_to(args.tablebase_depth, &tables);

    let actions = Arc::new(Actions::new());
    let consumer = args.gui.then(|| {
        log::warn!("no renderer is built in; a stand-in consumer drains the action queue");
        let actions = Arc::clone(&actions);
        thread::spawn(move || consume_actions(&actions))
    });

    let config = SolverConfig {
        threads,
        max_positions: args.positions,
        min_depth: args.min_depth,
    };
    let mut rng = StdRng::seed_from_u64(0);
    let mut stats = RunStatistics::new();

    for run in 0..args.start_offset + args.runs {
        if actions.should_stop() {
            break;
        }
        let mut cube = Cube::solved();

        // warm-up scrambles advance the generator and are thrown away
        if run < args.start_offset {
            scramble::scramble(
                &mut rng,
                &tables,
                &mut cube,
                args.scramble_depth,
                args.min_corner_heuristic,
                None,
            );
            continue;
        }

        actions.push(Action::IsScrambling);
        let scramble_length = scramble::scramble(
            &mut rng,
            &tables,
            &mut cube,
            args.scramble_depth,
            args.min_corner_heuristic,
            Some(&actions),
        );
        actions.push(Action::IsSolving);
        log::debug!("run {run}: scrambled with {scramble_length} rotations");

        let start_time = Instant::now();
        match solver::solve(&cube, &tables, &tablebase, &config, actions.stop_flag()) {
            Ok(solution) => {
                let elapsed = start_time.elapsed().as_secs_f64();
                stats.depths.push(solution.rotations.len());
                stats.positions.push(solution.positions);
                if !actions.should_stop() {
                    stats.seconds.push(elapsed);
                }

                log::info!(
                    "run {run}: solved in {} rotations after {} positions ({elapsed:.2}s)",
                    solution.rotations.len(),
                    solution.positions
                );
                log::debug!(
                    "run {run}: {}",
                    solution.rotations.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" ")
                );

                actions.push_solution(&solution.rotations);
                while let Some(rotation) = actions.pop_solution() {
                    actions.push(Action::Rotation(rotation));
                }
            }
            Err(error) => log::error!("run {run}: {error}"),
        }
        actions.push(Action::Reset);
    }

    stats.report(args.scramble_depth);

    actions.request_stop();
    if let Some(handle) = consumer {
        if handle.join().is_err() {
            log::warn!("action consumer exited abnormally");
        }
    }
    Ok(())
}

/// Stand-in for the renderer: drain the queue and show what it would
/// animate. Exits once the stop flag is up and the queue is empty.
fn consume_actions(actions: &Actions) {
    loop {
        match actions.try_pop() {
            Some(action) => log::trace!("action: {action:?}"),
            None if actions.should_stop() => return,
            None => thread::sleep(Duration::from_millis(10)),
        }
    }
}
