//! Command line front end: load or draw a scenario, run one or both
//! engines on it, and print the round the way a player would read it.

mod placement;
mod random;
mod render;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use stealth_core::scenario::format_fingerprint;
use stealth_core::{Algorithm, Grid, Scenario, VisionPattern, find_minimal_path};

#[derive(Parser)]
#[command(name = "stealth-path", about = "Grid stealth pathfinding rounds")]
struct Args {
    /// JSON scenario file
    #[arg(long, conflicts_with = "placements")]
    scenario: Option<PathBuf>,
    /// Six bracketed positions: agent, two sentries, relic, cloak, exit
    #[arg(long)]
    placements: Option<String>,
    /// Perception pattern: 1 for the near ring, 2 for the far ring
    #[arg(long, default_value_t = 1)]
    pattern: u8,
    /// Grid side length for manual and random rounds
    #[arg(long, default_value_t = 9)]
    size: usize,
    /// Seed for a random round when no scenario is given
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = EngineChoice::Both)]
    engine: EngineChoice,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineChoice {
    Both,
    Astar,
    Backtracking,
}

impl EngineChoice {
    fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Self::Both => &[Algorithm::Backtracking, Algorithm::AStar],
            Self::Astar => &[Algorithm::AStar],
            Self::Backtracking => &[Algorithm::Backtracking],
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let vision = match args.pattern {
        1 => VisionPattern::Ring1,
        2 => VisionPattern::Ring2,
        other => bail!("perception pattern must be 1 or 2, got {other}"),
    };

    let scenario = load_scenario(&args, vision)?;
    println!("scenario {}", format_fingerprint(scenario.fingerprint()));

    let grid = scenario.build().context("invalid scenario")?;
    println!("{}", render::render(&grid, None));

    for &algorithm in args.engine.algorithms() {
        run_engine(algorithm, &grid);
    }
    Ok(())
}

fn load_scenario(args: &Args, vision: VisionPattern) -> Result<Scenario> {
    if let Some(path) = &args.scenario {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario file {}", path.display()))?;
        let scenario = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario file {}", path.display()))?;
        return Ok(scenario);
    }
    if let Some(line) = &args.placements {
        return placement::parse_placements(line, args.size, vision)
            .map_err(|message| anyhow::anyhow!(message))
            .context("invalid placements line");
    }
    random::generate(args.seed, args.size, vision).map_err(|message| anyhow::anyhow!(message))
}

fn run_engine(algorithm: Algorithm, grid: &Grid) {
    println!("{algorithm}");
    let started = Instant::now();
    let outcome = find_minimal_path(algorithm, grid);
    let elapsed = started.elapsed();

    match outcome.route {
        Some(route) => {
            println!("Win!");
            println!("steps: {}", route.step_count());
            let line: Vec<String> = route
                .waypoints
                .iter()
                .map(|pos| format!("[{},{}]", pos.x, pos.y))
                .collect();
            println!("{}", line.join(" "));
            println!("{}", render::render(grid, Some(&route)));
        }
        None => println!("Lose!"),
    }
    println!(
        "expanded {} / revealed {} / blind {} in {} ms",
        outcome.stats.expanded,
        outcome.stats.revealed,
        outcome.stats.blind_moves,
        elapsed.as_millis()
    );
    println!();
}
