use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridpath_core::geometry::Cell;
use gridpath_core::{
    astar_search, astarw_search, expand_path, jump_point_search, jump_point_search_weighted, mapfile,
    SearchOutcome, UnweightedGrid, WeightedGrid,
};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Algorithm {
    Astar,
    Astarw,
    Jps,
    Jpsw,
}

impl Algorithm {
    fn is_weighted(self) -> bool {
        matches!(self, Algorithm::Astarw | Algorithm::Jpsw)
    }
}

#[derive(Parser, Debug)]
#[command(name = "gridpath-cli", version, about = "Run octile grid pathfinding: A*, A*W, JPS, JPSW")]
struct Args {
    /// MovingAI .map file to search on.
    #[arg(long, value_name = "PATH", conflicts_with = "scenario")]
    map: Option<PathBuf>,

    /// MovingAI .scen scenario file; pairs with --index.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Which line of --scenario to run (0-based).
    #[arg(long, value_name = "N", default_value_t = 0, requires = "scenario")]
    index: usize,

    /// Optional terrain-weights JSON file (only used by --algorithm astarw/jpsw).
    #[arg(long, value_name = "PATH")]
    terrain_weights: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Algorithm::Astar)]
    algorithm: Algorithm,

    #[arg(long, value_name = "X", requires = "map")]
    start_x: Option<i32>,
    #[arg(long, value_name = "Y", requires = "map")]
    start_y: Option<i32>,
    #[arg(long, value_name = "X", requires = "map")]
    goal_x: Option<i32>,
    #[arg(long, value_name = "Y", requires = "map")]
    goal_y: Option<i32>,

    /// Render the found path as ASCII over the grid.
    #[arg(long)]
    show_path: bool,
}

fn load_weights(path: &Option<PathBuf>) -> Result<HashMap<char, f64>> {
    match path {
        None => Ok(HashMap::new()),
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading terrain weights file {p:?}"))?;
            Ok(mapfile::parse_terrain_weights(&text)?)
        }
    }
}

fn run_search(
    algorithm: Algorithm,
    unweighted: &UnweightedGrid,
    weighted: &WeightedGrid,
    start: Cell,
    goal: Cell,
) -> SearchOutcome {
    match algorithm {
        Algorithm::Astar => astar_search(unweighted, start, goal),
        Algorithm::Astarw => astarw_search(weighted, start, goal),
        Algorithm::Jps => jump_point_search(unweighted, start, goal),
        Algorithm::Jpsw => jump_point_search_weighted(weighted, start, goal),
    }
}

fn render_ascii(grid: &UnweightedGrid, path: &[Cell], start: Cell, goal: Cell) -> String {
    let on_path: std::collections::HashSet<Cell> = path.iter().copied().collect();
    let mut out = String::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let c = Cell::new(x, y);
            let ch = if c == start {
                'S'
            } else if c == goal {
                'G'
            } else if on_path.contains(&c) {
                '*'
            } else {
                grid.char_at(x, y).unwrap_or(if grid.walkable(x, y) { '.' } else { '#' })
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

const DEMO_ROWS: [&str; 10] = [
    "..........",
    ".####.....",
    ".#........",
    ".#.####...",
    ".#.#..#...",
    ".#.#..#.##",
    ".#.#..#.#.",
    ".#....#.#.",
    ".######.#.",
    "..........",
];

fn run_demo() -> Result<i32> {
    let grid = UnweightedGrid::from_rows(&DEMO_ROWS, ".");
    let start = Cell::new(0, 0);
    let goal = Cell::new(9, 9);

    let astar_out = astar_search(&grid, start, goal);
    let jps_out = jump_point_search(&grid, start, goal);

    println!(
        "demo grid 10x10: astar cost={:.4} expanded={} / jps cost={:.4} expanded={}",
        astar_out.cost, astar_out.expanded, jps_out.cost, jps_out.expanded
    );
    let full = expand_path(&jps_out.path);
    println!("{}", render_ascii(&grid, &full, start, goal));

    if jps_out.cost.is_finite() {
        Ok(0)
    } else {
        Ok(2)
    }
}

fn try_main() -> Result<i32> {
    let args = Args::parse();

    if args.map.is_none() && args.scenario.is_none() {
        return run_demo();
    }

    let unweighted;
    let weighted;
    let start;
    let goal;
    let map_path;

    if let Some(scenario_path) = &args.scenario {
        let text = fs::read_to_string(scenario_path).with_context(|| format!("reading scenario {scenario_path:?}"))?;
        let records = mapfile::parse_scenario(&text)?;
        let record = records
            .get(args.index)
            .ok_or_else(|| anyhow::anyhow!("scenario has no line at index {}", args.index))?;
        let resolved = mapfile::resolve_map_path(scenario_path, &record.map_path);
        let map_text = fs::read_to_string(&resolved).with_context(|| format!("reading map {resolved:?}"))?;
        let weights = load_weights(&args.terrain_weights)?;
        unweighted = mapfile::parse_octile_map(&map_text)?;
        weighted = mapfile::parse_weighted_map(&map_text, &weights)?;
        start = Cell::new(record.start.0, record.start.1);
        goal = Cell::new(record.goal.0, record.goal.1);
        map_path = resolved;
    } else {
        let path = args.map.clone().expect("checked above");
        let map_text = fs::read_to_string(&path).with_context(|| format!("reading map {path:?}"))?;
        let weights = load_weights(&args.terrain_weights)?;
        unweighted = mapfile::parse_octile_map(&map_text)?;
        weighted = mapfile::parse_weighted_map(&map_text, &weights)?;
        start = Cell::new(
            args.start_x.ok_or_else(|| anyhow::anyhow!("--start-x is required with --map"))?,
            args.start_y.ok_or_else(|| anyhow::anyhow!("--start-y is required with --map"))?,
        );
        goal = Cell::new(
            args.goal_x.ok_or_else(|| anyhow::anyhow!("--goal-x is required with --map"))?,
            args.goal_y.ok_or_else(|| anyhow::anyhow!("--goal-y is required with --map"))?,
        );
        map_path = path;
    }

    if args.algorithm.is_weighted() && args.terrain_weights.is_none() {
        info!("no --terrain-weights supplied; falling back to the deterministic per-character weight formula");
    }

    let t0 = Instant::now();
    let outcome = run_search(args.algorithm, &unweighted, &weighted, start, goal);
    let elapsed = t0.elapsed();

    info!(
        map = %map_path.display(),
        algorithm = ?args.algorithm,
        cost = outcome.cost,
        expanded = outcome.expanded,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "search complete"
    );

    if outcome.path.is_empty() {
        println!(
            "no path found ({} cells expanded, {:.3}ms)",
            outcome.expanded,
            elapsed.as_secs_f64() * 1000.0
        );
        return Ok(2);
    }

    println!(
        "cost={:.6} expanded={} elapsed={:.3}ms",
        outcome.cost,
        outcome.expanded,
        elapsed.as_secs_f64() * 1000.0
    );

    if args.show_path {
        let full = if matches!(args.algorithm, Algorithm::Jps | Algorithm::Jpsw) {
            expand_path(&outcome.path)
        } else {
            outcome.path.clone()
        };
        println!("{}", render_ascii(&unweighted, &full, start, goal));
    }

    Ok(0)
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_ansi(false).finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to install tracing subscriber");

    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!(error = %e, "gridpath-cli failed");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
