//! Classical A* over an `UnweightedGrid`: the reference kernel every other
//! kernel is checked against for cost equivalence.

use std::collections::HashMap;

use crate::engine::{OpenQueue, SearchOutcome};
use crate::geometry::{octile_distance, step_cost, Cell, EPS, MOVES};
use crate::grid::UnweightedGrid;
use crate::path_utils::reconstruct_path;

/// Runs A* from `start` to `goal` on `grid`. Returns the path (inclusive of
/// both endpoints, empty if unreachable), the total cost (`+inf` if
/// unreachable), and the number of cells expanded.
pub fn astar_search(grid: &UnweightedGrid, start: Cell, goal: Cell) -> SearchOutcome {
    if start == goal {
        return SearchOutcome {
            path: vec![start],
            cost: 0.0,
            expanded: 0,
        };
    }

    let mut g_score: HashMap<Cell, f64> = HashMap::new();
    let mut parent: HashMap<Cell, Cell> = HashMap::new();
    let mut closed: std::collections::HashSet<Cell> = std::collections::HashSet::new();
    let mut open = OpenQueue::new();

    g_score.insert(start, 0.0);
    open.push(start, octile_distance(start, goal), 0.0);

    let mut expanded: u64 = 0;

    while let Some(entry) = open.pop() {
        if closed.contains(&entry.cell) {
            continue;
        }
        // Stale entry: a better g was found for this cell since it was queued.
        if let Some(&best_g) = g_score.get(&entry.cell) {
            if entry.g > best_g + EPS {
                continue;
            }
        }
        closed.insert(entry.cell);
        expanded += 1;

        if entry.cell == goal {
            let path = reconstruct_path(&parent, start, goal);
            return SearchOutcome {
                path,
                cost: entry.g,
                expanded,
            };
        }

        for &(dx, dy) in MOVES.iter() {
            if !grid.valid_step(entry.cell.x, entry.cell.y, dx, dy) {
                continue;
            }
            let neighbor = entry.cell.step(dx, dy);
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative_g = entry.g + step_cost(dx, dy);
            let better = match g_score.get(&neighbor) {
                Some(&existing) => tentative_g + EPS < existing,
                None => true,
            };
            if better {
                g_score.insert(neighbor, tentative_g);
                parent.insert(neighbor, entry.cell);
                let f = tentative_g + octile_distance(neighbor, goal);
                open.push(neighbor, f, tentative_g);
            }
        }
    }

    SearchOutcome::unreachable(expanded)
}
