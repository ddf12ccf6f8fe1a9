//! Jump Point Search over an `UnweightedGrid`: prunes the 8-neighborhood to
//! natural and forced neighbors, then jumps along straight and diagonal rays
//! to find the next cell that must be expanded without losing optimality.

use std::collections::HashMap;

use crate::engine::{OpenQueue, SearchOutcome};
use crate::geometry::{is_diagonal, octile_distance, step_cost, Cell, EPS, MOVES};
use crate::grid::UnweightedGrid;
use crate::path_utils::reconstruct_path;

/// The neighbors a jump-point walker explores before a diagonal/straight
/// move is known to be forced: for a diagonal direction, the diagonal plus
/// its two straight components; for a straight direction, just itself.
fn natural_neighbors(dx: i32, dy: i32) -> Vec<(i32, i32)> {
    if is_diagonal(dx, dy) {
        vec![(dx, dy), (dx, 0), (0, dy)]
    } else {
        vec![(dx, dy)]
    }
}

/// Directions opened up by an obstacle flanking `(x, y)`, given the walker
/// arrived there moving `(dx, dy)`. These are the neighbors that would be
/// unreachable by any other route once `(x, y)` is skipped.
fn forced_neighbors(grid: &UnweightedGrid, x: i32, y: i32, dx: i32, dy: i32) -> Vec<(i32, i32)> {
    let mut forced = Vec::new();
    if is_diagonal(dx, dy) {
        if !grid.walkable(x - dx, y) && grid.walkable(x - dx, y + dy) {
            forced.push((-dx, dy));
        }
        if !grid.walkable(x, y - dy) && grid.walkable(x + dx, y - dy) {
            forced.push((dx, -dy));
        }
    } else if dy == 0 {
        if !grid.walkable(x, y + 1) && grid.walkable(x + dx, y + 1) {
            forced.push((dx, 1));
        }
        if !grid.walkable(x, y - 1) && grid.walkable(x + dx, y - 1) {
            forced.push((dx, -1));
        }
    } else {
        if !grid.walkable(x + 1, y) && grid.walkable(x + 1, y + dy) {
            forced.push((1, dy));
        }
        if !grid.walkable(x - 1, y) && grid.walkable(x - 1, y + dy) {
            forced.push((-1, dy));
        }
    }
    forced
}

/// The directions worth exploring from `cell`, given the direction the
/// walker arrived from (`None` at the start, where all eight apply).
pub fn prune_neighbors(grid: &UnweightedGrid, cell: Cell, arrived_from: Option<(i32, i32)>) -> Vec<(i32, i32)> {
    let candidates: Vec<(i32, i32)> = match arrived_from {
        None => MOVES.to_vec(),
        Some((dx, dy)) => {
            let mut dirs = natural_neighbors(dx, dy);
            dirs.extend(forced_neighbors(grid, cell.x, cell.y, dx, dy));
            dirs
        }
    };
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|&(dx, dy)| grid.valid_step(cell.x, cell.y, dx, dy) && seen.insert((dx, dy)))
        .collect()
}

/// Walks from `(x, y)` in direction `(dx, dy)` and returns the first cell
/// that cannot be skipped: the goal, a cell with a forced neighbor, or (for
/// diagonal rays) a cell whose straight-component probes find one.
pub fn jump(grid: &UnweightedGrid, x: i32, y: i32, dx: i32, dy: i32, goal: Cell) -> Option<Cell> {
    let (mut x, mut y) = (x, y);
    loop {
        if !grid.valid_step(x, y, dx, dy) {
            return None;
        }
        let (nx, ny) = (x + dx, y + dy);
        if nx == goal.x && ny == goal.y {
            return Some(Cell::new(nx, ny));
        }
        if is_diagonal(dx, dy) {
            if !forced_neighbors(grid, nx, ny, dx, dy).is_empty() {
                return Some(Cell::new(nx, ny));
            }
            if jump(grid, nx, ny, dx, 0, goal).is_some() || jump(grid, nx, ny, 0, dy, goal).is_some() {
                return Some(Cell::new(nx, ny));
            }
        } else if !forced_neighbors(grid, nx, ny, dx, dy).is_empty() {
            return Some(Cell::new(nx, ny));
        }
        x = nx;
        y = ny;
    }
}

/// Runs Jump Point Search from `start` to `goal`. The returned path contains
/// only jump points; use `path_utils::expand_path` to materialize every
/// intermediate cell.
pub fn jump_point_search(grid: &UnweightedGrid, start: Cell, goal: Cell) -> SearchOutcome {
    if start == goal {
        return SearchOutcome {
            path: vec![start],
            cost: 0.0,
            expanded: 0,
        };
    }

    let mut g_score: HashMap<Cell, f64> = HashMap::new();
    let mut parent: HashMap<Cell, Cell> = HashMap::new();
    let mut dir_parent: HashMap<Cell, (i32, i32)> = HashMap::new();
    let mut closed: std::collections::HashSet<Cell> = std::collections::HashSet::new();
    let mut open = OpenQueue::new();

    g_score.insert(start, 0.0);
    open.push(start, octile_distance(start, goal), 0.0);

    let mut expanded: u64 = 0;

    while let Some(entry) = open.pop() {
        if closed.contains(&entry.cell) {
            continue;
        }
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

        let arrived_from = dir_parent.get(&entry.cell).copied();
        for (dx, dy) in prune_neighbors(grid, entry.cell, arrived_from) {
            let Some(jp) = jump(grid, entry.cell.x, entry.cell.y, dx, dy, goal) else {
                continue;
            };
            if closed.contains(&jp) {
                continue;
            }
            let steps = (jp.x - entry.cell.x).abs().max((jp.y - entry.cell.y).abs()) as f64;
            let move_cost = steps * step_cost(dx, dy);
            let tentative_g = entry.g + move_cost;
            let better = match g_score.get(&jp) {
                Some(&existing) => tentative_g + EPS < existing,
                None => true,
            };
            if better {
                g_score.insert(jp, tentative_g);
                parent.insert(jp, entry.cell);
                dir_parent.insert(jp, (dx, dy));
                let f = tentative_g + octile_distance(jp, goal);
                open.push(jp, f, tentative_g);
            }
        }
    }

    SearchOutcome::unreachable(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::astar_search;
    use crate::path_utils::expand_path;

    fn grid(rows: &[&str]) -> UnweightedGrid {
        UnweightedGrid::from_rows(rows, ".GSW")
    }

    #[test]
    fn jump_reaches_goal_in_straight_corridor() {
        let g = grid(&["......"]);
        let jp = jump(&g, 0, 0, 1, 0, Cell::new(5, 0));
        assert_eq!(jp, Some(Cell::new(5, 0)));
    }

    #[test]
    fn jump_reaches_goal_in_diagonal_corridor() {
        let g = grid(&["....."; 5]);
        let jp = jump(&g, 0, 0, 1, 1, Cell::new(4, 4));
        assert_eq!(jp, Some(Cell::new(4, 4)));
    }

    #[test]
    fn s1_matches_astar_cost() {
        let g = grid(&["....."; 5]);
        let a = astar_search(&g, Cell::new(0, 0), Cell::new(4, 4));
        let j = jump_point_search(&g, Cell::new(0, 0), Cell::new(4, 4));
        assert!((a.cost - j.cost).abs() < 1e-6);
    }

    #[test]
    fn s2_central_block_matches_astar() {
        let g = grid(&["...", ".#.", "..."]);
        let a = astar_search(&g, Cell::new(0, 1), Cell::new(2, 1));
        let j = jump_point_search(&g, Cell::new(0, 1), Cell::new(2, 1));
        assert!((a.cost - j.cost).abs() < 1e-6);
        assert!((j.cost - 4.0).abs() < 1e-6);
    }

    #[test]
    fn s3_disconnected_is_unreachable() {
        let g = grid(&["#####", "#.#.#", "#.#.#", "#.#.#", "#####"]);
        let j = jump_point_search(&g, Cell::new(1, 1), Cell::new(3, 3));
        assert!(j.cost.is_infinite());
    }

    #[test]
    fn s4_dead_end_turn_matches_astar() {
        let g = grid(&["###.#", "....#", "#####"]);
        let a = astar_search(&g, Cell::new(0, 1), Cell::new(3, 0));
        let j = jump_point_search(&g, Cell::new(0, 1), Cell::new(3, 0));
        assert!((a.cost - j.cost).abs() < 1e-6);
    }

    #[test]
    fn expanded_jump_path_is_walkable() {
        let g = grid(&["###.#", "....#", "#####"]);
        let j = jump_point_search(&g, Cell::new(0, 1), Cell::new(3, 0));
        let full = expand_path(&j.path);
        for w in full.windows(2) {
            let dx = w[1].x - w[0].x;
            let dy = w[1].y - w[0].y;
            assert!(g.valid_step(w[0].x, w[0].y, dx, dy));
        }
    }
}
