//! JPSW: Jump Point Search adapted to non-uniform terrain. Pruning is backed
//! by a small local Dijkstra over the 3x3 patch around the current cell
//! instead of the pure geometric forced-neighbor rule, and jumping stops at
//! any cell whose neighborhood mixes terrain symbols, a conservative
//! superset of "interesting" cells that keeps JPSW cost-equivalent to A*W.

use std::collections::HashMap;

use crate::engine::{OpenQueue, SearchOutcome};
use crate::geometry::{is_diagonal, Cell, EPS, MOVES};
use crate::path_utils::reconstruct_path;
use crate::weighted_grid::{weighted_octile_distance, WeightedGrid};

/// Obstacle-flank forced neighbors, as in unweighted JPS but evaluated
/// against a `WeightedGrid`'s walkability. Kept as a safety net alongside
/// the terrain-heterogeneity check: any cell that would be a forced
/// neighbor geometrically must also stop a weighted jump.
fn forced_neighbors(grid: &WeightedGrid, x: i32, y: i32, dx: i32, dy: i32) -> bool {
    if is_diagonal(dx, dy) {
        (!grid.walkable(x - dx, y) && grid.walkable(x - dx, y + dy))
            || (!grid.walkable(x, y - dy) && grid.walkable(x + dx, y - dy))
    } else if dy == 0 {
        (!grid.walkable(x, y + 1) && grid.walkable(x + dx, y + 1))
            || (!grid.walkable(x, y - 1) && grid.walkable(x + dx, y - 1))
    } else {
        (!grid.walkable(x + 1, y) && grid.walkable(x + 1, y + dy))
            || (!grid.walkable(x - 1, y) && grid.walkable(x - 1, y + dy))
    }
}

/// True if the cells in the 3x3 neighborhood of `(x, y)` (itself included)
/// carry more than one distinct terrain symbol. Obstacle characters count
/// as their own symbol, so any cell adjacent to a wall is a boundary too —
/// matching the source's inclusive `seen` set rather than skipping blocked
/// cells.
fn multi_terrain_neighborhood(grid: &WeightedGrid, x: i32, y: i32) -> bool {
    let mut symbol = None;
    for oy in -1..=1 {
        for ox in -1..=1 {
            let s = grid.symbol(x + ox, y + oy);
            match symbol {
                None => symbol = Some(s),
                Some(prev) if prev != s => return true,
                _ => {}
            }
        }
    }
    false
}

/// A cell deserves expansion if it's a terrain boundary or a geometric
/// forced-neighbor site; either is sufficient, and both together make the
/// stop rule a conservative superset of what unweighted JPS would stop at.
fn must_stop(grid: &WeightedGrid, x: i32, y: i32, dx: i32, dy: i32) -> bool {
    multi_terrain_neighborhood(grid, x, y) || forced_neighbors(grid, x, y, dx, dy)
}

/// Walks from `(x, y)` in direction `(dx, dy)` over a weighted grid,
/// returning the first cell that must be an expansion frontier.
pub fn jump(grid: &WeightedGrid, x: i32, y: i32, dx: i32, dy: i32, goal: Cell) -> Option<Cell> {
    let (mut x, mut y) = (x, y);
    loop {
        if !grid.valid_step(x, y, dx, dy) {
            return None;
        }
        let (nx, ny) = (x + dx, y + dy);
        if nx == goal.x && ny == goal.y {
            return Some(Cell::new(nx, ny));
        }
        if must_stop(grid, nx, ny, dx, dy) {
            return Some(Cell::new(nx, ny));
        }
        if is_diagonal(dx, dy) {
            if jump(grid, nx, ny, dx, 0, goal).is_some() || jump(grid, nx, ny, 0, dy, goal).is_some() {
                return Some(Cell::new(nx, ny));
            }
        }
        x = nx;
        y = ny;
    }
}

/// Cost of a jump run, summed step by step since terrain weight can change
/// along the way; `(dx, dy)` is the run's unit direction.
fn ray_cost(grid: &WeightedGrid, from: Cell, dx: i32, dy: i32, to: Cell) -> f64 {
    let mut total = 0.0;
    let mut cur = from;
    while cur != to {
        total += grid
            .transition_cost(cur.x, cur.y, dx, dy)
            .expect("ray_cost only walks legal steps");
        cur = cur.step(dx, dy);
    }
    total
}

/// A lexicographic (cost, geometric length) pair used to compare a direct
/// move against the best local detour: cost is primary, geometric length
/// (independent of terrain weight) is the tiebreaker.
#[derive(Clone, Copy, PartialEq)]
struct LocalCost {
    cost: f64,
    len: f64,
}

impl LocalCost {
    fn better_than(&self, other: &LocalCost) -> bool {
        if self.cost + EPS < other.cost {
            return true;
        }
        if (self.cost - other.cost).abs() <= EPS && self.len + EPS < other.len {
            return true;
        }
        false
    }
}

/// The minimum-cost path from `from` to `to` confined to the walkable 3x3
/// patch centered on `center`, found by relaxing all patch edges
/// `patch_size` times (a Bellman-Ford pass, cheap for <= 9 nodes).
fn local_patch_best(grid: &WeightedGrid, from: Cell, to: Cell, center: Cell) -> Option<LocalCost> {
    let in_patch = |c: Cell| (c.x - center.x).abs() <= 1 && (c.y - center.y).abs() <= 1 && grid.walkable(c.x, c.y);
    if !in_patch(from) || !in_patch(to) {
        return None;
    }
    let mut patch = Vec::with_capacity(9);
    for oy in -1..=1 {
        for ox in -1..=1 {
            let c = Cell::new(center.x + ox, center.y + oy);
            if grid.walkable(c.x, c.y) {
                patch.push(c);
            }
        }
    }

    let mut dist: HashMap<Cell, LocalCost> = HashMap::new();
    dist.insert(from, LocalCost { cost: 0.0, len: 0.0 });

    for _ in 0..patch.len() {
        let mut changed = false;
        for &u in &patch {
            let Some(&du) = dist.get(&u) else { continue };
            for &(dx, dy) in MOVES.iter() {
                let v = u.step(dx, dy);
                if !in_patch(v) || !grid.valid_step(u.x, u.y, dx, dy) {
                    continue;
                }
                let step = grid.transition_cost(u.x, u.y, dx, dy).unwrap();
                let step_len = if is_diagonal(dx, dy) { std::f64::consts::SQRT_2 } else { 1.0 };
                let candidate = LocalCost {
                    cost: du.cost + step,
                    len: du.len + step_len,
                };
                let better = match dist.get(&v) {
                    Some(existing) => candidate.better_than(existing),
                    None => true,
                };
                if better {
                    dist.insert(v, candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    dist.get(&to).copied()
}

/// Whether the move `(dx, dy)` out of `current` (whose prune-parent is
/// `prune_parent`) is locally sub-optimal and therefore prunable: a detour
/// confined to the 3x3 patch around `current` beats going through it
/// directly.
fn is_pruned(grid: &WeightedGrid, prune_parent: Cell, current: Cell, dx: i32, dy: i32) -> bool {
    let neighbor = current.step(dx, dy);
    let direct_cost = grid.transition_cost(prune_parent.x, prune_parent.y, current.x - prune_parent.x, current.y - prune_parent.y);
    let Ok(into_current) = direct_cost else { return false };
    let Ok(current_to_neighbor) = grid.transition_cost(current.x, current.y, dx, dy) else {
        return false;
    };
    let direct = LocalCost {
        cost: into_current + current_to_neighbor,
        len: (if is_diagonal(current.x - prune_parent.x, current.y - prune_parent.y) { std::f64::consts::SQRT_2 } else { 1.0 })
            + (if is_diagonal(dx, dy) { std::f64::consts::SQRT_2 } else { 1.0 }),
    };
    match local_patch_best(grid, prune_parent, neighbor, current) {
        Some(best) => best.better_than(&direct),
        None => false,
    }
}

/// The directions worth exploring from `current`: all eight moves, pruned
/// only by legality and, when a prune-parent is known, by local-Dijkstra
/// dominance. Unlike unweighted JPS, weighted pruning never narrows to the
/// natural-neighbor subset first — on non-uniform terrain a straight
/// arrival can still have a cost-optimal turn, and only the dominance check
/// is sound grounds to drop a direction.
pub fn prune_neighbors(grid: &WeightedGrid, prune_parent: Option<Cell>, current: Cell) -> Vec<(i32, i32)> {
    MOVES
        .into_iter()
        .filter(|&(dx, dy)| grid.valid_step(current.x, current.y, dx, dy))
        .filter(|&(dx, dy)| match prune_parent {
            Some(pp) => !is_pruned(grid, pp, current, dx, dy),
            None => true,
        })
        .collect()
}

/// Runs the weighted Jump Point Search from `start` to `goal`. Like
/// `jps::jump_point_search`, the path contains only jump points.
pub fn jump_point_search_weighted(grid: &WeightedGrid, start: Cell, goal: Cell) -> SearchOutcome {
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
    open.push(start, weighted_octile_distance(start, goal, grid), 0.0);

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
        let prune_parent = arrived_from.map(|(dx, dy)| Cell::new(entry.cell.x - dx, entry.cell.y - dy));

        for (dx, dy) in prune_neighbors(grid, prune_parent, entry.cell) {
            let Some(jp) = jump(grid, entry.cell.x, entry.cell.y, dx, dy, goal) else {
                continue;
            };
            if closed.contains(&jp) {
                continue;
            }
            let move_cost = ray_cost(grid, entry.cell, dx, dy, jp);
            let tentative_g = entry.g + move_cost;
            let better = match g_score.get(&jp) {
                Some(&existing) => tentative_g + EPS < existing,
                None => true,
            };
            if better {
                g_score.insert(jp, tentative_g);
                parent.insert(jp, entry.cell);
                dir_parent.insert(jp, (dx, dy));
                let f = tentative_g + weighted_octile_distance(jp, goal, grid);
                open.push(jp, f, tentative_g);
            }
        }
    }

    SearchOutcome::unreachable(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astarw::astarw_search;
    use std::collections::HashMap as Map;

    fn weights() -> Map<char, f64> {
        let mut m = Map::new();
        m.insert('.', 1.0);
        m.insert('H', 10.0);
        m
    }

    #[test]
    fn s5_matches_astarw_cost() {
        let rows = ["...", ".H.", "..."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let a = astarw_search(&g, Cell::new(0, 1), Cell::new(2, 1));
        let j = jump_point_search_weighted(&g, Cell::new(0, 1), Cell::new(2, 1));
        assert!((a.cost - j.cost).abs() < 1e-6, "astarw={} jpsw={}", a.cost, j.cost);
    }

    #[test]
    fn identity_path_has_zero_cost() {
        let rows = ["...", "...", "..."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let out = jump_point_search_weighted(&g, Cell::new(1, 1), Cell::new(1, 1));
        assert_eq!(out.cost, 0.0);
    }

    #[test]
    fn uniform_grid_matches_astarw_like_unweighted() {
        let rows = ["....."; 5];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let a = astarw_search(&g, Cell::new(0, 0), Cell::new(4, 4));
        let j = jump_point_search_weighted(&g, Cell::new(0, 0), Cell::new(4, 4));
        assert!((a.cost - j.cost).abs() < 1e-6);
    }

    #[test]
    fn disconnected_regions_are_unreachable() {
        let rows = ["#####", "#.#.#", "#.#.#", "#.#.#", "#####"];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let j = jump_point_search_weighted(&g, Cell::new(1, 1), Cell::new(3, 3));
        assert!(j.cost.is_infinite());
    }
}
