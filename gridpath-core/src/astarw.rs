//! A*W: the same skeleton as `astar`, but over a `WeightedGrid` with costs
//! from `WeightedGrid::transition_cost` and the weighted octile heuristic.

use std::collections::HashMap;

use crate::engine::{OpenQueue, SearchOutcome};
use crate::geometry::{Cell, EPS, MOVES};
use crate::path_utils::reconstruct_path;
use crate::weighted_grid::{weighted_octile_distance, WeightedGrid};

pub fn astarw_search(grid: &WeightedGrid, start: Cell, goal: Cell) -> SearchOutcome {
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

        for &(dx, dy) in MOVES.iter() {
            if !grid.valid_step(entry.cell.x, entry.cell.y, dx, dy) {
                continue;
            }
            let neighbor = entry.cell.step(dx, dy);
            if closed.contains(&neighbor) {
                continue;
            }
            let step = grid
                .transition_cost(entry.cell.x, entry.cell.y, dx, dy)
                .expect("valid_step already checked legality");
            let tentative_g = entry.g + step;
            let better = match g_score.get(&neighbor) {
                Some(&existing) => tentative_g + EPS < existing,
                None => true,
            };
            if better {
                g_score.insert(neighbor, tentative_g);
                parent.insert(neighbor, entry.cell);
                let f = tentative_g + weighted_octile_distance(neighbor, goal, grid);
                open.push(neighbor, f, tentative_g);
            }
        }
    }

    SearchOutcome::unreachable(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    fn weights() -> Map<char, f64> {
        let mut m = Map::new();
        m.insert('.', 1.0);
        m.insert('H', 10.0);
        m
    }

    #[test]
    fn s5_detour_around_heavy_terrain_is_cheaper() {
        let rows = ["...", ".H.", "..."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let out = astarw_search(&g, Cell::new(0, 1), Cell::new(2, 1));
        assert!(out.cost < 6.0, "cost was {}", out.cost);
    }

    #[test]
    fn identity_path_has_zero_cost() {
        let rows = ["...", "...", "..."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let out = astarw_search(&g, Cell::new(1, 1), Cell::new(1, 1));
        assert_eq!(out.cost, 0.0);
        assert_eq!(out.expanded, 0);
    }

    #[test]
    fn disconnected_regions_are_unreachable() {
        let rows = ["#####", "#.#.#", "#.#.#", "#.#.#", "#####"];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let out = astarw_search(&g, Cell::new(1, 1), Cell::new(3, 3));
        assert!(out.cost.is_infinite());
    }
}
