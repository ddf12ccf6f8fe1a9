//! Property-style checks over many randomly generated grids: cost
//! equivalence between the reference and jump-point kernels, path validity,
//! determinism, and JPS's expansion-count advantage over A*.

use std::collections::HashMap;

use gridpath_core::astar::astar_search;
use gridpath_core::astarw::astarw_search;
use gridpath_core::geometry::Cell;
use gridpath_core::grid::UnweightedGrid;
use gridpath_core::jps::jump_point_search;
use gridpath_core::jpsw::jump_point_search_weighted;
use gridpath_core::path_utils::expand_path;
use gridpath_core::weighted_grid::WeightedGrid;

/// A tiny, dependency-free splitmix64 generator so the integration suite
/// needs no external randomness crate.
struct SplitMix64(u64);

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        SplitMix64(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_range(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

fn random_grid(rng: &mut SplitMix64, size: usize, obstacle_prob: f64) -> UnweightedGrid {
    let mut walkable = vec![true; size * size];
    for cell in walkable.iter_mut() {
        if rng.next_f64() < obstacle_prob {
            *cell = false;
        }
    }
    UnweightedGrid::new(size, size, walkable)
}

fn random_endpoints(rng: &mut SplitMix64, grid: &UnweightedGrid) -> (Cell, Cell) {
    let pick = |rng: &mut SplitMix64| loop {
        let c = Cell::new(rng.next_range(grid.width() as i32), rng.next_range(grid.height() as i32));
        if grid.walkable(c.x, c.y) {
            return c;
        }
    };
    (pick(rng), pick(rng))
}

#[test]
fn cost_equivalence_astar_vs_jps() {
    let mut rng = SplitMix64::new(42);
    for &density in &[0.1, 0.25, 0.5, 0.75] {
        for _ in 0..25 {
            let grid = random_grid(&mut rng, 16, density);
            let (s, g) = random_endpoints(&mut rng, &grid);
            let a = astar_search(&grid, s, g);
            let j = jump_point_search(&grid, s, g);
            assert!(
                (a.cost - j.cost).abs() < 1e-6 || (a.cost.is_infinite() && j.cost.is_infinite()),
                "mismatch at density {density}: astar={}, jps={}",
                a.cost,
                j.cost
            );
        }
    }
}

#[test]
fn cost_equivalence_astarw_vs_jpsw() {
    let mut rng = SplitMix64::new(7);
    let mut weights = HashMap::new();
    weights.insert('.', 1.0);
    weights.insert('H', 5.0);
    weights.insert('M', 9.0);
    for &density in &[0.1, 0.3, 0.5] {
        for _ in 0..20 {
            let size = 12usize;
            let mut rows: Vec<String> = Vec::new();
            for _ in 0..size {
                let mut row = String::new();
                for _ in 0..size {
                    let r = rng.next_f64();
                    let ch = if r < density {
                        '#'
                    } else if r < density + 0.2 {
                        'H'
                    } else if r < density + 0.3 {
                        'M'
                    } else {
                        '.'
                    };
                    row.push(ch);
                }
                rows.push(row);
            }
            let grid = WeightedGrid::from_rows(&rows, &weights, "#");
            let pick = |rng: &mut SplitMix64| loop {
                let c = Cell::new(rng.next_range(size as i32), rng.next_range(size as i32));
                if grid.walkable(c.x, c.y) {
                    return c;
                }
            };
            let s = pick(&mut rng);
            let g = pick(&mut rng);
            let a = astarw_search(&grid, s, g);
            let j = jump_point_search_weighted(&grid, s, g);
            assert!(
                (a.cost - j.cost).abs() < 1e-6 || (a.cost.is_infinite() && j.cost.is_infinite()),
                "mismatch: astarw={}, jpsw={}",
                a.cost,
                j.cost
            );
        }
    }
}

#[test]
fn determinism_across_repeated_runs() {
    let mut rng = SplitMix64::new(1234);
    let grid = random_grid(&mut rng, 20, 0.3);
    let (s, g) = random_endpoints(&mut rng, &grid);
    let first = jump_point_search(&grid, s, g);
    let second = jump_point_search(&grid, s, g);
    assert_eq!(first.path, second.path);
    assert_eq!(first.expanded, second.expanded);
    assert!((first.cost - second.cost).abs() < 1e-12);
}

#[test]
fn expanded_jump_paths_are_valid_and_cost_matches() {
    let mut rng = SplitMix64::new(99);
    for _ in 0..15 {
        let grid = random_grid(&mut rng, 14, 0.2);
        let (s, g) = random_endpoints(&mut rng, &grid);
        let out = jump_point_search(&grid, s, g);
        if out.path.is_empty() {
            continue;
        }
        let full = expand_path(&out.path);
        let mut summed = 0.0;
        for w in full.windows(2) {
            let dx = w[1].x - w[0].x;
            let dy = w[1].y - w[0].y;
            assert!(grid.valid_step(w[0].x, w[0].y, dx, dy));
            summed += gridpath_core::geometry::step_cost(dx, dy);
        }
        assert!((summed - out.cost).abs() < 1e-6);
    }
}

#[test]
fn jps_expands_no_more_nodes_than_astar_on_average() {
    let mut rng = SplitMix64::new(555);
    for &density in &[0.1, 0.25, 0.5] {
        let mut astar_total = 0u64;
        let mut jps_total = 0u64;
        for _ in 0..20 {
            let grid = random_grid(&mut rng, 24, density);
            let (s, g) = random_endpoints(&mut rng, &grid);
            astar_total += astar_search(&grid, s, g).expanded;
            jps_total += jump_point_search(&grid, s, g).expanded;
        }
        assert!(
            jps_total <= astar_total,
            "jps expanded more than astar at density {density}: jps={jps_total}, astar={astar_total}"
        );
    }
}
