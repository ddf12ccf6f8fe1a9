//! The weighted grid model: a grid plus a per-cell traversal weight, and the
//! transition-cost kernel that turns a pair of weights into a step cost.

use std::sync::OnceLock;

use crate::errors::{GridError, GridResult};
use crate::geometry::{is_diagonal, octile_distance, Cell};

const UNKNOWN_SYMBOL: char = '?';

/// A rectangular grid whose walkable cells carry a positive traversal
/// weight; blocked cells have weight `+inf`.
#[derive(Debug, Clone)]
pub struct WeightedGrid {
    width: usize,
    height: usize,
    weight: Vec<f64>,
    chars: Option<Vec<char>>,
    min_cell_cost: OnceLock<f64>,
}

impl WeightedGrid {
    pub fn new(width: usize, height: usize, weight: Vec<f64>) -> Self {
        assert_eq!(
            weight.len(),
            width * height,
            "weight mask length must equal width * height"
        );
        WeightedGrid {
            width,
            height,
            weight,
            chars: None,
            min_cell_cost: OnceLock::new(),
        }
    }

    /// Builds a weighted grid from character rows, mapping each symbol to a
    /// weight via `weights`. A symbol missing from `weights` falls back to
    /// the deterministic formula `1 + (codepoint(ch) mod 9)`; `blocked_chars`
    /// marks cells as impassable (`+inf`) regardless of `weights`.
    pub fn from_rows(
        rows: &[impl AsRef<str>],
        weights: &std::collections::HashMap<char, f64>,
        blocked_chars: &str,
    ) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut weight = Vec::with_capacity(width * height);
        let mut chars = Vec::with_capacity(width * height);
        for row in rows {
            for ch in row.as_ref().chars() {
                let w = if blocked_chars.contains(ch) {
                    f64::INFINITY
                } else if let Some(&w) = weights.get(&ch) {
                    w
                } else {
                    default_weight(ch)
                };
                weight.push(w);
                chars.push(ch);
            }
        }
        WeightedGrid {
            width,
            height,
            weight,
            chars: Some(chars),
            min_cell_cost: OnceLock::new(),
        }
    }

    /// A weighted grid with no terrain-symbol map; every cell is treated as
    /// the same synthetic symbol for JPSW's terrain-change heuristic.
    pub fn without_chars(width: usize, height: usize, weight: Vec<f64>) -> Self {
        Self::new(width, height, weight)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    pub fn weight(&self, x: i32, y: i32) -> f64 {
        if !self.in_bounds(x, y) {
            return f64::INFINITY;
        }
        self.weight[self.index(x, y)]
    }

    pub fn walkable(&self, x: i32, y: i32) -> bool {
        self.weight(x, y).is_finite()
    }

    /// The symbol used by the terrain-change check: the real map character
    /// if one was recorded, else a constant placeholder.
    pub fn symbol(&self, x: i32, y: i32) -> char {
        if !self.in_bounds(x, y) {
            return UNKNOWN_SYMBOL;
        }
        self.chars
            .as_ref()
            .map(|c| c[self.index(x, y)])
            .unwrap_or(UNKNOWN_SYMBOL)
    }

    pub fn valid_step(&self, x: i32, y: i32, dx: i32, dy: i32) -> bool {
        let (nx, ny) = (x + dx, y + dy);
        if !self.walkable(nx, ny) {
            return false;
        }
        if is_diagonal(dx, dy) {
            return self.walkable(x + dx, y) && self.walkable(x, y + dy);
        }
        true
    }

    /// The minimum weight over all walkable cells, computed once and cached.
    /// Concurrent first-callers may recompute it redundantly, but the result
    /// is deterministic so only one published value is ever observed.
    pub fn min_cell_cost(&self) -> f64 {
        *self.min_cell_cost.get_or_init(|| {
            self.weight
                .iter()
                .copied()
                .filter(|w| w.is_finite())
                .fold(f64::INFINITY, f64::min)
        })
    }

    /// The cost of a single legal step from `(x, y)` to `(x+dx, y+dy)`.
    ///
    /// Straight steps cost the average of the two endpoint weights; diagonal
    /// steps cost `sqrt(2)` times the average of all four cells the move
    /// sweeps over (the two endpoints and the two flanking orthogonal
    /// cells). Returns an error if the step is not legal.
    pub fn transition_cost(&self, x: i32, y: i32, dx: i32, dy: i32) -> GridResult<f64> {
        if !self.valid_step(x, y, dx, dy) {
            return Err(GridError::IllegalTransition {
                fx: x as i64,
                fy: y as i64,
                tx: (x + dx) as i64,
                ty: (y + dy) as i64,
            });
        }
        let (nx, ny) = (x + dx, y + dy);
        if is_diagonal(dx, dy) {
            let sum = self.weight(x, y) + self.weight(nx, y) + self.weight(x, ny) + self.weight(nx, ny);
            Ok(std::f64::consts::SQRT_2 * sum / 4.0)
        } else {
            Ok((self.weight(x, y) + self.weight(nx, ny)) / 2.0)
        }
    }
}

fn default_weight(ch: char) -> f64 {
    1.0 + (ch as u32 % 9) as f64
}

/// An admissible heuristic for weighted-grid search: the unweighted octile
/// distance scaled by the grid's cheapest cell, so it never overestimates.
pub fn weighted_octile_distance(a: Cell, b: Cell, grid: &WeightedGrid) -> f64 {
    octile_distance(a, b) * grid.min_cell_cost()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn weights() -> HashMap<char, f64> {
        let mut m = HashMap::new();
        m.insert('.', 1.0);
        m.insert('H', 10.0);
        m
    }

    #[test]
    fn walkable_blocked_invariant_holds() {
        let rows = ["...", ".#.", "..."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        assert!(g.walkable(0, 0));
        assert!(!g.walkable(1, 1));
        assert!(g.weight(1, 1).is_infinite());
    }

    #[test]
    fn straight_transition_averages_endpoints() {
        let rows = [".H"];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let c = g.transition_cost(0, 0, 1, 0).unwrap();
        assert!((c - 5.5).abs() < 1e-9);
    }

    #[test]
    fn diagonal_transition_averages_all_four_cells() {
        let rows = [".H", "H."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        let c = g.transition_cost(0, 0, 1, 1).unwrap();
        let expected = std::f64::consts::SQRT_2 * (1.0 + 10.0 + 10.0 + 1.0) / 4.0;
        assert!((c - expected).abs() < 1e-9);
    }

    #[test]
    fn illegal_transition_is_an_error() {
        let rows = ["#.", ".."];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        assert!(g.transition_cost(0, 1, 1, -1).is_err());
    }

    #[test]
    fn missing_symbol_falls_back_to_deterministic_formula() {
        let rows = ["Z"];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        assert_eq!(g.weight(0, 0), default_weight('Z'));
    }

    #[test]
    fn min_cell_cost_ignores_blocked_cells() {
        let rows = ["#H"];
        let g = WeightedGrid::from_rows(&rows, &weights(), "#");
        assert_eq!(g.min_cell_cost(), 10.0);
    }
}
