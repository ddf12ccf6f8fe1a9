//! The unweighted grid model: a rectangular walkability mask with octile
//! movement and the diagonal corner-cutting rule.

use crate::geometry::{is_diagonal, Cell};

/// A rectangular grid of walkable/blocked cells.
///
/// Queries outside the rectangle report "not walkable" rather than failing;
/// the grid's own bounds are simply the limit of what coordinates mean
/// anything for.
#[derive(Debug, Clone)]
pub struct UnweightedGrid {
    width: usize,
    height: usize,
    walkable: Vec<bool>,
    chars: Option<Vec<char>>,
}

impl UnweightedGrid {
    pub fn new(width: usize, height: usize, walkable: Vec<bool>) -> Self {
        assert_eq!(
            walkable.len(),
            width * height,
            "walkable mask length must equal width * height"
        );
        UnweightedGrid {
            width,
            height,
            walkable,
            chars: None,
        }
    }

    /// Builds a grid from rows of characters, where `walkable_chars`
    /// determines which characters are passable. Preserves the original
    /// characters for rendering.
    pub fn from_rows(rows: &[impl AsRef<str>], walkable_chars: &str) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut walkable = Vec::with_capacity(width * height);
        let mut chars = Vec::with_capacity(width * height);
        for row in rows {
            for ch in row.as_ref().chars() {
                walkable.push(walkable_chars.contains(ch));
                chars.push(ch);
            }
        }
        UnweightedGrid {
            width,
            height,
            walkable,
            chars: Some(chars),
        }
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

    pub fn walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.walkable[self.index(x, y)]
    }

    pub fn char_at(&self, x: i32, y: i32) -> Option<char> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.chars.as_ref().map(|c| c[self.index(x, y)])
    }

    /// True iff stepping from `(x, y)` by `(dx, dy)` is legal: the
    /// destination is walkable, and for diagonal moves both flanking
    /// orthogonal cells are walkable too (no cutting corners).
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

    pub fn cell_in_bounds(&self, c: Cell) -> bool {
        self.in_bounds(c.x, c.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid5() -> UnweightedGrid {
        let rows = ["...", ".#.", "..."];
        UnweightedGrid::from_rows(&rows, ".")
    }

    #[test]
    fn walkable_respects_blocked_cell() {
        let g = grid5();
        assert!(g.walkable(0, 0));
        assert!(!g.walkable(1, 1));
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let g = grid5();
        assert!(!g.walkable(-1, 0));
        assert!(!g.walkable(3, 0));
        assert!(!g.walkable(0, 3));
    }

    #[test]
    fn diagonal_corner_cutting_is_illegal() {
        let rows = ["#.", ".."];
        let g = UnweightedGrid::from_rows(&rows, ".");
        // (0,1) -> (1,0) is diagonal; (1,1) is walkable but (0,0) is blocked.
        assert!(!g.valid_step(0, 1, 1, -1));
    }

    #[test]
    fn diagonal_with_both_flanks_open_is_legal() {
        let g = grid5();
        assert!(g.valid_step(0, 0, 1, 1));
    }
}
