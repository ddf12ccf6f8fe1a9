//! gridpath-core: octile grid pathfinding.
//!
//! Four kernels over 2D grids with eight-connected movement: classical A*
//! and A*W as references, and Jump Point Search variants (JPS, JPSW) that
//! expand far fewer nodes for the same optimal cost.

pub mod astar;
pub mod astarw;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod jps;
pub mod jpsw;
pub mod mapfile;
pub mod path_utils;
pub mod weighted_grid;

pub use astar::astar_search;
pub use astarw::astarw_search;
pub use engine::SearchOutcome;
pub use errors::{GridError, GridResult};
pub use geometry::Cell;
pub use grid::UnweightedGrid;
pub use jps::jump_point_search;
pub use jpsw::jump_point_search_weighted;
pub use mapfile::{parse_octile_map, parse_scenario, parse_terrain_weights, parse_weighted_map, ScenarioRecord};
pub use path_utils::{expand_path, reconstruct_path};
pub use weighted_grid::WeightedGrid;

/// Returns the crate version for basic linkage diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_non_empty() {
        assert!(!version().is_empty());
    }

    #[test]
    fn four_kernels_agree_on_a_simple_grid() {
        let rows = ["......", "......", "......"];
        let grid = UnweightedGrid::from_rows(&rows, ".");
        let start = Cell::new(0, 0);
        let goal = Cell::new(5, 2);
        let a = astar_search(&grid, start, goal);
        let j = jump_point_search(&grid, start, goal);
        assert!((a.cost - j.cost).abs() < 1e-6);
    }
}
