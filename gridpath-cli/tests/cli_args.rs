//! Smoke tests that exercise the kernel plumbing the binary wires together,
//! mirroring the builder crate's integration-test style: no process spawn,
//! just the library functions the binary's main path calls.

use std::collections::HashMap;

use gridpath_core::geometry::Cell;
use gridpath_core::{astar_search, jump_point_search, mapfile};

const SAMPLE_MAP: &str = "type octile\nheight 3\nwidth 3\nmap\n...\n.@.\n...\n";

#[test]
fn parses_sample_map_and_finds_a_path() {
    let grid = mapfile::parse_octile_map(SAMPLE_MAP).unwrap();
    let out = astar_search(&grid, Cell::new(0, 0), Cell::new(2, 2));
    assert!(out.cost.is_finite());
    assert!(!out.path.is_empty());
}

#[test]
fn jps_matches_astar_on_sample_map() {
    let grid = mapfile::parse_octile_map(SAMPLE_MAP).unwrap();
    let a = astar_search(&grid, Cell::new(0, 0), Cell::new(2, 2));
    let j = jump_point_search(&grid, Cell::new(0, 0), Cell::new(2, 2));
    assert!((a.cost - j.cost).abs() < 1e-6);
}

#[test]
fn scenario_parsing_resolves_against_map_sibling_directory() {
    let text = "1\tmymap.map\t5\t5\t0\t0\t4\t4\t5.657\n";
    let records = mapfile::parse_scenario(text).unwrap();
    assert_eq!(records.len(), 1);
    let scen_path = std::path::Path::new("/maps/bench-scen/bench.map.scen");
    let resolved = mapfile::resolve_map_path(scen_path, &records[0].map_path);
    assert_eq!(resolved, std::path::PathBuf::from("/maps/bench-map/mymap.map"));
}

#[test]
fn missing_weights_file_falls_back_to_deterministic_formula() {
    let weights: HashMap<char, f64> = HashMap::new();
    let grid = mapfile::parse_weighted_map(SAMPLE_MAP, &weights).unwrap();
    assert!(grid.weight(0, 0).is_finite());
}
