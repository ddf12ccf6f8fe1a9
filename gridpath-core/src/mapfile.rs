//! Pure parsing for the MovingAI octile map/scenario text formats and the
//! terrain-weights JSON file. No filesystem or network access happens here;
//! callers (the CLI and the service) own reading the bytes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{GridError, GridResult};
use crate::grid::UnweightedGrid;
use crate::weighted_grid::WeightedGrid;

/// Characters that are walkable in the unweighted model. Any other
/// character (including the canonical blocked set `@OT`) is treated as
/// impassable for `UnweightedGrid`.
const WALKABLE_CHARS: &str = ".GSW";

/// Characters that are always blocked, in both models.
const BLOCKED_CHARS: &str = "@OT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapHeader {
    pub height: usize,
    pub width: usize,
}

fn parse_header(lines: &mut std::str::Lines<'_>) -> GridResult<MapHeader> {
    let type_line = lines
        .next()
        .ok_or_else(|| GridError::MalformedMap("missing 'type' line".into()))?;
    if !type_line.trim().starts_with("type") {
        return Err(GridError::MalformedMap(format!("expected 'type octile', got {type_line:?}")));
    }
    let height = lines
        .next()
        .ok_or_else(|| GridError::MalformedMap("missing 'height' line".into()))?
        .trim()
        .strip_prefix("height")
        .ok_or_else(|| GridError::MalformedMap("expected 'height H'".into()))?
        .trim()
        .parse::<usize>()
        .map_err(|e| GridError::MalformedMap(format!("bad height: {e}")))?;
    let width = lines
        .next()
        .ok_or_else(|| GridError::MalformedMap("missing 'width' line".into()))?
        .trim()
        .strip_prefix("width")
        .ok_or_else(|| GridError::MalformedMap("expected 'width W'".into()))?
        .trim()
        .parse::<usize>()
        .map_err(|e| GridError::MalformedMap(format!("bad width: {e}")))?;
    let map_line = lines
        .next()
        .ok_or_else(|| GridError::MalformedMap("missing 'map' line".into()))?;
    if map_line.trim() != "map" {
        return Err(GridError::MalformedMap(format!("expected 'map', got {map_line:?}")));
    }
    Ok(MapHeader { height, width })
}

fn collect_rows(lines: std::str::Lines<'_>, header: MapHeader) -> GridResult<Vec<String>> {
    let rows: Vec<String> = lines.take(header.height).map(|l| l.to_string()).collect();
    if rows.len() != header.height {
        return Err(GridError::MalformedMap(format!(
            "expected {} map rows, found {}",
            header.height,
            rows.len()
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.chars().count() != header.width {
            return Err(GridError::MalformedMap(format!(
                "row {i} has {} characters, expected {}",
                row.chars().count(),
                header.width
            )));
        }
    }
    Ok(rows)
}

/// Parses a MovingAI `.map` file's text into an `UnweightedGrid`.
pub fn parse_octile_map(text: &str) -> GridResult<UnweightedGrid> {
    let mut lines = text.lines();
    let header = parse_header(&mut lines)?;
    let rows = collect_rows(lines, header)?;
    Ok(UnweightedGrid::from_rows(&rows, WALKABLE_CHARS))
}

/// Parses a MovingAI `.map` file's text into a `WeightedGrid`, applying
/// `weights` (falling back to the deterministic formula for unmapped
/// symbols) to every non-blocked character.
pub fn parse_weighted_map(text: &str, weights: &HashMap<char, f64>) -> GridResult<WeightedGrid> {
    let mut lines = text.lines();
    let header = parse_header(&mut lines)?;
    let rows = collect_rows(lines, header)?;
    Ok(WeightedGrid::from_rows(&rows, weights, BLOCKED_CHARS))
}

/// Parses a terrain-weights JSON object (`{"H": 10.0, ...}`) into a lookup
/// table. An empty or absent file is not an error at this layer; callers
/// that have no file simply never call this and fall back entirely to the
/// deterministic per-character formula.
pub fn parse_terrain_weights(json_text: &str) -> GridResult<HashMap<char, f64>> {
    let raw: serde_json::Value =
        serde_json::from_str(json_text).map_err(|e| GridError::BadWeightsFile(e.to_string()))?;
    let obj = raw
        .as_object()
        .ok_or_else(|| GridError::BadWeightsFile("expected a JSON object".into()))?;
    let mut weights = HashMap::with_capacity(obj.len());
    for (key, value) in obj {
        let ch = key
            .chars()
            .next()
            .filter(|_| key.chars().count() == 1)
            .ok_or_else(|| GridError::BadWeightsFile(format!("key {key:?} is not a single character")))?;
        let w = value
            .as_f64()
            .ok_or_else(|| GridError::BadWeightsFile(format!("value for {key:?} is not a number")))?;
        if w <= 0.0 {
            return Err(GridError::BadWeightsFile(format!("weight for {key:?} must be positive")));
        }
        weights.insert(ch, w);
    }
    Ok(weights)
}

/// One line of a MovingAI `.scen` scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub bucket: Option<u32>,
    pub map_path: String,
    pub map_width: u32,
    pub map_height: u32,
    pub start: (i32, i32),
    pub goal: (i32, i32),
    pub optimal_length: f64,
}

/// Parses a `.scen` file's text, tolerating an optional leading `version`
/// line, an optional leading `bucket` column (8 fields without it, 9 with),
/// and skipping any line that doesn't parse rather than failing the batch.
pub fn parse_scenario(text: &str) -> GridResult<Vec<ScenarioRecord>> {
    let parse_i32 = |s: &str| -> Option<i32> { s.parse().ok() };
    let parse_f64 = |s: &str| -> Option<f64> { s.parse().ok() };

    let mut records = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.to_ascii_lowercase().starts_with("version") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (bucket, rest) = match fields.len() {
            9 => (fields[0].parse::<u32>().ok(), &fields[1..]),
            8 => (None, &fields[..]),
            _ => continue,
        };
        let record = (|| -> Option<ScenarioRecord> {
            Some(ScenarioRecord {
                bucket,
                map_path: rest[0].to_string(),
                map_width: parse_i32(rest[1])? as u32,
                map_height: parse_i32(rest[2])? as u32,
                start: (parse_i32(rest[3])?, parse_i32(rest[4])?),
                goal: (parse_i32(rest[5])?, parse_i32(rest[6])?),
                optimal_length: parse_f64(rest[7])?,
            })
        })();
        match record {
            Some(r) => records.push(r),
            None => continue,
        }
    }
    Ok(records)
}

/// Resolves a scenario's map path relative to the scenario file's own
/// directory, honoring the MovingAI convention that a sibling directory
/// ending in `-map` holds map files for a `-scen` directory.
pub fn resolve_map_path(scenario_path: &std::path::Path, map_path: &str) -> std::path::PathBuf {
    let scen_dir = scenario_path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let dir_name = scen_dir.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let base_dir = if let Some(prefix) = dir_name.strip_suffix("-scen") {
        scen_dir.with_file_name(format!("{prefix}-map"))
    } else {
        scen_dir.to_path_buf()
    };
    base_dir.join(map_path)
}
