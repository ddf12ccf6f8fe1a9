use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use gridpath_core::geometry::Cell;
use gridpath_core::{astar_search, astarw_search, jump_point_search, jump_point_search_weighted, mapfile};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, info_span};

use crate::errors::AppError;
use crate::state::{AppState, LoadedMap};

#[derive(Debug, Serialize)]
struct Healthz {
    status: &'static str,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/version", get(version))
        .route("/maps/:name", post(load_map))
        .route("/maps/:name/weights", post(load_weights))
        .route("/search", post(search))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz { status: "ok" }))
}

async fn version() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "service_version": env!("CARGO_PKG_VERSION"),
            "core_version": gridpath_core::version(),
        })),
    )
}

async fn load_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let unweighted = mapfile::parse_octile_map(&body)?;
    let weighted = mapfile::parse_weighted_map(&body, &std::collections::HashMap::new())?;
    let (w, h) = (unweighted.width(), unweighted.height());
    state.insert(
        name.clone(),
        LoadedMap {
            map_text: body,
            unweighted,
            weighted,
        },
    );
    info!(map = %name, width = w, height = h, "loaded map");
    Ok((StatusCode::OK, Json(json!({"name": name, "width": w, "height": h}))))
}

async fn load_weights(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.get(&name).ok_or_else(|| AppError::NotFound(name.clone()))?;
    let weights = mapfile::parse_terrain_weights(&body)?;
    let weighted = mapfile::parse_weighted_map(&existing.map_text, &weights)?;
    state.insert(
        name.clone(),
        LoadedMap {
            map_text: existing.map_text.clone(),
            unweighted: existing.unweighted.clone(),
            weighted,
        },
    );
    info!(map = %name, "attached terrain weights");
    Ok((StatusCode::OK, Json(json!({"name": name, "weighted": true}))))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Algorithm {
    Astar,
    Astarw,
    Jps,
    Jpsw,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    map: String,
    algorithm: Algorithm,
    start: (i32, i32),
    goal: (i32, i32),
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    path: Option<Vec<(i32, i32)>>,
    cost: f64,
    expanded: u64,
}

async fn search(State(state): State<AppState>, Json(req): Json<SearchRequest>) -> Result<impl IntoResponse, AppError> {
    let span = info_span!("search", map = %req.map, algorithm = ?req.algorithm);
    let _enter = span.enter();

    let loaded = state.get(&req.map).ok_or_else(|| AppError::NotFound(req.map.clone()))?;
    let start = Cell::new(req.start.0, req.start.1);
    let goal = Cell::new(req.goal.0, req.goal.1);

    let outcome = match req.algorithm {
        Algorithm::Astar => astar_search(&loaded.unweighted, start, goal),
        Algorithm::Astarw => astarw_search(&loaded.weighted, start, goal),
        Algorithm::Jps => jump_point_search(&loaded.unweighted, start, goal),
        Algorithm::Jpsw => jump_point_search_weighted(&loaded.weighted, start, goal),
    };

    info!(expanded = outcome.expanded, cost = outcome.cost, "search done");

    let path = if outcome.path.is_empty() {
        None
    } else {
        Some(outcome.path.iter().map(|c| (c.x, c.y)).collect())
    };

    Ok((
        StatusCode::OK,
        Json(SearchResponse {
            path,
            cost: outcome.cost,
            expanded: outcome.expanded,
        }),
    ))
}
