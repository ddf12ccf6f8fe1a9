use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use gridpath_core::{UnweightedGrid, WeightedGrid};

/// A loaded map, kept in both forms so `/search` can dispatch to any of the
/// four algorithms without reparsing.
pub struct LoadedMap {
    pub map_text: String,
    pub unweighted: UnweightedGrid,
    pub weighted: WeightedGrid,
}

#[derive(Clone)]
pub struct AppState {
    maps: Arc<RwLock<HashMap<String, Arc<LoadedMap>>>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            maps: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn insert(&self, name: String, map: LoadedMap) {
        self.maps.write().expect("map registry lock poisoned").insert(name, Arc::new(map));
    }

    pub fn get(&self, name: &str) -> Option<Arc<LoadedMap>> {
        self.maps.read().expect("map registry lock poisoned").get(name).cloned()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.maps.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("AppState").field("maps_loaded", &count).finish()
    }
}
