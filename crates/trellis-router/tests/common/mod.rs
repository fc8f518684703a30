#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use trellis_router::{History, MapTranslator, RouteMatch, RouteTree};

/// In-memory history stack for driving the router in tests.
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(vec!["/".to_string()]),
        }
    }

    pub fn last(&self) -> String {
        self.entries
            .lock()
            .map(|entries| entries.last().cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

impl History for MemoryHistory {
    fn pathname(&self) -> String {
        self.last()
    }

    fn push(&self, pathname: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(pathname.to_string());
        }
    }
}

/// The translator used across the translation suites.
pub fn dutch_translator() -> Arc<MapTranslator> {
    Arc::new(
        MapTranslator::new()
            .entry("info", "informatie")
            .entry("fo", "foobar")
            .entry("fu", "fubar"),
    )
}

/// Pattern text of every matched route, root first.
pub fn matched_patterns(tree: &RouteTree, matched: &RouteMatch) -> Vec<String> {
    matched
        .routes
        .iter()
        .map(|&id| tree.route(id).unwrap().pattern().text().to_string())
        .collect()
}

/// Name of every matched route, root first.
pub fn matched_names(tree: &RouteTree, matched: &RouteMatch) -> Vec<String> {
    matched
        .routes
        .iter()
        .map(|&id| {
            tree.route(id)
                .unwrap()
                .name
                .clone()
                .unwrap_or_default()
        })
        .collect()
}
