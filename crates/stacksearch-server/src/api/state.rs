//! Shared handler state

use std::sync::Arc;

use stacksearch_core::SearchEngine;

/// Read-only state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self { engine }
    }
}
