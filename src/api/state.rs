//! Shared handler state

use crate::core::records::RecordManager;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub manager: RecordManager,
}

impl AppState {
    pub fn new(manager: RecordManager) -> Self {
        Self { manager }
    }
}
