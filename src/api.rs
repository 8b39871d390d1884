//! HTTP API for a browser chat client
//!
//! Exposes the single session: snapshots, draft updates, submit, clear,
//! suggested prompts and a live event stream.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::runtime::ProductionSession;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ProductionSession>,
}

impl AppState {
    pub fn new(session: ProductionSession) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}
