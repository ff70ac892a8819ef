//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use exercise_tracker_core::ports::UserStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The store is held behind the `UserStore` port so the in-memory and
/// Postgres backings are interchangeable here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<Config>,
}
