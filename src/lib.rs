pub mod api;
pub mod bots;
pub mod config;
pub mod error;
pub mod markdown;
pub mod meta;
pub mod slug;
pub mod upstream;

use config::Config;
use std::sync::Arc;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}
