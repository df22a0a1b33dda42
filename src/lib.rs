pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod store;
pub mod sync;
pub mod utils;

pub use api::*;
pub use models::*;
pub use utils::*;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
