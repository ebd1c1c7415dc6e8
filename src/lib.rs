pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::{build_router, serve, AppState};
pub use config::ServerConfig;
pub use utils::error::{Result, SandboxError};

#[global_allocator]
static GLOBAL: utils::alloc::TrackingAllocator = utils::alloc::TrackingAllocator;
