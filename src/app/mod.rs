pub mod router;
pub mod server;

pub use router::{build_router, AppState};
pub use server::{run, serve};
