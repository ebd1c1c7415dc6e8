pub mod alloc;
pub mod error;
pub mod headers;
pub mod logger;
pub mod monitor;
pub mod validation;
