pub mod delay;
pub mod export;
pub mod inspect;
pub mod memory;
pub mod params;
pub mod static_files;
pub mod upload;
pub mod user_agent;
pub mod verify;

