// Adapters layer: concrete implementations for external systems.

pub mod recaptcha;
pub mod storage;

pub use recaptcha::{VerificationClient, VerificationReply};
pub use storage::LocalStorage;
