// Domain layer: request-scoped models and the storage port.

pub mod model;
pub mod ports;
