// Domain layer: host-data models and ports (interfaces) the placement core talks through.

pub mod model;
pub mod ports;
