// Domain layer: records and ports. Everything else in the crate depends on these.

pub mod model;
pub mod ports;
