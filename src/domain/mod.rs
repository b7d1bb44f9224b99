// Domain layer: board model and ports (interfaces). Serial and terminal specifics live in adapters.

pub mod model;
pub mod ports;
