// Domain layer: models and ports. Adapters implement the ports, core orchestrates them.

pub mod model;
pub mod ports;
