// Domain layer: the gateway ports and the lazily loaded khl entities built on them.

pub mod model;
pub mod ports;
