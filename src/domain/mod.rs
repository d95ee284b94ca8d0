// Domain layer: core models, stream events and ports. No AWS types here.

pub mod event;
pub mod model;
pub mod ports;
