// Domain layer: data model and ports (interfaces). Only std/serde here.

pub mod model;
pub mod ports;
