// Domain layer: event model and the ports the handler talks through.

pub mod model;
pub mod ports;
