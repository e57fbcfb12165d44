// Domain layer: the request body, listener and interceptor seams plus the plain data they exchange.

pub mod model;
pub mod ports;
