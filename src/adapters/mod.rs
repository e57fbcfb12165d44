// Adapters layer: concrete request bodies and the bridge to the HTTP transport.

pub mod body;
pub mod network;
