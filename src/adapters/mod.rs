// Adapters layer: concrete requester and receiver implementations for the gateway ports.

pub mod http;
pub mod replay;
