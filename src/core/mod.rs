pub mod capability;
pub mod gateway;

pub use crate::domain::ports::{ApiRequest, EventQueue, Receiver, Requester};
pub use crate::utils::error::Result;
