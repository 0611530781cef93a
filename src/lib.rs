pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{http::HttpRequester, replay::LineReceiver};
pub use config::{ClientConfig, TokenType};
pub use core::capability::{LazyLoadable, LoadState, Requestable};
pub use core::gateway::Gateway;
pub use domain::model::{Channel, ChannelType, Guild, User};
pub use domain::ports::{ApiRequest, EventQueue, Receiver, Requester};
pub use utils::error::{KhlError, Result};
