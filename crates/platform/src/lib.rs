//! Clients for the agent platform backend: the task message store and
//! the span tracing service.

#[macro_use]
extern crate tracing;

mod config;
mod messages;
mod spans;

pub use config::{PlatformConfig, PlatformConfigBuilder};
pub use messages::MessageStoreClient;
pub use spans::TraceClient;
