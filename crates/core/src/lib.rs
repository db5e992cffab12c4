//! Core orchestration logic: the turn loop, the tool catalog and
//! dispatcher, and the capability interfaces for the hosted
//! collaborators (document index, conversation store, tracing backend).

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
pub mod index;
mod reasoner_client;
pub mod store;
pub mod tool;
pub mod trace;

pub use agent::{Agent, AgentBuilder, EMPTY_MESSAGE_NOTICE, TurnError};
pub use reasoner_client::{ClientResponse, ReasonerClient};
