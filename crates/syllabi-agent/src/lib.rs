//! A conversational agent that answers questions about academic syllabi
//! backed by a hosted document index.
//!
//! The crate includes a CLI tool for chatting in the terminal. You can
//! also use it as a library to embed the agent into a host application.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`syllabi_agent_core`] crate.
pub mod core {
    pub use syllabi_agent_core::*;
}
