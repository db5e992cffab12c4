//! An abstraction layer for the hosted reasoning service.
//!
//! This crate establishes an unified protocol for the agent to interact
//! with whatever service produces the tool decisions and the streamed
//! answers, so that concrete hosted backends can be swapped without
//! modifying the orchestration code.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.
//!
//! Users of this crate may add some extra functionalities or wrappers,
//! depending on their own use cases. Those extra code should be placed
//! in their own crate.

#![deny(missing_docs)]

mod error;
mod opaque;
mod reasoner;
mod request;
mod response;

pub use error::*;
pub use opaque::*;
pub use reasoner::*;
pub use request::*;
pub use response::*;
