use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ReasonerRequest;
use crate::response::ReasonerResponse;

/// The error type for a reasoner backend.
pub trait ReasonerError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a hosted reasoning service, which takes a
/// conversation along with a tool catalog and produces a response.
///
/// Once the reasoner is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the reasoner should be prepared for being dropped anytime.
pub trait Reasoner: Send + Sync {
    /// The error type that may be returned by the reasoner.
    type Error: ReasonerError;

    /// The response type for this reasoner.
    type Response: ReasonerResponse<Error = Self::Error>;

    /// Sends a request to the reasoning service.
    fn send_request(
        &self,
        req: &ReasonerRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static;
}
