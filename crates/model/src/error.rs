/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The content is moderated.
    Moderated,
    /// The reasoning service is rate limited.
    RateLimitExceeded,
    /// Any other upstream errors (network, auth, malformed response).
    Other,
}
