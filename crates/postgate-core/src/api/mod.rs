//! HTTP transport for the postapi backend.
//!
//! The submissions talk to the backend through the `Transport` trait so the
//! network call stays awaitable and can be swapped out in tests. `ApiClient`
//! is the `reqwest` implementation used by the binary.

pub mod client;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{RawResponse, Transport};
