//! Adapts a privileged, callback-based host request primitive to the
//! standard promise-style fetch contract.
//!
//! The host environment exposes a legacy request bridge driven entirely by
//! lifecycle callbacks and cancelled through an imperative handle. Modern
//! client code expects the standard fetch shape: a single awaitable call,
//! a structured [`Response`], and a pull-based cancellation signal. This
//! crate is the translator between the two: it converts requests into the
//! bridge's flat parameter object, converts the bridge's terminal callback
//! back into a response, and reconciles the two cancellation models. The
//! bridge's own network I/O stays the host's business.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]

pub mod body;
mod error;
mod fetch;
pub mod headers;
pub mod host;
pub mod location;
pub mod platform;
pub mod prelude;
pub mod request;
pub mod response;
pub mod signal;

pub use error::{BoxedError, Error, FetchError};
pub use fetch::{fetch, fetch_with};
pub use request::{FetchInput, IntoFetchInput, Request, RequestInit};
pub use response::{Response, ResponseInit};

/// Documentation
pub mod _documentation {
    #[doc = include_str!("../README.md")]
    mod readme {}
    #[doc = include_str!("../CHANGELOG.md")]
    pub mod changelog {}
}

pub use bytes::Bytes;
