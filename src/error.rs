//! Error types and the [`Error`] trait.
//!
//! All errors in this library implement the [`Error`] trait, which extends
//! [`std::error::Error`] with a cancellation classification. [`BoxedError`]
//! provides type-erased error handling while preserving that classification.
//!
//! Every failure is reported upward as-is; the adapter performs no retries
//! and no local recovery.

use std::convert::Infallible;

use snafu::{AsErrorSource, Snafu};

use crate::platform::MaybeSendSync;

/// Errors that may occur in the library.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync + 'static {
    /// If true, this failure reports a cancelled call rather than a failed one.
    fn is_cancellation(&self) -> bool;
}

impl Error for Infallible {
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// A boxed error that can be used without type parameters.
#[derive(Debug, Snafu)]
#[snafu(transparent)]
pub struct BoxedError {
    source: Box<dyn Error>,
}

impl BoxedError {
    /// Create a new boxed error from a generic `Error`.
    pub fn from_err<E: Error + 'static>(err: E) -> Self {
        Self {
            source: Box::new(err),
        }
    }
}

impl Error for BoxedError {
    fn is_cancellation(&self) -> bool {
        self.source.is_cancellation()
    }
}

/// Errors produced by the adapted fetch call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FetchError {
    /// The call was cancelled, either before dispatch or through the bridge's
    /// abort callback.
    #[snafu(display("Aborted"))]
    Aborted,

    /// The bridge reported a failed or timed-out request.
    ///
    /// Timeouts are not distinguished from generic failures; callers depend
    /// on the uniform shape.
    #[snafu(display("Network request failed"))]
    Network,

    /// The request URL did not resolve to an absolute URL.
    #[snafu(display("invalid request URL {url:?}: {source}"))]
    InvalidUrl {
        /// The URL after normalization.
        url: String,
        /// The underlying parse failure.
        source: url::ParseError,
    },

    /// The requested method is not a valid HTTP token.
    #[snafu(display("invalid request method: {source}"))]
    InvalidMethod {
        /// The underlying parse failure.
        source: http::method::InvalidMethod,
    },

    /// The request body had already been consumed before dispatch.
    #[snafu(transparent)]
    Body {
        /// The underlying body failure.
        source: crate::body::BodyError,
    },

    /// No request bridge capability is available in this process.
    #[snafu(display("no host request bridge capability is installed"))]
    MissingBridge,
}

impl Error for FetchError {
    fn is_cancellation(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}
