//! The standard request shape and its construction inputs.
//!
//! [`Request`] is an immutable description of one HTTP call; the adapter
//! only reads it, and its body is consumable exactly once. Anything a
//! caller would hand to the standard fetch (a URL in several flavors or a
//! prebuilt request) converts through [`IntoFetchInput`].

use bon::Builder;
use http::{HeaderMap, Method};
use snafu::ResultExt as _;
use url::Url;

use crate::body::Body;
use crate::error::{FetchError, InvalidMethodSnafu};
use crate::signal::AbortSignal;

/// Optional overrides applied when constructing a [`Request`].
///
/// Any field left unset keeps the input's value; for plain-URL inputs that
/// means `GET`, no headers, an empty body, and no signal.
#[derive(Debug, Default, Builder)]
pub struct RequestInit {
    /// HTTP method, upper-cased at translation time.
    #[builder(into)]
    pub method: Option<String>,
    /// Headers replacing the input's.
    pub headers: Option<HeaderMap>,
    /// Request payload.
    #[builder(into)]
    pub body: Option<Body>,
    /// Cancellation signal for the call.
    pub signal: Option<AbortSignal>,
}

/// Immutable description of one HTTP request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Body,
    signal: Option<AbortSignal>,
}

impl Request {
    /// Builds a request from an input and optional init overrides.
    ///
    /// # Errors
    ///
    /// Fails with [`FetchError::InvalidMethod`] if the init-supplied method
    /// is not a valid HTTP token. URL validation happens at translation
    /// time, after normalization against the document location.
    pub fn new(input: impl IntoFetchInput, init: Option<RequestInit>) -> Result<Self, FetchError> {
        let mut request = match input.into_fetch_input() {
            FetchInput::Url(url) => Self {
                method: Method::GET,
                url,
                headers: HeaderMap::new(),
                body: Body::empty(),
                signal: None,
            },
            FetchInput::Request(request) => request,
        };

        if let Some(init) = init {
            if let Some(method) = init.method {
                request.method =
                    Method::from_bytes(method.as_bytes()).context(InvalidMethodSnafu)?;
            }
            if let Some(headers) = init.headers {
                request.headers = headers;
            }
            if let Some(body) = init.body {
                request.body = body;
            }
            if let Some(signal) = init.signal {
                request.signal = Some(signal);
            }
        }

        Ok(request)
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The target URL as given, before normalization.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The single-use request payload.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// The cancellation signal, if one was attached.
    #[must_use]
    pub fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }
}

/// A value accepted as the first argument to the adapted fetch.
#[derive(Debug)]
pub enum FetchInput {
    /// A URL, possibly empty; normalized and validated at translation time.
    Url(String),
    /// A fully formed request.
    Request(Request),
}

/// Conversion trait for types that can be used as fetch inputs.
pub trait IntoFetchInput {
    /// Converts this value into a [`FetchInput`].
    fn into_fetch_input(self) -> FetchInput;
}

impl IntoFetchInput for FetchInput {
    fn into_fetch_input(self) -> FetchInput {
        self
    }
}

impl IntoFetchInput for Request {
    fn into_fetch_input(self) -> FetchInput {
        FetchInput::Request(self)
    }
}

impl IntoFetchInput for &str {
    fn into_fetch_input(self) -> FetchInput {
        FetchInput::Url(self.to_owned())
    }
}

impl IntoFetchInput for String {
    fn into_fetch_input(self) -> FetchInput {
        FetchInput::Url(self)
    }
}

impl IntoFetchInput for Url {
    fn into_fetch_input(self) -> FetchInput {
        FetchInput::Url(self.into())
    }
}

impl IntoFetchInput for http::Uri {
    fn into_fetch_input(self) -> FetchInput {
        FetchInput::Url(self.to_string())
    }
}
