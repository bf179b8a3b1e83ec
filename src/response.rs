//! The standard response shape produced from bridge terminal events.

use bon::Builder;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use snafu::{ResultExt as _, Snafu};

use crate::body::{Body, BodyError};
use crate::headers::parse_raw_headers;
use crate::host::bridge::BridgeLoad;

/// Metadata for constructing a [`Response`].
#[derive(Debug, Builder)]
pub struct ResponseInit {
    /// HTTP status code.
    #[builder(default = StatusCode::OK)]
    pub status: StatusCode,
    /// Status line reason phrase.
    #[builder(default, into)]
    pub status_text: String,
    /// Response headers.
    #[builder(default)]
    pub headers: HeaderMap,
}

/// Failure to read a response payload as JSON.
#[derive(Debug, Snafu)]
pub enum JsonError {
    /// The payload was already consumed.
    #[snafu(transparent)]
    Body {
        /// The underlying body failure.
        source: BodyError,
    },
    /// The payload was not valid JSON for the target type.
    #[snafu(display("failed to deserialize response body: {source}"))]
    Deserialize {
        /// The underlying deserialization failure.
        source: serde_json::Error,
    },
}

impl crate::Error for JsonError {
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// Response returned by the adapted fetch.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    status_text: String,
    headers: HeaderMap,
    body: Body,
    url: String,
}

impl Response {
    /// Builds a response from a payload and metadata.
    ///
    /// As in the standard contract, the constructor does not accept a URL;
    /// [`Response::url`] starts empty and the adapter overrides it with the
    /// bridge's final resolved URL after construction.
    #[must_use]
    pub fn new(body: impl Into<Body>, init: ResponseInit) -> Self {
        Self {
            status: init.status,
            status_text: init.status_text,
            headers: init.headers,
            body: body.into(),
            url: String::new(),
        }
    }

    /// Builds a response from the bridge's terminal load payload.
    ///
    /// Prefers the blob payload and falls back to the raw text field; the
    /// header block is parsed into a proper collection, and the final
    /// resolved URL is applied over the freshly constructed response.
    pub(crate) fn from_bridge(load: BridgeLoad) -> Result<Self, http::status::InvalidStatusCode> {
        let status = StatusCode::from_u16(load.status)?;
        let body = match load.response {
            Some(bytes) => Body::from(bytes),
            None => load.response_text.map(Body::from).unwrap_or_default(),
        };

        let mut response = Self::new(
            body,
            ResponseInit::builder()
                .status(status)
                .status_text(load.status_text)
                .headers(parse_raw_headers(&load.response_headers))
                .build(),
        );
        response.url = load.final_url;
        Ok(response)
    }

    /// The response status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The status line reason phrase as the bridge reported it.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// The response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The final resolved URL, after any redirects the bridge followed.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Reads the payload as text, consuming it.
    ///
    /// # Errors
    ///
    /// Fails with [`BodyError::AlreadyConsumed`] on a second read.
    pub fn text(&mut self) -> Result<String, BodyError> {
        self.body.text()
    }

    /// Reads the raw payload bytes, consuming them.
    ///
    /// # Errors
    ///
    /// Fails with [`BodyError::AlreadyConsumed`] on a second read.
    pub fn bytes(&mut self) -> Result<bytes::Bytes, BodyError> {
        self.body.bytes()
    }

    /// Deserializes the payload as JSON, consuming it.
    ///
    /// # Errors
    ///
    /// Fails if the payload was already consumed or is not valid JSON for
    /// the target type.
    pub fn json<T: DeserializeOwned>(&mut self) -> Result<T, JsonError> {
        let bytes = self.body.bytes()?;
        serde_json::from_slice(&bytes).context(DeserializeSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::bridge::BridgeLoad;
    use bytes::Bytes;
    use serde::Deserialize;

    fn load() -> BridgeLoad {
        BridgeLoad::builder()
            .status(200)
            .status_text("OK")
            .response_headers("Content-Type: text/plain\r\n")
            .final_url("https://x/y")
            .response(Bytes::from_static(b"hi"))
            .build()
    }

    #[test]
    fn test_from_bridge_applies_final_url() {
        let response = Response::from_bridge(load()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.status_text(), "OK");
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(response.url(), "https://x/y");
    }

    #[test]
    fn test_blob_payload_preferred_over_text() {
        let mut with_both = load();
        with_both.response_text = Some("fallback".to_owned());
        let mut response = Response::from_bridge(with_both).unwrap();
        assert_eq!(response.text().unwrap(), "hi");
    }

    #[test]
    fn test_text_fallback_when_blob_missing() {
        let mut without_blob = load();
        without_blob.response = None;
        without_blob.response_text = Some("fallback".to_owned());
        let mut response = Response::from_bridge(without_blob).unwrap();
        assert_eq!(response.text().unwrap(), "fallback");
    }

    #[test]
    fn test_out_of_range_status_is_rejected() {
        let mut bad = load();
        bad.status = 0;
        assert!(Response::from_bridge(bad).is_err());
    }

    #[test]
    fn test_constructed_response_has_empty_url() {
        let response = Response::new(Body::empty(), ResponseInit::builder().build());
        assert_eq!(response.url(), "");
        assert!(response.ok());
    }

    #[test]
    fn test_ok_reflects_status_class() {
        let response = Response::new(
            Body::empty(),
            ResponseInit::builder()
                .status(StatusCode::NOT_FOUND)
                .status_text("Not Found")
                .build(),
        );
        assert!(!response.ok());
    }

    #[test]
    fn test_json_deserializes_payload() {
        #[derive(Deserialize)]
        struct Payload {
            value: u32,
        }

        let mut response = Response::new(r#"{"value":7}"#, ResponseInit::builder().build());
        let payload: Payload = response.json().unwrap();
        assert_eq!(payload.value, 7);

        // The read consumed the payload.
        assert!(matches!(
            response.json::<Payload>(),
            Err(JsonError::Body { .. })
        ));
    }

    #[test]
    fn test_second_text_read_fails() {
        let mut response = Response::from_bridge(load()).unwrap();
        assert_eq!(response.text().unwrap(), "hi");
        assert!(matches!(response.text(), Err(BodyError::AlreadyConsumed)));
    }
}
