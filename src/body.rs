//! Single-use request and response payloads.
//!
//! A [`Body`] may be read exactly once; a second read fails with
//! [`BodyError::AlreadyConsumed`]. The adapter relies on this when draining
//! a request body for translation, and never masks the failure if a caller
//! consumed the body beforehand.

use bytes::Bytes;
use snafu::Snafu;

/// Failure to read a payload.
#[derive(Debug, Snafu)]
pub enum BodyError {
    /// The payload was already read once.
    #[snafu(display("Body has already been consumed"))]
    AlreadyConsumed,
}

impl crate::Error for BodyError {
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// A payload that may be read exactly once.
#[derive(Debug)]
pub struct Body {
    payload: Option<Bytes>,
}

impl Body {
    /// An empty payload, still consumable exactly once.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            payload: Some(Bytes::new()),
        }
    }

    /// Reads the payload as text, consuming it.
    ///
    /// # Errors
    ///
    /// Fails with [`BodyError::AlreadyConsumed`] on a second read.
    pub fn text(&mut self) -> Result<String, BodyError> {
        let bytes = self.take()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads the raw payload bytes, consuming them.
    ///
    /// # Errors
    ///
    /// Fails with [`BodyError::AlreadyConsumed`] on a second read.
    pub fn bytes(&mut self) -> Result<Bytes, BodyError> {
        self.take()
    }

    /// Returns `true` once the payload has been read.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.payload.is_none()
    }

    fn take(&mut self) -> Result<Bytes, BodyError> {
        self.payload.take().ok_or(BodyError::AlreadyConsumed)
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(payload: Bytes) -> Self {
        Self {
            payload: Some(payload),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(payload: Vec<u8>) -> Self {
        Bytes::from(payload).into()
    }
}

impl From<String> for Body {
    fn from(payload: String) -> Self {
        Bytes::from(payload).into()
    }
}

impl From<&str> for Body {
    fn from(payload: &str) -> Self {
        Bytes::copy_from_slice(payload.as_bytes()).into()
    }
}
