//! Resolution of an omitted request URL to the host document location.
//!
//! Callers of the legacy bridge commonly omit the URL to mean "current
//! page", which the standard request constructor rejects as invalid. The
//! host may provide a [`LocationProbe`] so an empty URL can be substituted
//! with the current document location.

use std::sync::Arc;

use snafu::Snafu;
use url::Url;

/// Why the current document location could not be read.
#[derive(Debug, Snafu)]
pub enum LocationError {
    /// The execution context is sandboxed or detached from a document.
    #[snafu(display("the document location is inaccessible in this context"))]
    Inaccessible,
}

impl crate::Error for LocationError {
    fn is_cancellation(&self) -> bool {
        false
    }
}

/// Host-supplied probe for the current document location.
pub type LocationProbe = Arc<dyn Fn() -> Result<Url, LocationError> + Send + Sync>;

/// Substitutes the current document location for an empty URL.
///
/// A non-empty `url` always passes through untouched. For an empty `url`,
/// a present and successful probe yields the current location; a missing or
/// failing probe falls back to returning `url` unchanged. The probe failure
/// is the one error this adapter deliberately swallows.
#[must_use]
pub fn fix_url(url: &str, probe: Option<&LocationProbe>) -> String {
    if url.is_empty() {
        if let Some(Ok(location)) = probe.map(|probe| probe()) {
            return location.into();
        }
    }
    url.to_owned()
}
