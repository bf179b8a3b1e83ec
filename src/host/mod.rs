//! Host environment capabilities and the process-wide bridge probe.
//!
//! Hosts expose the request primitive in one of two shapes: a direct bridge
//! capability, or a namespaced capability object carrying an
//! `xml_http_request` member. [`install`] registers the host's shape once
//! per process; the effective bridge is then resolved by a capability probe
//! computed once on first access, preferring the direct form.

pub mod bridge;

use std::fmt;
use std::sync::{Arc, OnceLock};

use bon::Builder;
use snafu::Snafu;

use crate::location::LocationProbe;
use self::bridge::RequestBridge;

/// The capabilities a host environment provides.
#[derive(Clone, Builder)]
pub struct HostCapabilities {
    /// Direct request bridge capability.
    pub request_bridge: Option<Arc<dyn RequestBridge>>,
    /// Namespaced capability object.
    pub namespace: Option<HostNamespace>,
    /// Probe for the current document location.
    pub location: Option<LocationProbe>,
}

/// The namespaced host capability shape.
#[derive(Clone, Default, Builder)]
pub struct HostNamespace {
    /// The request primitive as exposed under the namespace.
    pub xml_http_request: Option<Arc<dyn RequestBridge>>,
}

impl HostCapabilities {
    /// Resolves the effective request bridge, preferring the direct shape
    /// over the namespaced one.
    #[must_use]
    pub fn bridge(&self) -> Option<&Arc<dyn RequestBridge>> {
        self.request_bridge.as_ref().or_else(|| {
            self.namespace
                .as_ref()
                .and_then(|namespace| namespace.xml_http_request.as_ref())
        })
    }
}

impl fmt::Debug for HostCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCapabilities")
            .field("request_bridge", &self.request_bridge.is_some())
            .field("namespace", &self.namespace.is_some())
            .field("location", &self.location.is_some())
            .finish()
    }
}

impl fmt::Debug for HostNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostNamespace")
            .field("xml_http_request", &self.xml_http_request.is_some())
            .finish()
    }
}

/// The capabilities were already installed by an earlier call.
#[derive(Debug, Snafu)]
#[snafu(display("host capabilities are already installed for this process"))]
pub struct AlreadyInstalled;

impl crate::Error for AlreadyInstalled {
    fn is_cancellation(&self) -> bool {
        false
    }
}

static INSTALLED: OnceLock<HostCapabilities> = OnceLock::new();

/// Installs the host capabilities for this process.
///
/// # Errors
///
/// Fails with [`AlreadyInstalled`] after the first successful call; the
/// installed value is immutable for the life of the process.
pub fn install(capabilities: HostCapabilities) -> Result<(), AlreadyInstalled> {
    INSTALLED.set(capabilities).map_err(|_| AlreadyInstalled)
}

/// Returns the installed capabilities, if any.
#[must_use]
pub fn installed() -> Option<&'static HostCapabilities> {
    INSTALLED.get()
}

/// The effective request bridge, probed once and cached for the process.
pub(crate) fn resolved_bridge() -> Option<&'static Arc<dyn RequestBridge>> {
    static RESOLVED: OnceLock<Option<Arc<dyn RequestBridge>>> = OnceLock::new();
    RESOLVED
        .get_or_init(|| installed().and_then(|capabilities| capabilities.bridge().cloned()))
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::bridge::{BridgeHandle, BridgeHooks, BridgeParams};
    use super::*;

    struct NullBridge;

    impl RequestBridge for NullBridge {
        fn issue(&self, _params: BridgeParams, _hooks: BridgeHooks) -> Arc<dyn BridgeHandle> {
            Arc::new(NullHandle)
        }
    }

    struct NullHandle;

    impl BridgeHandle for NullHandle {
        fn abort(&self) {}
    }

    #[test]
    fn test_probe_prefers_direct_bridge() {
        let direct: Arc<dyn RequestBridge> = Arc::new(NullBridge);
        let namespaced: Arc<dyn RequestBridge> = Arc::new(NullBridge);

        let capabilities = HostCapabilities::builder()
            .request_bridge(Arc::clone(&direct))
            .namespace(
                HostNamespace::builder()
                    .xml_http_request(Arc::clone(&namespaced))
                    .build(),
            )
            .build();

        let resolved = capabilities.bridge().unwrap();
        assert!(Arc::ptr_eq(resolved, &direct));
    }

    #[test]
    fn test_probe_falls_back_to_namespaced_bridge() {
        let namespaced: Arc<dyn RequestBridge> = Arc::new(NullBridge);

        let capabilities = HostCapabilities::builder()
            .namespace(
                HostNamespace::builder()
                    .xml_http_request(Arc::clone(&namespaced))
                    .build(),
            )
            .build();

        let resolved = capabilities.bridge().unwrap();
        assert!(Arc::ptr_eq(resolved, &namespaced));
    }

    #[test]
    fn test_probe_without_bridge_resolves_nothing() {
        let capabilities = HostCapabilities::builder().build();
        assert!(capabilities.bridge().is_none());

        let empty_namespace = HostCapabilities::builder()
            .namespace(HostNamespace::builder().build())
            .build();
        assert!(empty_namespace.bridge().is_none());
    }
}
