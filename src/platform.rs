//! Platform-specific marker traits for cross-platform compatibility.
//!
//! Some traits abstract over `Send`/`Sync` requirements that differ between
//! native platforms and WASM. There is also a deferred sleep used by the
//! settlement paths.

#[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
pub use std::time::Duration;

#[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
pub use web_time::Duration;

/// Suspends the current task for `duration`.
///
/// A zero duration still defers to the host's task queue before resuming,
/// which is the ordering the settlement paths rely on.
#[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Suspends the current task for `duration`.
///
/// A zero duration still defers to the host's task queue before resuming,
/// which is the ordering the settlement paths rely on.
#[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

/// Marker trait for types that may be `Send + Sync`, depending on platform.
#[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
impl<T: Send + Sync> MaybeSendSync for T {}

/// Marker trait for types that may be `Send + Sync`, depending on platform.
#[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
pub trait MaybeSendSync {}
#[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
impl<T> MaybeSendSync for T {}
