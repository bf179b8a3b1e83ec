//! The adapted fetch call.
//!
//! Translates a standard request into bridge parameters, issues the bridge
//! call, funnels the bridge's lifecycle callbacks into a single settlement,
//! and reconciles the pull-based cancellation signal with the bridge's
//! imperative abort handle.

use std::sync::{Arc, Mutex};

use snafu::{OptionExt as _, ResultExt as _};
use tokio::sync::oneshot;
use url::Url;

use crate::error::{AbortedSnafu, FetchError, InvalidUrlSnafu, MissingBridgeSnafu, NetworkSnafu};
use crate::headers::headers_to_map;
use crate::host::bridge::{
    BridgeHooks, BridgeLoad, BridgeParams, ReadyState, RequestBridge, ResponseTypeHint,
};
use crate::host::{self, HostCapabilities};
use crate::location::{LocationProbe, fix_url};
use crate::platform;
use crate::request::{IntoFetchInput, Request, RequestInit};
use crate::response::Response;
use crate::signal::{AbortRegistration, lock};

/// One terminal bridge outcome.
enum Terminal {
    Load(BridgeLoad),
    Error,
    Timeout,
    Abort,
}

type SettleSlot = Arc<Mutex<Option<oneshot::Sender<Terminal>>>>;
type RegistrationSlot = Arc<Mutex<Option<AbortRegistration>>>;

/// Performs a request through the process-wide installed host capabilities.
///
/// This is the drop-in, promise-style replacement for the standard fetch:
/// it resolves to a [`Response`] when the bridge reports a load and rejects
/// with a [`FetchError`] on every other terminal event. The effective bridge
/// is the one resolved by the capability probe on first access.
///
/// # Errors
///
/// See [`FetchError`] for the full taxonomy.
pub async fn fetch(
    input: impl IntoFetchInput,
    init: Option<RequestInit>,
) -> Result<Response, FetchError> {
    let bridge = host::resolved_bridge().context(MissingBridgeSnafu)?;
    let location = host::installed().and_then(|capabilities| capabilities.location.as_ref());
    dispatch(bridge, location, input, init).await
}

/// Performs a request through an explicit set of host capabilities.
///
/// Behaves exactly like [`fetch`] but bypasses the process-wide registry,
/// which keeps the seam testable and lets embedders scope capabilities.
///
/// # Errors
///
/// See [`FetchError`] for the full taxonomy.
pub async fn fetch_with(
    capabilities: &HostCapabilities,
    input: impl IntoFetchInput,
    init: Option<RequestInit>,
) -> Result<Response, FetchError> {
    let bridge = capabilities.bridge().context(MissingBridgeSnafu)?;
    dispatch(bridge, capabilities.location.as_ref(), input, init).await
}

async fn dispatch(
    bridge: &Arc<dyn RequestBridge>,
    location: Option<&LocationProbe>,
    input: impl IntoFetchInput,
    init: Option<RequestInit>,
) -> Result<Response, FetchError> {
    let mut request = Request::new(input, init)?;

    // A signal that is already aborted rejects before any bridge call.
    if request.signal().is_some_and(crate::signal::AbortSignal::is_aborted) {
        return AbortedSnafu.fail();
    }

    let params = translate(&mut request, location)?;
    let signal = request.signal().cloned();

    let (hooks, outcome, registration_slot) = wire_hooks();
    let handle = bridge.issue(params, hooks);

    // Attached after the call is issued. The listener only drives the
    // imperative abort handle; settlement happens solely through the
    // bridge's own on_abort callback.
    if let Some(signal) = &signal {
        let registration = signal.on_abort(move || handle.abort());
        *lock(&registration_slot) = Some(registration);
    }

    // A bridge that drops its hooks without a terminal event broke its
    // contract; report it as a network failure rather than hanging.
    let terminal = outcome.await.unwrap_or(Terminal::Error);

    // One deferred yield before settlement, so synchronous side effects of
    // dispatch are complete before the outcome is observable.
    platform::sleep(platform::Duration::ZERO).await;

    // Every terminal path detaches the cancellation listener.
    drop(lock(&registration_slot).take());

    match terminal {
        Terminal::Load(load) => Response::from_bridge(load).ok().context(NetworkSnafu),
        Terminal::Error | Terminal::Timeout => NetworkSnafu.fail(),
        Terminal::Abort => AbortedSnafu.fail(),
    }
}

/// Converts a standard request into the bridge's flat parameter object.
fn translate(
    request: &mut Request,
    location: Option<&LocationProbe>,
) -> Result<BridgeParams, FetchError> {
    let url = fix_url(request.url(), location);
    let url = Url::parse(&url).context(InvalidUrlSnafu { url: url.clone() })?;

    // Drained exactly once; a prior caller-side read surfaces the standard
    // body-already-consumed failure unmasked.
    let data = request.body_mut().text()?;

    Ok(BridgeParams::builder()
        .method(request.method().as_str().to_uppercase())
        .url(String::from(url))
        .headers(headers_to_map(request.headers()))
        .data(data)
        .binary(true)
        .response_type(ResponseTypeHint::Blob)
        .build())
}

/// Wires one call's hooks to a first-write-wins settlement channel.
///
/// The four terminal hooks race for the single sender; whichever takes it
/// first settles the call, and the rest find the slot empty. The
/// ready-state hook only performs listener cleanup once the bridge reports
/// DONE.
fn wire_hooks() -> (BridgeHooks, oneshot::Receiver<Terminal>, RegistrationSlot) {
    let (sender, receiver) = oneshot::channel();
    let slot: SettleSlot = Arc::new(Mutex::new(Some(sender)));
    let registration = RegistrationSlot::default();

    fn settle(slot: &SettleSlot, outcome: Terminal) {
        if let Some(sender) = lock(slot).take() {
            let _ = sender.send(outcome);
        }
    }

    let hooks = BridgeHooks {
        on_load: {
            let slot = Arc::clone(&slot);
            Box::new(move |load| settle(&slot, Terminal::Load(load)))
        },
        on_error: {
            let slot = Arc::clone(&slot);
            Box::new(move || settle(&slot, Terminal::Error))
        },
        on_timeout: {
            let slot = Arc::clone(&slot);
            Box::new(move || settle(&slot, Terminal::Timeout))
        },
        on_abort: {
            let slot = Arc::clone(&slot);
            Box::new(move || settle(&slot, Terminal::Abort))
        },
        on_ready_state_change: {
            let registration = Arc::clone(&registration);
            Box::new(move |state| {
                if state == ReadyState::Done {
                    // Cleanup only; DONE never settles the call.
                    drop(lock(&registration).take());
                }
            })
        },
    };

    (hooks, receiver, registration)
}
