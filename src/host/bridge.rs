//! The callback-based request primitive supplied by the host.
//!
//! This module defines the seam that decouples the adapter from any concrete
//! host bridge. The host provides an implementation of [`RequestBridge`];
//! the adapter hands it a fresh [`BridgeParams`] plus a set of
//! [`BridgeHooks`] per call and receives an imperative [`BridgeHandle`] for
//! cancellation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bon::Builder;
use bytes::Bytes;

/// Imperative cancellation handle for an in-flight bridge call.
pub trait BridgeHandle: Send + Sync {
    /// Cancels the call.
    ///
    /// The bridge later reports the cancellation through the call's
    /// `on_abort` hook; aborting does not settle anything by itself.
    fn abort(&self);
}

/// The host's callback-based request primitive.
///
/// Implementations are trusted to invoke exactly one terminal hook
/// (`on_load`, `on_error`, `on_timeout`, or `on_abort`) per issued call.
/// The adapter does not enforce this contract beyond first-settlement-wins.
pub trait RequestBridge: Send + Sync {
    /// Starts a request and returns its abort handle.
    fn issue(&self, params: BridgeParams, hooks: BridgeHooks) -> Arc<dyn BridgeHandle>;
}

/// The flat parameter object handed to the bridge.
///
/// Constructed fresh per call; it has no identity beyond the call.
#[derive(Debug, Clone, Builder)]
pub struct BridgeParams {
    /// Upper-cased HTTP verb.
    #[builder(into)]
    pub method: String,
    /// Absolute request URL.
    #[builder(into)]
    pub url: String,
    /// Header mapping; repetition is already comma-joined away.
    #[builder(default)]
    pub headers: HashMap<String, String>,
    /// Request body drained as text.
    #[builder(default, into)]
    pub data: String,
    /// Forces binary response handling. The adapter always sets this so the
    /// response payload comes back blob-shaped for uniform handling.
    #[builder(default = true)]
    pub binary: bool,
    /// Response payload representation hint.
    #[builder(default)]
    pub response_type: ResponseTypeHint,
}

/// How the bridge should hand back the response payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseTypeHint {
    /// Binary blob; the only hint the adapter ever requests.
    #[default]
    Blob,
}

/// Payload of the bridge's terminal load callback.
#[derive(Debug, Clone, Builder)]
pub struct BridgeLoad {
    /// HTTP status code.
    pub status: u16,
    /// Status line reason phrase.
    #[builder(default, into)]
    pub status_text: String,
    /// Raw header block: `\r\n`/`\n` separated, possibly continuation-folded.
    #[builder(default, into)]
    pub response_headers: String,
    /// Final URL after any redirects the bridge resolved.
    #[builder(default, into)]
    pub final_url: String,
    /// Blob-like response payload.
    pub response: Option<Bytes>,
    /// Raw text fallback when no blob payload is available.
    #[builder(into)]
    pub response_text: Option<String>,
}

/// Ready-state notifications reported alongside the lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Connection opened.
    Opened,
    /// Response headers received.
    HeadersReceived,
    /// Body transfer in progress.
    Loading,
    /// Terminal state reached; the adapter detaches its cancellation
    /// listener here.
    Done,
}

/// Lifecycle callbacks wired into one bridge call.
///
/// The four terminal hooks are one-shot by construction; `on_ready_state_change`
/// may fire any number of times and never settles the call.
pub struct BridgeHooks {
    /// Terminal: the request loaded.
    pub on_load: Box<dyn FnOnce(BridgeLoad) + Send>,
    /// Terminal: the request failed at the network level.
    pub on_error: Box<dyn FnOnce() + Send>,
    /// Terminal: the request timed out.
    pub on_timeout: Box<dyn FnOnce() + Send>,
    /// Terminal: the request was cancelled through the abort handle.
    pub on_abort: Box<dyn FnOnce() + Send>,
    /// Non-terminal progress notification.
    pub on_ready_state_change: Box<dyn FnMut(ReadyState) + Send>,
}

impl fmt::Debug for BridgeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeHooks").finish_non_exhaustive()
    }
}
