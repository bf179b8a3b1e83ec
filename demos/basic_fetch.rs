use std::sync::Arc;

use hostfetch::host::HostCapabilities;
use hostfetch::host::bridge::{
    BridgeHandle, BridgeHooks, BridgeLoad, BridgeParams, ReadyState, RequestBridge,
};
use hostfetch::{Bytes, RequestInit, fetch};
use snafu::prelude::*;

/// A stand-in host bridge serving one canned response, the way a privileged
/// environment would resolve the call after doing the real network I/O.
struct CannedBridge;

impl RequestBridge for CannedBridge {
    fn issue(&self, params: BridgeParams, mut hooks: BridgeHooks) -> Arc<dyn BridgeHandle> {
        println!("bridge called: {} {}", params.method, params.url);
        (hooks.on_ready_state_change)(ReadyState::Done);
        (hooks.on_load)(
            BridgeLoad::builder()
                .status(200)
                .status_text("OK")
                .response_headers("Content-Type: text/plain\r\nX-Served-By: canned\r\n")
                .final_url(params.url)
                .response(Bytes::from_static(b"hello from the host bridge"))
                .build(),
        );
        Arc::new(CannedHandle)
    }
}

struct CannedHandle;

impl BridgeHandle for CannedHandle {
    fn abort(&self) {}
}

#[snafu::report]
#[tokio::main]
pub async fn main() -> Result<(), snafu::Whatever> {
    let bridge: Arc<dyn RequestBridge> = Arc::new(CannedBridge);
    hostfetch::host::install(HostCapabilities::builder().request_bridge(bridge).build())
        .whatever_context("Failed to install host capabilities")?;

    let mut response = fetch(
        "https://example.com/greeting",
        Some(RequestInit::builder().method("GET").build()),
    )
    .await
    .whatever_context("Request failed")?;

    println!("status: {} {}", response.status().as_u16(), response.status_text());
    println!("url:    {}", response.url());
    for (name, value) in response.headers() {
        println!("header: {name}: {}", value.to_str().unwrap_or("<binary>"));
    }
    println!(
        "body:   {}",
        response.text().whatever_context("Failed to read body")?
    );

    Ok(())
}
