//! Server heartbeat.
//!
//! Drives [`HeartbeatMonitor`] with long-poll pings of the SDK server and
//! shows a banner while the server cannot be reached.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::{IDLE_PING_DELAY_MS, IDLE_URL};
use crate::core::{HeartbeatMonitor, PingOutcome};
use crate::utils::dom;

stylance::import_crate_style!(css, "src/components/heartbeat/heartbeat.module.css");

/// Start probing in the background, reporting health into `healthy`.
///
/// Pages opened from disk have no server to ping.
pub fn start(healthy: RwSignal<bool>) {
    if dom::is_file_origin() {
        tracing::debug!("file origin, heartbeat disabled");
        return;
    }

    let monitor = Rc::new(RefCell::new(HeartbeatMonitor::new()));
    spawn_local(async move {
        loop {
            TimeoutFuture::new(IDLE_PING_DELAY_MS).await;

            let id = monitor.borrow_mut().begin_ping();
            {
                let monitor = Rc::clone(&monitor);
                spawn_local(async move {
                    TimeoutFuture::new(IDLE_PING_DELAY_MS).await;
                    let change = monitor.borrow_mut().window_elapsed(id);
                    if let Some(value) = change {
                        healthy.set(value);
                    }
                });
            }

            let outcome = ping().await;
            let change = monitor.borrow_mut().ping_finished(id, outcome);
            if let Some(value) = change {
                healthy.set(value);
            }
            if monitor.borrow().is_disabled() {
                break;
            }
        }
    });
}

async fn ping() -> PingOutcome {
    match Request::get(IDLE_URL).send().await {
        Ok(response) if response.ok() => PingOutcome::Responded,
        Ok(response) => PingOutcome::Failed {
            status: Some(response.status()),
        },
        Err(e) => {
            tracing::debug!(error = %e, "idle ping failed");
            PingOutcome::Failed { status: None }
        }
    }
}

/// Banner shown while the server is unreachable.
#[component]
pub fn ConnectionBanner() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    view! {
        <Show when=move || !ctx.healthy.get()>
            <div id="cannot-ping" class=css::banner role="alert">
                <span class=css::icon><Icon icon=ic::NETWORK /></span>
                <span>
                    "Cannot reach the SDK server. It may have been stopped; "
                    "pages that are not loaded yet will be unavailable."
                </span>
            </div>
        </Show>
    }
}
