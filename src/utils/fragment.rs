//! Fragment change sources.
//!
//! Hosts with native `hashchange` events get a listener; others get a timer
//! polling `location.hash`. Either way the callback only signals "the hash
//! may have changed"; deduplication happens in
//! [`FragmentRouter`](crate::core::FragmentRouter).

use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use super::dom;
use crate::config::CHECK_HASH_DELAY_MS;

/// Active fragment change source. Dropping it stops notifications.
pub enum FragmentWatcher {
    HashChange(Closure<dyn Fn()>),
    Polling(Interval),
}

impl FragmentWatcher {
    /// Start watching, preferring native events.
    pub fn start(on_change: impl Fn() + 'static) -> Self {
        let on_change = Rc::new(on_change);

        if dom::supports_hashchange()
            && let Some(window) = dom::window()
        {
            let listener = Rc::clone(&on_change);
            let closure = Closure::wrap(Box::new(move || listener()) as Box<dyn Fn()>);
            if window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref())
                .is_ok()
            {
                return Self::HashChange(closure);
            }
        }

        tracing::debug!(interval_ms = CHECK_HASH_DELAY_MS, "polling location.hash");
        Self::Polling(Interval::new(CHECK_HASH_DELAY_MS, move || on_change()))
    }

    /// Keep watching for the rest of the session.
    pub fn forget(self) {
        match self {
            Self::HashChange(closure) => closure.forget(),
            Self::Polling(interval) => {
                interval.forget();
            }
        }
    }
}
