//! Application router component.
//!
//! Boots the documentation browser: loads the package index, builds the
//! render pipeline, and feeds it every fragment change.
//!
//! # Architecture
//!
//! - **URL hash is the source of truth**: each distinct fragment becomes one
//!   navigation through [`FragmentRouter`]
//! - **Layout never re-renders on navigation**: only the document column and
//!   the sidebar highlight follow [`DisplayState`]
//! - **One writer**: [`SignalScreen`] is the only code that touches the
//!   visible slot, and only with results that passed the pipeline's stale
//!   check and were still the newest when their transition completed

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::{AppContext, DisplayState, Phase};
use crate::components::content::MainContent;
use crate::components::heartbeat::ConnectionBanner;
use crate::components::sidebar::Sidebar;
use crate::config::PACKAGE_INDEX_URL;
use crate::config::animation::FADE_OUT_MS;
use crate::config::dom_ids::{RIGHT_COLUMN, SIDENOTES};
use crate::core::present::Presented;
use crate::core::{FragmentRouter, Presenter, RenderPipeline, RenderedView, Screen, ViewSink};
use crate::utils::{FragmentWatcher, HttpSource, MarkdownRenderer, dom, fetch_index};

stylance::import_crate_style!(css, "src/components/layout.module.css");

// ============================================================================
// Main Router
// ============================================================================

/// Main application router.
///
/// Renders the fixed page layout and starts the boot sequence once.
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    boot(ctx);

    view! {
        <div class=css::layout>
            <ConnectionBanner />
            <Sidebar />
            <MainContent />
        </div>
    }
}

// ============================================================================
// Boot
// ============================================================================

/// Load the index, then route the current fragment and every later change.
///
/// Index failures stop here: no navigation is ever issued. HTTP 500
/// responses are surfaced in the sidebar banner.
fn boot(ctx: AppContext) {
    spawn_local(async move {
        let index = match fetch_index(PACKAGE_INDEX_URL).await {
            Ok(index) => Arc::new(index),
            Err(e) => {
                tracing::error!(error = %e, "package index unavailable");
                if e.status() == Some(500) {
                    ctx.index_error.set(Some(e.technical_text()));
                }
                return;
            }
        };
        if index.is_empty() {
            tracing::warn!("package index lists no packages");
        } else {
            tracing::info!(packages = index.len(), "package index loaded");
        }

        let outline = ctx.outline.get_untracked().with_packages(&index);
        ctx.outline.set(outline.clone());
        ctx.index.set(Some(Arc::clone(&index)));

        let pipeline = Rc::new(RenderPipeline::new(
            index,
            outline,
            HttpSource,
            MarkdownRenderer,
            SignalSink::new(ctx.display),
        ));
        let router = Rc::new(RefCell::new(FragmentRouter::new()));

        let check_hash = move || {
            let navigation = router.borrow_mut().observe(&dom::get_hash());
            if let Some(navigation) = navigation {
                let pipeline = Rc::clone(&pipeline);
                spawn_local(async move {
                    pipeline.navigate(navigation).await;
                });
            }
        };

        check_hash();
        FragmentWatcher::start(check_hash).forget();
    });
}

// ============================================================================
// Signal Sink
// ============================================================================

/// Hands committed views to a [`Presenter`] over the signal-backed screen.
struct SignalSink {
    presenter: Rc<Presenter<SignalScreen>>,
}

impl SignalSink {
    fn new(display: DisplayState) -> Self {
        Self {
            presenter: Presenter::new(SignalScreen { display }),
        }
    }
}

impl ViewSink for SignalSink {
    fn show(&self, rendered: RenderedView) {
        let transition = self.presenter.present(rendered);
        spawn_local(async move {
            match transition.await {
                Presented::Shown(token) => tracing::debug!(?token, "view revealed"),
                Presented::Superseded(token) => tracing::debug!(?token, "view superseded"),
            }
        });
    }
}

/// Writes views into [`DisplayState`] and runs the DOM passes.
struct SignalScreen {
    display: DisplayState,
}

impl Screen for SignalScreen {
    async fn leave(&self) {
        dom::scroll_to_top().await;
        self.display.phase.set(Phase::FadingOut);
        TimeoutFuture::new(FADE_OUT_MS).await;
    }

    fn swap(&self, rendered: RenderedView) {
        self.display.highlight.set(Some(rendered.highlight.clone()));
        self.display.view.set(Some(rendered));
    }

    async fn settle(&self) {
        TimeoutFuture::new(0).await;
    }

    fn reveal(&self, title: &str) {
        dom::retarget_internal_links(RIGHT_COLUMN);
        dom::layout_sidenotes(RIGHT_COLUMN, SIDENOTES);
        dom::highlight_code(RIGHT_COLUMN);
        dom::set_document_title(title);
        self.display.phase.set(Phase::Visible);
    }
}
