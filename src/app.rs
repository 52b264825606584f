//! Root application module.
//!
//! Contains the main App component, AppContext definition, DisplayState,
//! and application-level setup logic following Leptos conventions.

use std::sync::Arc;

use leptos::prelude::*;

use crate::components::{AppRouter, heartbeat};
use crate::config::OUTLINE_TOML;
use crate::core::error::OutlineError;
use crate::core::{Highlight, RenderedView};
use crate::models::{Outline, PackageIndex};

// ============================================================================
// DisplayState
// ============================================================================

/// Visibility of the document column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing rendered yet
    #[default]
    Hidden,
    /// Previous content fading out before a swap
    FadingOut,
    Visible,
}

/// The visible slot: written only by the render pipeline's sink.
///
/// # Note
///
/// This struct is `Copy` because all fields are Leptos signals.
#[derive(Clone, Copy)]
pub struct DisplayState {
    /// Last committed view.
    pub view: RwSignal<Option<RenderedView>>,
    pub phase: RwSignal<Phase>,
    /// Sidebar highlight of the committed view.
    pub highlight: RwSignal<Option<Highlight>>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            view: RwSignal::new(None),
            phase: RwSignal::new(Phase::Hidden),
            highlight: RwSignal::new(None),
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and read from any child
/// with `use_context::<AppContext>()`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Package index, set once loaded.
    pub index: RwSignal<Option<Arc<PackageIndex>>>,

    /// Response text of a failed index load (HTTP 500 only).
    pub index_error: RwSignal<Option<String>>,

    /// Sidebar outline; package sections fill in after the index loads.
    pub outline: RwSignal<Outline>,

    /// Rendered document and its transition state.
    pub display: DisplayState,

    /// Server liveness as reported by the heartbeat.
    pub healthy: RwSignal<bool>,
}

impl AppContext {
    /// Creates a new application context.
    ///
    /// The outline is parsed from the embedded TOML; a broken outline is
    /// logged and leaves the sidebar empty.
    pub fn new() -> Self {
        let outline = Outline::from_toml(OUTLINE_TOML)
            .map_err(OutlineError::from)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "sidebar outline unavailable");
                Outline::default()
            });

        Self {
            index: RwSignal::new(None),
            index_error: RwSignal::new(None),
            outline: RwSignal::new(outline),
            display: DisplayState::new(),
            healthy: RwSignal::new(true),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Starts the server heartbeat
/// - Wraps the app in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    heartbeat::start(ctx.healthy);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    max-width: 600px;
                    margin: 4rem auto;
                    padding: 2rem;
                    font-family: Georgia, serif;
                ">
                    <h1 style="color: #b22222; margin-bottom: 1rem;">
                        "Something went wrong"
                    </h1>
                    <p style="color: #555; margin-bottom: 2rem;">
                        "The documentation viewer hit an unexpected error. Please try reloading the page."
                    </p>
                    <details style="background: #f4f4f4; padding: 1rem; margin-bottom: 1rem;">
                        <summary style="cursor: pointer;">"Error details"</summary>
                        <ul style="margin: 1rem 0 0 0; padding-left: 1.5rem; font-size: 0.9rem;">
                            {move || errors.get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                            }
                        </ul>
                    </details>
                    <button
                        on:click=move |_| {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
