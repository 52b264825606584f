//! Core navigation and rendering logic.
//!
//! This module provides:
//! - [`FragmentRouter`] fragment change detection
//! - [`RenderPipeline`] fetch/render orchestration with stale-result suppression
//! - [`Presenter`] view transitions where only the newest view is revealed
//! - [`highlight::derive`] sidebar current page/section derivation
//! - [`HeartbeatMonitor`] liveness ping state

pub mod error;
pub mod heartbeat;
pub mod highlight;
pub mod pipeline;
pub mod present;
pub mod router;
pub mod view;

pub use heartbeat::{HeartbeatMonitor, PingOutcome};
pub use highlight::Highlight;
pub use pipeline::{
    ContentSource, DocRenderer, RenderPipeline, RenderToken, RenderedView, Transition, ViewSink,
};
pub use present::{Presenter, Screen};
pub use router::FragmentRouter;
pub use view::{Docs, PackageDetail, View, ViewBody};
