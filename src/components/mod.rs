//! UI components built with Leptos.
//!
//! - [`router`] - Boot sequence and page layout (main entry point)
//! - [`content`] - Document column (package, module and guide pages)
//! - [`sidebar`] - Outline navigation with current page highlight
//! - [`heartbeat`] - Server liveness ping and banner
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod content;
pub mod heartbeat;
pub mod icons;
pub mod router;
pub mod sidebar;

pub use router::AppRouter;
