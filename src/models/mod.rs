//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Route`] - Hash-based navigation targets
//! - [`PackageIndex`], [`Package`] - Package index and file trees
//! - [`Outline`], [`Section`], [`Entry`] - Sidebar navigation outline

mod outline;
mod package;
mod route;

pub use outline::{Entry, Outline, Section};
pub use package::{Package, PackageIndex};
pub use route::Route;
