//! Fragment change detection.
//!
//! Hash observations arrive from either a `hashchange` listener or a polling
//! timer (see [`crate::utils::fragment`]); both funnel into
//! [`FragmentRouter::observe`], which turns genuine changes into navigations.

use crate::config::DEFAULT_HASH;
use crate::models::Route;

/// A single navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// Fragment as found in the URL, without `#` (may be empty)
    pub fragment: String,
    /// Route resolved from the normalized fragment
    pub route: Route,
}

/// Tracks the last resolved hash so repeated observations are no-ops.
#[derive(Debug, Default)]
pub struct FragmentRouter {
    current: Option<String>,
}

impl FragmentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current `location.hash`.
    ///
    /// Returns `None` when the normalized hash equals the last one observed.
    pub fn observe(&mut self, raw_hash: &str) -> Option<Navigation> {
        let hash = normalize_hash(raw_hash);
        if self.current.as_deref() == Some(hash.as_str()) {
            return None;
        }

        let route = Route::resolve(&hash);
        tracing::debug!(%hash, ?route, "fragment changed");
        self.current = Some(hash);

        Some(Navigation {
            fragment: raw_hash.trim_start_matches('#').to_string(),
            route,
        })
    }

    /// Last hash observed, normalized.
    #[cfg(test)]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Empty hashes (`""` or a lone `#`) become [`DEFAULT_HASH`]; others get a
/// leading `#` if missing.
pub fn normalize_hash(raw: &str) -> String {
    if raw.len() <= 1 {
        DEFAULT_HASH.to_string()
    } else if raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("#{}", raw)
    }
}
