//! Hash-based routing for the documentation browser.

use crate::config::DEFAULT_GUIDE_PAGE;

/// Documents addressable through the URL fragment.
///
/// URL format: `#package/<name>`, `#module/<pkg>/<module>`, `#guide/<path>`.
/// Anything else resolves to the welcome guide page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Package overview: `#package/jetpack-core`
    Package { name: String },
    /// Module API docs: `#module/jetpack-core/content/worker`
    Module {
        package: String,
        /// Module path; may itself contain `/`
        module: String,
    },
    /// Developer guide page: `#guide/addon-development/about`
    Guide { path: String },
}

impl Route {
    /// Parse a URL fragment (with or without the leading `#`) into a Route.
    ///
    /// Never fails: unrecognized or empty fragments yield [`Route::default_guide`].
    pub fn resolve(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut parts = fragment.split('/');

        match parts.next() {
            Some("package") => Self::Package {
                name: parts.next().unwrap_or_default().to_string(),
            },
            Some("module") => {
                let package = parts.next().unwrap_or_default().to_string();
                let module = parts.collect::<Vec<_>>().join("/");
                Self::Module { package, module }
            }
            Some("guide") => Self::Guide {
                path: fragment.get("guide/".len()..).unwrap_or_default().to_string(),
            },
            _ => Self::default_guide(),
        }
    }

    /// The landing page (`#guide/welcome`).
    pub fn default_guide() -> Self {
        Self::Guide {
            path: DEFAULT_GUIDE_PAGE.to_string(),
        }
    }

    /// Canonical fragment for this route, including the leading `#`.
    pub fn to_hash(&self) -> String {
        match self {
            Self::Package { name } => format!("#package/{}", name),
            Self::Module { package, module } => format!("#module/{}/{}", package, module),
            Self::Guide { path } => format!("#guide/{}", path),
        }
    }
}
