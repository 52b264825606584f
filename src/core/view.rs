//! Views built by the render pipeline.
//!
//! A [`View`] is assembled synchronously from a route and the package index
//! (the "pending view"); its [`Docs`] body is filled in once the route's
//! fetches complete.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DOCUMENT_TITLE_ROOT;
use crate::models::{PackageIndex, Route};

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").expect("valid heading pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Link to a module's documentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleLink {
    pub name: String,
    pub href: String,
}

/// Fields shown on a package page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDetail {
    pub name: String,
    pub version: Option<String>,
    pub license: Option<String>,
    pub authors: Vec<String>,
    /// Empty when the package declares none (the row is hidden)
    pub dependencies: Vec<String>,
    pub modules: Vec<ModuleLink>,
}

impl PackageDetail {
    /// Authors row text, one name per line; `None` hides the row.
    pub fn authors_text(&self) -> Option<String> {
        lines(&self.authors)
    }

    /// Dependencies row text, one package per line; `None` hides the row.
    pub fn dependencies_text(&self) -> Option<String> {
        lines(&self.dependencies)
    }
}

fn lines(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join("\n"))
}

/// Page shell, independent of fetched content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewBody {
    Package(PackageDetail),
    Module { package: String, module: String },
    Guide { path: String },
    /// The route names a package missing from the index
    UnknownPackage { name: String },
}

/// Documentation area of a view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Docs {
    #[default]
    Empty,
    /// Sanitized HTML
    Html(String),
    /// Module docs could not be fetched
    ModuleError {
        source_file: String,
        technical_error: String,
    },
    /// Module docs were fetched but could not be spliced in
    RendererFailed(String),
}

/// Content object queued to become visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub body: ViewBody,
    pub docs: Docs,
}

impl View {
    /// Build the pending view for `route`. Never performs I/O.
    pub fn build(route: &Route, index: &PackageIndex) -> Self {
        let body = match route {
            Route::Package { name } => match index.get(name) {
                Some(pkg) => ViewBody::Package(PackageDetail {
                    name: pkg.name.clone(),
                    version: pkg.version.clone(),
                    license: pkg.license.clone(),
                    authors: pkg.authors(),
                    dependencies: pkg.dependencies.clone(),
                    modules: pkg
                        .modules()
                        .into_iter()
                        .map(|module| ModuleLink {
                            href: Route::Module {
                                package: pkg.name.clone(),
                                module: module.clone(),
                            }
                            .to_hash(),
                            name: module,
                        })
                        .collect(),
                }),
                None => ViewBody::UnknownPackage { name: name.clone() },
            },
            Route::Module { package, module } => {
                if index.get(package).is_some() {
                    ViewBody::Module {
                        package: package.clone(),
                        module: module.clone(),
                    }
                } else {
                    ViewBody::UnknownPackage {
                        name: package.clone(),
                    }
                }
            }
            Route::Guide { path } => ViewBody::Guide { path: path.clone() },
        };

        Self {
            body,
            docs: Docs::Empty,
        }
    }

    /// Text of the first top-level heading the view renders.
    pub fn heading(&self) -> Option<String> {
        match &self.body {
            ViewBody::Package(detail) => Some(detail.name.clone()),
            ViewBody::Module { module, .. } => Some(module.clone()),
            ViewBody::UnknownPackage { .. } => None,
            ViewBody::Guide { .. } => match &self.docs {
                Docs::Html(html) => first_heading(html),
                _ => None,
            },
        }
        .filter(|h| !h.is_empty())
    }

    /// Document title for this view.
    pub fn document_title(&self) -> String {
        match self.heading() {
            Some(heading) => format!("{} - {}", heading, DOCUMENT_TITLE_ROOT),
            None => DOCUMENT_TITLE_ROOT.to_string(),
        }
    }
}

/// Text content of the first `<h1>` in `html`.
fn first_heading(html: &str) -> Option<String> {
    let inner = H1.captures(html)?.get(1)?.as_str();
    let text = TAG.replace_all(inner, "");
    Some(decode_entities(text.trim()))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PackageIndex {
        PackageIndex::from_json(
            r#"{"addon-kit": {
                "version": "0.9",
                "author": "Atul Varma",
                "lib": ["lib"],
                "files": {"lib": {"panel.js": {"size": 1}, "widget.js": {"size": 1}}}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_package_view() {
        let view = View::build(
            &Route::Package {
                name: "addon-kit".to_string(),
            },
            &index(),
        );
        let ViewBody::Package(detail) = &view.body else {
            panic!("expected package view, got {:?}", view.body);
        };
        assert_eq!(detail.version.as_deref(), Some("0.9"));
        assert_eq!(detail.authors, vec!["Atul Varma"]);
        assert!(detail.dependencies.is_empty());
        assert_eq!(detail.dependencies_text(), None);
        assert_eq!(detail.authors_text().as_deref(), Some("Atul Varma"));
        assert_eq!(
            detail.modules,
            vec![
                ModuleLink {
                    name: "panel".to_string(),
                    href: "#module/addon-kit/panel".to_string(),
                },
                ModuleLink {
                    name: "widget".to_string(),
                    href: "#module/addon-kit/widget".to_string(),
                },
            ]
        );
        assert_eq!(view.docs, Docs::Empty);
        assert_eq!(view.document_title(), "addon-kit - Add-on SDK Documentation");
    }

    #[test]
    fn test_multi_value_rows_are_line_separated() {
        let index = PackageIndex::from_json(
            r#"{"addon-kit": {
                "author": "Atul Varma",
                "contributors": ["Myk Melez"],
                "dependencies": ["jetpack-core", "api-utils"],
                "files": {}
            }}"#,
        )
        .unwrap();
        let view = View::build(
            &Route::Package {
                name: "addon-kit".to_string(),
            },
            &index,
        );
        let ViewBody::Package(detail) = &view.body else {
            panic!("expected package view, got {:?}", view.body);
        };
        assert_eq!(
            detail.dependencies_text().as_deref(),
            Some("jetpack-core\napi-utils")
        );
        assert_eq!(detail.authors_text().as_deref(), Some("Atul Varma\nMyk Melez"));
    }

    #[test]
    fn test_unknown_package() {
        let index = index();
        for route in [
            Route::Package {
                name: "nope".to_string(),
            },
            Route::Module {
                package: "nope".to_string(),
                module: "x".to_string(),
            },
        ] {
            let view = View::build(&route, &index);
            assert_eq!(
                view.body,
                ViewBody::UnknownPackage {
                    name: "nope".to_string(),
                }
            );
            assert_eq!(view.document_title(), DOCUMENT_TITLE_ROOT);
        }
    }

    #[test]
    fn test_guide_title_from_first_heading() {
        let mut view = View::build(
            &Route::Guide {
                path: "welcome".to_string(),
            },
            &index(),
        );
        assert_eq!(view.document_title(), DOCUMENT_TITLE_ROOT);

        view.docs = Docs::Html(
            "<p>intro</p><h1 id=\"x\">Tabs &amp; <em>Windows</em></h1><h1>Second</h1>".to_string(),
        );
        assert_eq!(view.heading().as_deref(), Some("Tabs & Windows"));

        view.docs = Docs::Html("<h2>Only a subheading</h2>".to_string());
        assert_eq!(view.heading(), None);

        view.docs = Docs::Html("<h1>  </h1>".to_string());
        assert_eq!(view.document_title(), DOCUMENT_TITLE_ROOT);
    }
}
