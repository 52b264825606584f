//! Render pipeline: pending view -> fetch -> stale check -> display.
//!
//! # Stale results
//!
//! Every navigation issues a [`RenderToken`] from a monotonically increasing
//! counter and stores it as the current token. In-flight fetches are never
//! cancelled; when one completes, its token is compared with the current one
//! and the result is dropped unless they match. Completions may arrive in any
//! order; only the latest navigation ever reaches the [`ViewSink`].

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use crate::config::{GUIDE_ROOT, README_FILE};
use crate::core::error::{FetchError, RenderError};
use crate::core::highlight::{self, Highlight};
use crate::core::router::Navigation;
use crate::core::view::{Docs, View};
use crate::models::{Outline, Package, PackageIndex, Route};

// =============================================================================
// Collaborators
// =============================================================================

/// Text fetcher for documentation assets.
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Document transforms.
pub trait DocRenderer {
    /// Markdown to sanitized HTML.
    fn markdown(&self, source: &str) -> Result<String, RenderError>;
    /// Pre-rendered API documentation fragment to sanitized HTML.
    fn api_fragment(&self, fragment: &str) -> Result<String, RenderError>;
}

/// Receives views that passed the stale check.
pub trait ViewSink {
    fn show(&self, rendered: RenderedView);
}

// =============================================================================
// Tokens and Results
// =============================================================================

/// Identity of one navigation's pending view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderToken(u64);

impl RenderToken {
    #[cfg(test)]
    pub fn from_raw(n: u64) -> Self {
        Self(n)
    }
}

/// How the previous content leaves the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// First render of the session
    Instant,
    /// Scroll to top and fade out first
    Fade,
}

/// Everything the display needs for one committed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedView {
    pub token: RenderToken,
    pub view: View,
    pub transition: Transition,
    pub title: String,
    /// Target of the "view source" link; `None` means an empty target
    pub source_url: Option<String>,
    pub highlight: Highlight,
}

/// Outcome of a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    Rendered(RenderToken),
    /// A newer navigation was issued before this one completed
    Discarded(RenderToken),
}

struct Pending {
    token: RenderToken,
    navigation: Navigation,
    view: View,
}

struct Loaded {
    token: RenderToken,
    fragment: String,
    view: View,
    source_url: Option<String>,
}

#[derive(Debug, Default)]
struct PipelineState {
    issued: u64,
    current: Option<RenderToken>,
    rendered_once: bool,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Owns the current token; the only writer of the visible content (through
/// its sink).
pub struct RenderPipeline<S, R, K> {
    index: Arc<PackageIndex>,
    outline: Outline,
    source: S,
    renderer: R,
    sink: K,
    state: RefCell<PipelineState>,
}

impl<S, R, K> RenderPipeline<S, R, K>
where
    S: ContentSource,
    R: DocRenderer,
    K: ViewSink,
{
    pub fn new(index: Arc<PackageIndex>, outline: Outline, source: S, renderer: R, sink: K) -> Self {
        Self {
            index,
            outline,
            source,
            renderer,
            sink,
            state: RefCell::new(PipelineState::default()),
        }
    }

    /// Navigate to `navigation.route`.
    ///
    /// The pending view is built and its token made current before this
    /// returns; the returned future performs the fetches and the commit.
    pub fn navigate(&self, navigation: Navigation) -> impl Future<Output = Commit> + '_ {
        let pending = self.begin(navigation);
        async move {
            let loaded = self.load(pending).await;
            self.commit(loaded)
        }
    }

    /// Token of the most recently issued navigation.
    #[cfg(test)]
    pub fn current_token(&self) -> Option<RenderToken> {
        self.state.borrow().current
    }

    fn begin(&self, navigation: Navigation) -> Pending {
        let view = View::build(&navigation.route, &self.index);

        let mut state = self.state.borrow_mut();
        state.issued += 1;
        let token = RenderToken(state.issued);
        state.current = Some(token);
        tracing::debug!(?token, route = ?navigation.route, "navigation issued");

        Pending {
            token,
            navigation,
            view,
        }
    }

    async fn load(&self, pending: Pending) -> Loaded {
        let Pending {
            token,
            navigation,
            mut view,
        } = pending;

        let source_url = match &navigation.route {
            Route::Package { name } => match self.index.get(name) {
                Some(pkg) => {
                    view.docs = self.readme_docs(pkg).await;
                    Some(pkg.file_url(README_FILE))
                }
                None => None,
            },
            Route::Module { package, module } => match self.index.get(package) {
                Some(pkg) => {
                    view.docs = self.module_docs(pkg, module).await;
                    Some(pkg.file_url(&module_source_file(module)))
                }
                None => None,
            },
            Route::Guide { path } => {
                let url = guide_url(path);
                match self.guide_docs(&url).await {
                    Some(html) => {
                        view.docs = Docs::Html(html);
                        Some(url)
                    }
                    None => None,
                }
            }
        };

        Loaded {
            token,
            fragment: navigation.fragment,
            view,
            source_url,
        }
    }

    fn commit(&self, loaded: Loaded) -> Commit {
        let token = loaded.token;
        let transition = {
            let mut state = self.state.borrow_mut();
            if state.current != Some(token) {
                tracing::debug!(?token, current = ?state.current, "discarding stale render");
                return Commit::Discarded(token);
            }
            let transition = if state.rendered_once {
                Transition::Fade
            } else {
                Transition::Instant
            };
            state.rendered_once = true;
            transition
        };

        let rendered = RenderedView {
            token,
            title: loaded.view.document_title(),
            highlight: highlight::derive(&self.outline, &loaded.fragment),
            view: loaded.view,
            transition,
            source_url: loaded.source_url,
        };
        self.sink.show(rendered);
        Commit::Rendered(token)
    }

    /// README is best-effort: any failure leaves the docs area empty.
    async fn readme_docs(&self, pkg: &Package) -> Docs {
        if !pkg.has_file(README_FILE) {
            return Docs::Empty;
        }
        let text = match self.source.fetch_text(&pkg.file_url(README_FILE)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(package = %pkg.name, error = %e, "readme unavailable");
                return Docs::Empty;
            }
        };
        match self.renderer.markdown(&text) {
            Ok(html) => Docs::Html(html),
            Err(e) => {
                tracing::warn!(package = %pkg.name, error = %e, "readme rendering failed");
                Docs::Empty
            }
        }
    }

    /// Module docs surface failures: fetch errors become an error panel,
    /// transform errors an inline message.
    async fn module_docs(&self, pkg: &Package, module: &str) -> Docs {
        let source_file = module_source_file(module);
        if !pkg.has_file(&source_file) {
            return Docs::Empty;
        }
        let div_file = format!("{}.div", source_file);
        match self.source.fetch_text(&pkg.file_url(&div_file)).await {
            Ok(fragment) => match self.renderer.api_fragment(&fragment) {
                Ok(html) => Docs::Html(html),
                Err(e) => Docs::RendererFailed(e.to_string()),
            },
            Err(e) => {
                tracing::warn!(package = %pkg.name, %module, error = %e, "module docs fetch failed");
                Docs::ModuleError {
                    source_file,
                    technical_error: e.technical_text(),
                }
            }
        }
    }

    /// Guide pages degrade silently to an empty body.
    async fn guide_docs(&self, url: &str) -> Option<String> {
        let text = self
            .source
            .fetch_text(url)
            .await
            .inspect_err(|e| tracing::debug!(%url, error = %e, "guide page unavailable"))
            .ok()?;
        self.renderer
            .markdown(&text)
            .inspect_err(|e| tracing::warn!(%url, error = %e, "guide rendering failed"))
            .ok()
    }
}

/// `docs/<module>.md`, relative to the package root.
fn module_source_file(module: &str) -> String {
    format!("docs/{}.md", module)
}

fn guide_url(path: &str) -> String {
    format!("{}/{}.md", GUIDE_ROOT, path)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use tokio::sync::oneshot;

    use super::*;
    use crate::core::router::FragmentRouter;
    use crate::core::view::ViewBody;

    const INDEX: &str = r#"{
        "jetpack-core": {
            "keywords": ["jetpack-low-level"],
            "lib": ["lib"],
            "files": {
                "README.md": {"size": 10},
                "lib": {"a.js": {"size": 1}, "b.js": {"size": 1}},
                "docs": {"b.md": {"size": 1}}
            }
        },
        "addon-kit": {
            "files": {"lib": {"panel.js": {"size": 1}}},
            "lib": ["lib"]
        }
    }"#;

    const OUTLINE: &str = r#"
        default_section = "start"
        [[sections]]
        id = "start"
        title = "Start"
        header = "welcome"
        [[sections]]
        id = "low"
        title = "Low-Level APIs"
        packages = "low-level"
    "#;

    /// Source answering from a fixed table; unknown URLs are 404s.
    /// Gated URLs wait for the test to release them.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<String, Result<String, FetchError>>,
        gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        fn failing(mut self, url: &str, err: FetchError) -> Self {
            self.pages.insert(url.to_string(), Err(err));
            self
        }

        fn gate(&self, url: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.borrow_mut().insert(url.to_string(), rx);
            tx
        }
    }

    impl ContentSource for Rc<FakeSource> {
        async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            let gate = self.gates.borrow_mut().remove(url);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.pages.get(url).cloned().unwrap_or(Err(FetchError::HttpError {
                status: 404,
                body: "Not Found".to_string(),
            }))
        }
    }

    /// Wraps markdown in a paragraph; `!fail` inputs are rejected.
    struct FakeRenderer;

    impl DocRenderer for FakeRenderer {
        fn markdown(&self, source: &str) -> Result<String, RenderError> {
            if source.starts_with("!fail") {
                return Err(RenderError::Markdown("bad input".to_string()));
            }
            Ok(format!("<p>{}</p>", source.trim()))
        }

        fn api_fragment(&self, fragment: &str) -> Result<String, RenderError> {
            if fragment.starts_with("!fail") {
                return Err(RenderError::Fragment("unbalanced markup".to_string()));
            }
            Ok(fragment.to_string())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<RenderedView>>>);

    impl RecordingSink {
        fn shown(&self) -> Vec<RenderedView> {
            self.0.borrow().clone()
        }
    }

    impl ViewSink for RecordingSink {
        fn show(&self, rendered: RenderedView) {
            self.0.borrow_mut().push(rendered);
        }
    }

    type TestPipeline = RenderPipeline<Rc<FakeSource>, FakeRenderer, RecordingSink>;

    fn pipeline(source: FakeSource) -> (TestPipeline, Rc<FakeSource>, RecordingSink) {
        let index = Arc::new(PackageIndex::from_json(INDEX).unwrap());
        let outline = Outline::from_toml(OUTLINE).unwrap().with_packages(&index);
        let source = Rc::new(source);
        let sink = RecordingSink::default();
        let pipeline = RenderPipeline::new(
            index,
            outline,
            Rc::clone(&source),
            FakeRenderer,
            sink.clone(),
        );
        (pipeline, source, sink)
    }

    fn nav(fragment: &str) -> Navigation {
        Navigation {
            fragment: fragment.to_string(),
            route: Route::resolve(fragment),
        }
    }

    // =========================================================================
    // Per-route Loading
    // =========================================================================

    #[tokio::test(flavor = "current_thread")]
    async fn test_package_view_with_readme() {
        let source = FakeSource::default().page("packages/jetpack-core/README.md", "core docs");
        let (pipeline, _, sink) = pipeline(source);

        let commit = pipeline.navigate(nav("package/jetpack-core")).await;
        assert!(matches!(commit, Commit::Rendered(_)));

        let shown = sink.shown();
        assert_eq!(shown.len(), 1);
        let rendered = &shown[0];
        let ViewBody::Package(detail) = &rendered.view.body else {
            panic!("expected package view");
        };
        let modules: Vec<_> = detail.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(modules, vec!["a", "b"]);
        assert_eq!(rendered.view.docs, Docs::Html("<p>core docs</p>".to_string()));
        assert_eq!(
            rendered.source_url.as_deref(),
            Some("packages/jetpack-core/README.md")
        );
        assert_eq!(rendered.title, "jetpack-core - Add-on SDK Documentation");
        assert_eq!(rendered.highlight.active_section, "low");
        assert_eq!(rendered.transition, Transition::Instant);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_package_readme_failures_are_silent() {
        let source = FakeSource::default().page("packages/jetpack-core/README.md", "!fail");
        let (pipeline, source, sink) = pipeline(source);

        pipeline.navigate(nav("package/jetpack-core")).await;
        assert_eq!(sink.shown()[0].view.docs, Docs::Empty);

        // addon-kit has no README in its tree: nothing is fetched
        pipeline.navigate(nav("package/addon-kit")).await;
        assert_eq!(sink.shown()[1].view.docs, Docs::Empty);
        assert_eq!(
            source.requested.borrow().as_slice(),
            ["packages/jetpack-core/README.md"]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_module_without_source_skips_fetch() {
        let (pipeline, source, sink) = pipeline(FakeSource::default());

        let commit = pipeline.navigate(nav("module/jetpack-core/a")).await;
        assert!(matches!(commit, Commit::Rendered(_)));
        assert!(source.requested.borrow().is_empty());

        let rendered = &sink.shown()[0];
        assert_eq!(
            rendered.view.body,
            ViewBody::Module {
                package: "jetpack-core".to_string(),
                module: "a".to_string(),
            }
        );
        assert_eq!(rendered.view.docs, Docs::Empty);
        assert_eq!(
            rendered.source_url.as_deref(),
            Some("packages/jetpack-core/docs/a.md")
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_module_fragment_spliced() {
        let source = FakeSource::default()
            .page("packages/jetpack-core/docs/b.md.div", "<div class=\"api\">b</div>");
        let (pipeline, _, sink) = pipeline(source);

        pipeline.navigate(nav("module/jetpack-core/b")).await;
        let rendered = &sink.shown()[0];
        assert_eq!(
            rendered.view.docs,
            Docs::Html("<div class=\"api\">b</div>".to_string())
        );
        assert_eq!(rendered.title, "b - Add-on SDK Documentation");
        assert_eq!(
            rendered.highlight.active_entry.as_deref(),
            Some("#module/jetpack-core/b")
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_module_fetch_failure_shows_error_panel() {
        let source = FakeSource::default().failing(
            "packages/jetpack-core/docs/b.md.div",
            FetchError::HttpError {
                status: 500,
                body: "SyntaxError at line 3".to_string(),
            },
        );
        let (pipeline, _, sink) = pipeline(source);

        pipeline.navigate(nav("module/jetpack-core/b")).await;
        assert_eq!(
            sink.shown()[0].view.docs,
            Docs::ModuleError {
                source_file: "docs/b.md".to_string(),
                technical_error: "SyntaxError at line 3".to_string(),
            }
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_module_renderer_failure_is_inline() {
        let source =
            FakeSource::default().page("packages/jetpack-core/docs/b.md.div", "!fail <div>");
        let (pipeline, _, sink) = pipeline(source);

        pipeline.navigate(nav("module/jetpack-core/b")).await;
        assert_eq!(
            sink.shown()[0].view.docs,
            Docs::RendererFailed("unbalanced markup".to_string())
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_guide_page() {
        let source = FakeSource::default().page("md/dev-guide/welcome.md", "hello");
        let (pipeline, _, sink) = pipeline(source);

        pipeline.navigate(nav("")).await;
        let rendered = &sink.shown()[0];
        assert_eq!(rendered.view.docs, Docs::Html("<p>hello</p>".to_string()));
        assert_eq!(rendered.source_url.as_deref(), Some("md/dev-guide/welcome.md"));
        assert_eq!(rendered.highlight.active_section, "start");
        assert_eq!(rendered.highlight.active_entry, None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_missing_guide_renders_empty_shell() {
        let (pipeline, _, sink) = pipeline(FakeSource::default());

        let commit = pipeline.navigate(nav("guide/missing-page")).await;
        assert!(matches!(commit, Commit::Rendered(_)));

        let rendered = &sink.shown()[0];
        assert_eq!(
            rendered.view.body,
            ViewBody::Guide {
                path: "missing-page".to_string(),
            }
        );
        assert_eq!(rendered.view.docs, Docs::Empty);
        assert_eq!(rendered.source_url, None);
        assert_eq!(rendered.title, "Add-on SDK Documentation");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_unknown_package_renders_without_fetch() {
        let (pipeline, source, sink) = pipeline(FakeSource::default());

        pipeline.navigate(nav("package/nope")).await;
        assert!(source.requested.borrow().is_empty());
        assert_eq!(
            sink.shown()[0].view.body,
            ViewBody::UnknownPackage {
                name: "nope".to_string(),
            }
        );
        assert_eq!(sink.shown()[0].source_url, None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_only_first_render_is_instant() {
        let (pipeline, _, sink) = pipeline(FakeSource::default());

        pipeline.navigate(nav("package/addon-kit")).await;
        pipeline.navigate(nav("module/addon-kit/panel")).await;
        let transitions: Vec<_> = sink.shown().iter().map(|r| r.transition).collect();
        assert_eq!(transitions, vec![Transition::Instant, Transition::Fade]);
    }

    // =========================================================================
    // Stale Result Suppression
    // =========================================================================

    #[tokio::test(flavor = "current_thread")]
    async fn test_stale_result_discarded_when_older_resolves_last() {
        let source = FakeSource::default()
            .page("md/dev-guide/a.md", "page a")
            .page("md/dev-guide/b.md", "page b");
        let (pipeline, source, sink) = pipeline(source);
        let release_a = source.gate("md/dev-guide/a.md");
        let release_b = source.gate("md/dev-guide/b.md");

        let nav_a = pipeline.navigate(nav("guide/a"));
        let nav_b = pipeline.navigate(nav("guide/b"));

        let (commit_a, commit_b, ()) = tokio::join!(nav_a, nav_b, async {
            tokio::task::yield_now().await;
            release_b.send(()).unwrap();
            tokio::task::yield_now().await;
            release_a.send(()).unwrap();
        });

        assert!(matches!(commit_a, Commit::Discarded(_)));
        assert!(matches!(commit_b, Commit::Rendered(_)));
        let shown = sink.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].view.docs, Docs::Html("<p>page b</p>".to_string()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_stale_result_discarded_when_older_resolves_first() {
        let source = FakeSource::default()
            .page("md/dev-guide/a.md", "page a")
            .page("md/dev-guide/b.md", "page b");
        let (pipeline, source, sink) = pipeline(source);
        let release_a = source.gate("md/dev-guide/a.md");
        let release_b = source.gate("md/dev-guide/b.md");

        let nav_a = pipeline.navigate(nav("guide/a"));
        let nav_b = pipeline.navigate(nav("guide/b"));

        let (commit_a, commit_b, ()) = tokio::join!(nav_a, nav_b, async {
            tokio::task::yield_now().await;
            release_a.send(()).unwrap();
            tokio::task::yield_now().await;
            release_b.send(()).unwrap();
        });

        assert!(matches!(commit_a, Commit::Discarded(_)));
        assert!(matches!(commit_b, Commit::Rendered(_)));
        let shown = sink.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].view.docs, Docs::Html("<p>page b</p>".to_string()));
        assert_eq!(Some(shown[0].token), pipeline.current_token());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_synchronous_route_supersedes_pending_fetch() {
        let source = FakeSource::default().page("md/dev-guide/slow.md", "slow");
        let (pipeline, source, sink) = pipeline(source);
        let release = source.gate("md/dev-guide/slow.md");

        let slow = pipeline.navigate(nav("guide/slow"));
        // No docs file: completes without fetching
        let fast = pipeline.navigate(nav("module/jetpack-core/a"));

        let (slow, fast, ()) = tokio::join!(slow, fast, async {
            tokio::task::yield_now().await;
            release.send(()).unwrap();
        });

        assert!(matches!(slow, Commit::Discarded(_)));
        assert!(matches!(fast, Commit::Rendered(_)));
        let shown = sink.shown();
        assert_eq!(shown.len(), 1);
        assert!(matches!(shown[0].view.body, ViewBody::Module { .. }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_repeated_fragment_does_not_rerender() {
        let source = FakeSource::default().page("md/dev-guide/welcome.md", "hi");
        let (pipeline, source, sink) = pipeline(source);
        let mut router = FragmentRouter::new();

        for hash in ["#guide/welcome", "#guide/welcome", ""] {
            if let Some(navigation) = router.observe(hash) {
                pipeline.navigate(navigation).await;
            }
        }

        assert_eq!(sink.shown().len(), 1);
        assert_eq!(source.requested.borrow().len(), 1);
    }
}
