//! Document column.
//!
//! Renders the last committed [`View`]: package pages, module pages and
//! guide pages, plus the "view source" link. The column's `id` is the
//! anchor the post-render DOM passes operate on.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::{AppContext, Phase};
use crate::components::icons as ic;
use crate::config::dom_ids::{RIGHT_COLUMN, SIDENOTES};
use crate::core::{Docs, PackageDetail, View, ViewBody};
use crate::models::Route;

stylance::import_crate_style!(css, "src/components/content/content.module.css");

/// Document column with its sidenote margin.
#[component]
pub fn MainContent() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let display = ctx.display;

    let column_class = move || {
        let phase = match display.phase.get() {
            Phase::Hidden => css::hidden,
            Phase::FadingOut => css::fadingOut,
            Phase::Visible => css::visible,
        };
        format!("{} {}", css::main, phase)
    };

    // An empty href keeps the link inert for views without a source file.
    let source_href = move || {
        display.view.with(|v| {
            v.as_ref()
                .and_then(|r| r.source_url.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <main class=column_class>
            <div class=css::toolbar>
                <a
                    id="view-source"
                    class=css::sourceLink
                    href=source_href
                    target="_blank"
                    title="View source"
                >
                    <Icon icon=ic::EXTERNAL_LINK />
                    <span>"Source"</span>
                </a>
            </div>
            <div class=css::columns>
                <article id=RIGHT_COLUMN class=css::document>
                    {move || display.view.with(|v| v.as_ref().map(|r| render_page(&r.view)))}
                </article>
                <aside id=SIDENOTES class=css::sidenotes></aside>
            </div>
        </main>
    }
}

fn render_page(page: &View) -> AnyView {
    let docs = page.docs.clone();
    match &page.body {
        ViewBody::Package(detail) => view! {
            <PackagePage detail=detail.clone() docs=docs />
        }
        .into_any(),
        ViewBody::Module { package, module } => view! {
            <ModulePage package=package.clone() module=module.clone() docs=docs />
        }
        .into_any(),
        ViewBody::Guide { path } => view! {
            <div class=css::guide data-guide=path.clone()>
                <DocsArea docs=docs />
            </div>
        }
        .into_any(),
        ViewBody::UnknownPackage { name } => view! {
            <div class=css::missing>
                <h2>"Unknown package"</h2>
                <p>"No package named " <code>{name.clone()}</code> " is installed."</p>
            </div>
        }
        .into_any(),
    }
}

// ============================================================================
// Pages
// ============================================================================

#[component]
fn PackagePage(detail: PackageDetail, docs: Docs) -> impl IntoView {
    let authors = detail.authors_text();
    let dependencies = detail.dependencies_text();
    let PackageDetail {
        name,
        version,
        license,
        modules,
        ..
    } = detail;

    let modules_view = if modules.is_empty() {
        view! { <p class=css::none>"This package has no modules."</p> }.into_any()
    } else {
        view! {
            <ul class=css::moduleList>
                {modules
                    .into_iter()
                    .map(|m| view! {
                        <li>
                            <a href=m.href target="_self">
                                <Icon icon=ic::FILE_TEXT />
                                <span>{m.name}</span>
                            </a>
                        </li>
                    })
                    .collect_view()}
            </ul>
        }
        .into_any()
    };

    view! {
        <div class=css::package>
            <h1 class=css::name>{name}</h1>
            <table class=css::meta>
                <tbody>
                    {authors.map(|authors| view! {
                        <tr>
                            <th>"Authors"</th>
                            <td class=css::multiline>{authors}</td>
                        </tr>
                    })}
                    {license.map(|license| view! {
                        <tr>
                            <th>"License"</th>
                            <td>{license}</td>
                        </tr>
                    })}
                    {version.map(|version| view! {
                        <tr>
                            <th>"Version"</th>
                            <td>{version}</td>
                        </tr>
                    })}
                    {dependencies.map(|dependencies| view! {
                        <tr>
                            <th>"Dependencies"</th>
                            <td class=css::multiline>{dependencies}</td>
                        </tr>
                    })}
                </tbody>
            </table>
            <h2>"Modules"</h2>
            {modules_view}
            <DocsArea docs=docs />
        </div>
    }
}

#[component]
fn ModulePage(package: String, module: String, docs: Docs) -> impl IntoView {
    let package_href = Route::Package {
        name: package.clone(),
    }
    .to_hash();

    view! {
        <div class=css::module>
            <h1 class=css::name>{module}</h1>
            <p class=css::parent>
                "Part of "
                <a href=package_href target="_self">
                    <Icon icon=ic::FOLDER />
                    <span>{package}</span>
                </a>
            </p>
            <DocsArea docs=docs />
        </div>
    }
}

/// Documentation body of a page.
#[component]
fn DocsArea(docs: Docs) -> impl IntoView {
    match docs {
        Docs::Empty => view! { <div class=css::docs></div> }.into_any(),
        Docs::Html(html) => view! { <div class=css::docs inner_html=html></div> }.into_any(),
        Docs::ModuleError {
            source_file,
            technical_error,
        } => view! {
            <div class=css::docs>
                <div class=css::parseError>
                    <p>
                        "Could not load the documentation in "
                        <span class=css::filename>{source_file}</span>
                        "."
                    </p>
                    <pre class=css::technicalError>{technical_error}</pre>
                </div>
            </div>
        }
        .into_any(),
        Docs::RendererFailed(message) => view! {
            <div class=css::docs>
                <p class=css::rendererFailed>
                    {format!("Oops, API docs renderer failed: {}", message)}
                </p>
            </div>
        }
        .into_any(),
    }
}
