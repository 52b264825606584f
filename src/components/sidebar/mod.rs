//! Sidebar navigation.
//!
//! Renders the outline: one section visible at a time, the current page
//! and section marked, package sections listing modules and README
//! summaries.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::models::{Entry, Section};
use crate::utils::markdown_to_html;

stylance::import_crate_style!(css, "src/components/sidebar/sidebar.module.css");

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let highlight = ctx.display.highlight;

    // Before the first render, fall back to the outline's default section.
    let active_section = Memo::new(move |_| {
        highlight
            .with(|h| h.as_ref().map(|h| h.active_section.clone()))
            .unwrap_or_else(|| ctx.outline.with(|o| o.default_section.clone()))
    });
    let active_entry =
        Memo::new(move |_| highlight.with(|h| h.as_ref().and_then(|h| h.active_entry.clone())));

    view! {
        <nav class=css::sidebar>
            <Show when=move || ctx.index_error.with(Option::is_some)>
                <div class=css::indexError>
                    <p>"The package index could not be loaded."</p>
                    <pre class=css::technicalError>
                        {move || ctx.index_error.get().unwrap_or_default()}
                    </pre>
                </div>
            </Show>
            {move || {
                ctx.outline
                    .get()
                    .sections
                    .into_iter()
                    .map(|section| view! {
                        <SidebarSection
                            section=section
                            active_section=active_section
                            active_entry=active_entry
                        />
                    })
                    .collect_view()
            }}
        </nav>
    }
}

#[component]
fn SidebarSection(
    section: Section,
    active_section: Memo<String>,
    active_entry: Memo<Option<String>>,
) -> impl IntoView {
    let Section {
        id,
        title,
        header,
        entries,
        ..
    } = section;

    let is_active = Memo::new(move |_| active_section.with(|s| *s == id));
    let section_class = move || {
        if is_active.get() {
            format!("{} {}", css::section, css::currentSection)
        } else {
            css::section.to_string()
        }
    };

    let heading = match header {
        Some(header) => {
            let href = header.href.clone();
            view! {
                <a class=entry_class(href, active_entry, css::sectionTitle) href=header.href target="_self">
                    {header.title}
                </a>
            }
            .into_any()
        }
        None => view! { <span class=css::sectionTitle>{title}</span> }.into_any(),
    };

    view! {
        <div class=section_class>
            <h3 class=css::heading>{heading}</h3>
            <ul
                class=css::entries
                style:display=move || if is_active.get() { "block" } else { "none" }
            >
                {entries
                    .into_iter()
                    .map(|entry| render_entry(entry, active_entry))
                    .collect_view()}
            </ul>
        </div>
    }
}

/// One link with its nested children; package entries carry a summary.
fn render_entry(entry: Entry, active_entry: Memo<Option<String>>) -> AnyView {
    let Entry {
        title,
        href,
        children,
        summary,
    } = entry;

    let is_package = summary.is_some() || !children.is_empty();
    let summary = summary.map(|markdown| markdown_to_html(&markdown));
    let children = (!children.is_empty()).then(|| {
        view! {
            <ul class=css::children>
                {children
                    .into_iter()
                    .map(|child| render_entry(child, active_entry))
                    .collect_view()}
            </ul>
        }
    });

    view! {
        <li class=css::item>
            <a class=entry_class(href.clone(), active_entry, css::link) href=href target="_self">
                {is_package.then(|| view! { <Icon icon=ic::FOLDER /> })}
                <span>{title}</span>
            </a>
            {summary.map(|html| view! { <div class=css::summary inner_html=html></div> })}
            {children}
        </li>
    }
    .into_any()
}

/// Reactive class adding `currentPage` while `href` is the active entry.
fn entry_class(
    href: String,
    active_entry: Memo<Option<String>>,
    base: &'static str,
) -> impl Fn() -> String + Send + Sync + 'static {
    move || {
        if active_entry.with(|a| a.as_deref() == Some(href.as_str())) {
            format!("{} {}", base, css::currentPage)
        } else {
            base.to_string()
        }
    }
}
