//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.
//! Everything here is a no-op when the relevant element or API is missing.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::animation::{SCROLL_MIN_STEP, SCROLL_TICK_MS};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

#[inline]
fn document() -> Option<Document> {
    window()?.document()
}

fn element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Elements under `root` matching `selector`, in document order.
fn select_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// =============================================================================
// Browser Navigation
// =============================================================================

/// Current `location.hash`, including the leading `#` (empty if none).
pub fn get_hash() -> String {
    window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Whether the host fires native `hashchange` events.
pub fn supports_hashchange() -> bool {
    window().is_some_and(|w| {
        js_sys::Reflect::has(&w, &JsValue::from_str("onhashchange")).unwrap_or(false)
    })
}

/// True when the page was opened straight from disk.
pub fn is_file_origin() -> bool {
    window()
        .and_then(|w| w.location().protocol().ok())
        .is_some_and(|p| p == "file:")
}

pub fn set_document_title(title: &str) {
    if let Some(document) = document() {
        document.set_title(title);
    }
}

/// Scroll up in steps of a tenth of the offset (at least
/// [`SCROLL_MIN_STEP`] pixels) until the viewport reaches the top.
pub async fn scroll_to_top() {
    let Some(window) = window() else {
        return;
    };
    loop {
        let y = window.scroll_y().unwrap_or(0.0);
        if y <= 0.0 {
            break;
        }
        window.scroll_by_with_x_and_y(0.0, -(y / 10.0).max(SCROLL_MIN_STEP));
        TimeoutFuture::new(SCROLL_TICK_MS).await;
    }
}

// =============================================================================
// Content Post-processing
// =============================================================================

/// Make in-page links (`href="#..."`) open in the same tab.
pub fn retarget_internal_links(container_id: &str) {
    let Some(container) = element_by_id(container_id) else {
        return;
    };
    for link in select_all(&container, "a[href^='#']") {
        let _ = link.set_attribute("target", "_self");
    }
}

/// Move `.aside` blocks out of the content into the sidenote column.
///
/// Each aside keeps the vertical offset it had in the content, and is sized
/// so its outer width matches the column.
pub fn layout_sidenotes(content_id: &str, column_id: &str) {
    let (Some(content), Some(column)) = (element_by_id(content_id), element_by_id(column_id))
    else {
        return;
    };
    column.set_inner_html("");
    let width = column.client_width();

    // Measured one at a time: removing an aside shifts the ones after it.
    for aside in select_all(&content, ".aside") {
        let Ok(aside) = aside.dyn_into::<HtmlElement>() else {
            continue;
        };
        let top = aside.offset_top();
        aside.remove();
        let _ = column.append_child(&aside);

        let style = aside.style();
        let _ = style.set_property("top", &format!("{}px", top));
        let _ = style.set_property("width", &format!("{}px", width));
        let margin = aside.offset_width() - width;
        let _ = style.set_property("width", &format!("{}px", width - margin));
    }
}

/// Prepare code blocks and run the page's syntax highlighter, if loaded.
///
/// `<pre><code>…</code></pre>` becomes `<pre class="brush: js">…</pre>`,
/// the shape the highlighter scans for.
pub fn highlight_code(container_id: &str) {
    let Some(container) = element_by_id(container_id) else {
        return;
    };
    for code in select_all(&container, "pre > code") {
        if let Some(pre) = code.parent_element() {
            let _ = pre.set_attribute("class", "brush: js");
            pre.set_inner_html(&code.inner_html());
        }
    }

    let Some(window) = window() else {
        return;
    };
    let Ok(highlighter) = js_sys::Reflect::get(&window, &JsValue::from_str("SyntaxHighlighter"))
    else {
        return;
    };
    if highlighter.is_undefined() {
        return;
    }
    if let Ok(highlight) = js_sys::Reflect::get(&highlighter, &JsValue::from_str("highlight"))
        && let Ok(highlight) = highlight.dyn_into::<js_sys::Function>()
        && let Err(e) = highlight.call0(&highlighter)
    {
        tracing::warn!(error = ?e, "syntax highlighter failed");
    }
}
