//! Network fetching utilities with timeout support.
//!
//! [`HttpSource`] is the browser implementation of [`ContentSource`].

use js_sys::{Array, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::FETCH_TIMEOUT_MS;
use crate::core::ContentSource;
use crate::core::error::FetchError;
use crate::models::PackageIndex;

// =============================================================================
// Promise Racing Utilities
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected with an error.
    Error(String),
}

/// Race a promise against a timeout using `Promise.race`.
///
/// The losing promise is left to settle on its own; nothing is aborted.
async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    // Create timeout promise that resolves to undefined
    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);
    let race_promise = Promise::race(&race_array);

    match JsFuture::from(race_promise).await {
        Ok(result) => {
            if result.is_undefined() {
                RaceResult::TimedOut
            } else {
                RaceResult::Completed(result)
            }
        }
        Err(e) => RaceResult::Error(e.as_string().unwrap_or_else(|| "Unknown error".to_string())),
    }
}

// =============================================================================
// Fetch Functions
// =============================================================================

/// Fetch and parse the package index.
pub async fn fetch_index(url: &str) -> Result<PackageIndex, FetchError> {
    let text = fetch_url(url).await?;
    PackageIndex::from_json(&text).map_err(|e| FetchError::JsonParseError(e.to_string()))
}

/// Same-origin text fetcher backed by the Fetch API.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpSource;

impl ContentSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        fetch_url(url).await
    }
}

/// Fetch text from a URL using the Fetch API with timeout.
///
/// Non-2xx responses become [`FetchError::HttpError`] carrying the response
/// text, which module error panels and the index banner display verbatim.
async fn fetch_url(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or(FetchError::NoWindow)?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| FetchError::RequestCreationFailed)?;

    let fetch_promise = window.fetch_with_request(&request);

    match race_with_timeout(fetch_promise, FETCH_TIMEOUT_MS).await {
        RaceResult::TimedOut => Err(FetchError::Timeout),
        RaceResult::Error(msg) => Err(FetchError::NetworkError(msg)),
        RaceResult::Completed(result) => {
            let resp: Response = result.dyn_into().map_err(|_| FetchError::InvalidContent)?;
            let text = read_text(&resp).await;

            if !resp.ok() {
                return Err(FetchError::HttpError {
                    status: resp.status(),
                    body: text.unwrap_or_default(),
                });
            }
            text
        }
    }
}

async fn read_text(resp: &Response) -> Result<String, FetchError> {
    let text = JsFuture::from(resp.text().map_err(|_| FetchError::ResponseReadFailed)?)
        .await
        .map_err(|_| FetchError::ResponseReadFailed)?;

    text.as_string().ok_or(FetchError::InvalidContent)
}
