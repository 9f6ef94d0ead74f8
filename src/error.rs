//! Structured error types for panegrid.
//!
//! `GridError` covers configuration and host-facing failures; `FetchError` is
//! the error half of the data source contract.

/// All errors that can occur while configuring or driving a table.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Table configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A fetch failed; carried through for hosts that want to report it.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Rendering or mounting error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Failure of a single page request.
///
/// The table never retries on its own; a failed request only clears the
/// loading flag and leaves the previously displayed rows in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The data source rejected the request.
    #[error("data source rejected the request: {0}")]
    Source(String),

    /// The data source answered with something that is not a page.
    #[error("malformed page response: {0}")]
    Response(String),

    /// The request future was dropped before it produced a result.
    #[error("request #{0} was abandoned before completing")]
    Abandoned(u64),
}

impl From<String> for FetchError {
    fn from(s: String) -> Self {
        Self::Source(s)
    }
}

impl From<&str> for FetchError {
    fn from(s: &str) -> Self {
        Self::Source(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<FetchError> for wasm_bindgen::JsValue {
    fn from(e: FetchError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
