//! Data source backed by a JavaScript function.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::DataSource;
use crate::error::FetchError;
use crate::types::{PagedQuery, PagedResponse};

/// Calls `fetcher(query)` and awaits the returned promise (or value).
///
/// The query is passed as `{page, size, sort?, filter?}` and the result must
/// deserialize as `{data, page, size, total}`.
pub struct JsDataSource {
    fetcher: Function,
}

impl JsDataSource {
    pub fn new(fetcher: Function) -> Self {
        Self { fetcher }
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

#[async_trait(?Send)]
impl DataSource<Value> for JsDataSource {
    async fn fetch_page(&self, query: PagedQuery) -> Result<PagedResponse<Value>, FetchError> {
        let arg = serde_wasm_bindgen::to_value(&query)
            .map_err(|e| FetchError::Source(e.to_string()))?;
        let returned = self
            .fetcher
            .call1(&JsValue::NULL, &arg)
            .map_err(|e| FetchError::Source(describe(&e)))?;
        let resolved = match returned.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .map_err(|e| FetchError::Source(describe(&e)))?,
            Err(value) => value,
        };
        serde_wasm_bindgen::from_value(resolved).map_err(|e| FetchError::Response(e.to_string()))
    }
}
