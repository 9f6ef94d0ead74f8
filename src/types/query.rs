use serde::{Deserialize, Serialize};

/// Page request sent to a data source.
///
/// `page` is zero-based on the wire, unlike the one-based page shown to users.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PagedQuery {
    pub page: u32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl PagedQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
            filter: None,
        }
    }

    /// Index of the first row this query covers.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

/// One page of rows as served by a data source.
///
/// `page` and `size` echo what was actually served (zero-based page), which
/// may differ from the request when the source clamps it. `total` is the full
/// matching row count, not the page length.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, size: u32, total: u64) -> Self {
        Self {
            data,
            page,
            size,
            total,
        }
    }
}
