//! Sequential aggregation of paginated row listings.

use std::future::Future;

use serde_json::Value;

use crate::error::ProxyError;

/// One parsed page of the row listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// `values` of each item, in upstream order.
    pub values: Vec<Value>,
    /// Continuation token; `None` when this is the last page.
    pub next_page_token: Option<String>,
}

impl Page {
    /// Parse a raw upstream body. A body without an `items` array is rejected
    /// with the raw text attached.
    pub fn from_body(body: String) -> Result<Self, ProxyError> {
        let parsed: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => return Err(ProxyError::UpstreamShape { body }),
        };

        let Some(items) = parsed.get("items").and_then(Value::as_array) else {
            return Err(ProxyError::UpstreamShape { body });
        };

        let values = items
            .iter()
            .map(|item| item.get("values").cloned().unwrap_or(Value::Null))
            .collect();

        let next_page_token = parsed
            .get("nextPageToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Self {
            values,
            next_page_token,
        })
    }
}

/// Rows gathered across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub rows: Vec<Value>,
    pub pages: usize,
}

/// Fetch pages until no continuation token is returned.
///
/// `fetch` receives the token from the previous page (`None` for the first).
/// At least one page is always fetched; more than `max_pages` is an error.
pub async fn collect_rows<F, Fut>(max_pages: usize, mut fetch: F) -> Result<Collected, ProxyError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page, ProxyError>>,
{
    let mut collected = Collected::default();
    let mut token = None;

    loop {
        if collected.pages == max_pages {
            return Err(ProxyError::PageLimit { max_pages });
        }

        let page = fetch(token.take()).await?;
        collected.pages += 1;
        collected.rows.extend(page.values);

        match page.next_page_token {
            Some(next) => token = Some(next),
            None => return Ok(collected),
        }
    }
}
