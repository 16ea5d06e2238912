//! Query parameters forwarded to the row listing endpoint.

use std::collections::BTreeMap;

use serde::Serialize;

/// Parameters always sent upstream unless the caller overrides them.
pub const DEFAULT_PARAMS: [(&str, &str); 3] = [
    ("useColumnNames", "true"),
    ("valueFormat", "simpleWithArrays"),
    ("sortBy", "natural"),
];

/// Upstream parameter carrying the continuation token.
pub const PAGE_TOKEN_PARAM: &str = "pageToken";

/// A flat, string-keyed parameter map. Later inserts win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Parse a raw query string. Repeated keys keep the last value.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        if let Some(raw) = raw {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                if !key.is_empty() {
                    params.insert(key, value);
                }
            }
        }
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Parameters for one upstream page: defaults, then `self`, then the token.
    pub fn for_page(&self, page_token: Option<&str>) -> Self {
        let mut merged = Self::default();
        for (key, value) in DEFAULT_PARAMS {
            merged.insert(key, value);
        }
        for (key, value) in &self.0 {
            merged.insert(key.as_str(), value.as_str());
        }
        if let Some(token) = page_token {
            merged.insert(PAGE_TOKEN_PARAM, token);
        }
        merged
    }
}

#[cfg(test)]
impl QueryParams {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}
