//! Path-segment parsing into document and grid identifiers.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::ProxyError;

/// Required prefix of every grid (table) identifier.
pub const GRID_PREFIX: &str = "grid-";

/// Identifier of a hosted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocId(String);

impl DocId {
    pub fn parse(segment: Option<&str>) -> Result<Self, ProxyError> {
        match segment {
            Some(s) if !s.is_empty() => Ok(Self(s.to_string())),
            _ => Err(ProxyError::MissingDocId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a table inside a document, always prefixed with `grid-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridId(String);

impl GridId {
    pub fn parse(segment: Option<&str>) -> Result<Self, ProxyError> {
        match segment {
            Some(s) if s.starts_with(GRID_PREFIX) => Ok(Self(s.to_string())),
            _ => Err(ProxyError::InvalidGridId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty segments of a request path, in order, percent-decoded.
///
/// The path is split before decoding, so `%2F` stays inside its segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments<'a>(Vec<Cow<'a, str>>);

impl<'a> PathSegments<'a> {
    pub fn parse(path: &'a str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| percent_decode_str(s).decode_utf8_lossy())
                .collect(),
        )
    }

    pub fn doc_id(&self) -> Result<DocId, ProxyError> {
        DocId::parse(self.segment(0))
    }

    pub fn grid_id(&self) -> Result<GridId, ProxyError> {
        GridId::parse(self.segment(1))
    }

    fn segment(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|s| s.as_ref())
    }

    /// Document and grid identifiers for a row listing.
    pub fn table(&self) -> Result<(DocId, GridId), ProxyError> {
        Ok((self.doc_id()?, self.grid_id()?))
    }
}
