use crate::entity::Entity;
use crate::error::{ApiError, Result};
use crate::pagination::Pagination;
use crate::request::{ApiRequest, Param};
use serde_json::Value;
use std::ops::Deref;

/// Ordered list of decoded entities with the pagination of the response and
/// the request that produced it, used to fetch the following pages.
///
/// Order is the order of the JSON array in the response body.
#[derive(Debug, Clone)]
pub struct NodeList<T> {
    nodes: Vec<T>,
    pagination: Option<Pagination>,
    raw: String,
    request: ApiRequest,
}

impl<T> NodeList<T> {
    pub(crate) fn new(request: ApiRequest, raw: String) -> Self {
        NodeList {
            nodes: Vec::new(),
            pagination: None,
            raw,
            request,
        }
    }

    pub(crate) fn push(&mut self, node: T) {
        self.nodes.push(node);
    }

    pub(crate) fn extend(&mut self, nodes: impl IntoIterator<Item = T>) {
        self.nodes.extend(nodes);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub(crate) fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Offset of this page, 0 when the response was not paginated
    pub fn offset(&self) -> u64 {
        self.pagination.map(|p| p.offset).unwrap_or(0)
    }

    /// Whether there are more elements after the current page
    pub fn has_next_page(&self) -> bool {
        self.pagination.map_or(false, |p| p.has_next_page())
    }

    /// The request that produced this list
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The response body this list was resolved from, verbatim
    pub fn raw_response(&self) -> &str {
        &self.raw
    }

    pub fn raw_response_as_json(&self) -> Result<Value> {
        serde_json::from_str(&self.raw).map_err(|e| ApiError::malformed(self.raw.as_str(), Some(e)))
    }

    pub fn head(&self) -> Option<&T> {
        self.nodes.first()
    }

    pub fn tail(&self) -> Option<&T> {
        self.nodes.last()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.nodes
    }
}

impl<T: Entity> NodeList<T> {
    /// Fetch the next page using the configured page size
    pub fn next_page(&self) -> Result<NodeList<T>> {
        let page_size = self.request.context().config().items_per_page;
        self.next_page_with(u64::from(page_size))
    }

    /// Fetch the next page of `page_size` elements. The request is replayed
    /// with `limit = page_size` and `offset = offset + len`.
    pub fn next_page_with(&self, page_size: u64) -> Result<NodeList<T>> {
        let mut extra = Param::new();
        extra.insert("limit".to_string(), Value::from(page_size));
        extra.insert(
            "offset".to_string(),
            Value::from(self.offset() + self.nodes.len() as u64),
        );
        self.request.execute_with(extra)
    }
}

impl<T> Deref for NodeList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

impl<T> IntoIterator for NodeList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
