//! Response resolution: normalizes every response shape the API produces
//! into a [`NodeList`].
//!
//! Shapes are recognized structurally, in this order:
//!
//! 0. an empty body (e.g. `204 No Content`): an empty list;
//! 1. a bare array: every element is one entity, no pagination;
//! 2. an object with `meta.pagination`: pagination is attached;
//! 3. an object with `data`: optionally descend into `data.<secondary key>`
//!    (a missing secondary key yields an empty list), then decode an array
//!    of entities or a single entity;
//! 4. an object without `data`: the whole object is one entity. Pagination
//!    found in step 2 is kept.
//!
//! Entities keep the verbatim JSON slice they were decoded from.

use crate::client::{PAGINATION_KEY, PRIMARY_DATA_KEY, PRIMARY_META_KEY};
use crate::entity::{decode_raw, Entity};
use crate::error::{ApiError, Result};
use crate::node_list::NodeList;
use crate::pagination::Pagination;
use crate::request::ApiRequest;
use serde_json::value::RawValue;
use std::collections::HashMap;

type RawObject<'a> = HashMap<String, &'a RawValue>;

/// Resolve a response body produced by `request`
pub fn resolve<T: Entity>(body: &str, request: &ApiRequest) -> Result<NodeList<T>> {
    let malformed = |e: serde_json::Error| ApiError::malformed(body, Some(e));
    let context = request.context();
    let mut nodes = NodeList::new(request.clone(), body.to_string());
    if body.trim().is_empty() {
        return Ok(nodes);
    }

    let root: &RawValue = serde_json::from_str(body).map_err(malformed)?;
    match first_byte(root) {
        Some(b'[') => {
            nodes.extend(decode_array(root, request).map_err(malformed)?);
        }
        Some(b'{') => {
            let object: RawObject = serde_json::from_str(root.get()).map_err(malformed)?;

            if let Some(meta) = object.get(PRIMARY_META_KEY) {
                let meta: RawObject = serde_json::from_str(meta.get()).map_err(malformed)?;
                if let Some(page) = meta.get(PAGINATION_KEY) {
                    let pagination: Pagination =
                        serde_json::from_str(page.get()).map_err(malformed)?;
                    nodes.set_pagination(Some(pagination));
                }
            }

            if let Some(mut data) = object.get(PRIMARY_DATA_KEY).copied() {
                if let Some(key) = request.secondary_key() {
                    let inner: RawObject = serde_json::from_str(data.get()).map_err(malformed)?;
                    match inner.get(key) {
                        Some(nested) => data = *nested,
                        None => return Ok(nodes),
                    }
                }
                match first_byte(data) {
                    Some(b'[') => nodes.extend(decode_array(data, request).map_err(malformed)?),
                    Some(b'{') => nodes.push(decode_raw(data.get(), context).map_err(malformed)?),
                    _ => {}
                }
                return Ok(nodes);
            }

            nodes.clear();
            nodes.push(decode_raw(body, context).map_err(malformed)?);
        }
        _ => return Err(ApiError::malformed(body, None)),
    }

    Ok(nodes)
}

fn decode_array<T: Entity>(
    array: &RawValue,
    request: &ApiRequest,
) -> std::result::Result<Vec<T>, serde_json::Error> {
    let elements: Vec<&RawValue> = serde_json::from_str(array.get())?;
    elements
        .into_iter()
        .map(|element| {
            if first_byte(element) != Some(b'{') {
                return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                    "expected a JSON object, found {}",
                    element.get()
                )));
            }
            decode_raw(element.get(), request.context())
        })
        .collect()
}

fn first_byte(value: &RawValue) -> Option<u8> {
    value.get().trim_start().bytes().next()
}
