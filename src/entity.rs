use crate::context::ApiContext;
use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Bookkeeping every entity carries: a weak link to the context it was
/// fetched with and the exact JSON text it was decoded from.
///
/// Embed it with `#[serde(skip)]`; only the decoder fills it in.
#[derive(Debug, Clone, Default)]
pub struct NodeMeta {
    context: Weak<ApiContext>,
    raw: String,
}

impl NodeMeta {
    pub fn context(&self) -> Option<Arc<ApiContext>> {
        self.context.upgrade()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A typed API entity.
///
/// Field names are mapped with serde attributes; use `alias` to accept an
/// alternate wire name for a field:
///
/// ```
/// use apinode::{Entity, NodeMeta};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Project {
///     #[serde(rename = "id", alias = "projectId")]
///     id: String,
///     name: String,
///     #[serde(skip)]
///     meta: NodeMeta,
/// }
///
/// impl Entity for Project {
///     fn id(&self) -> Option<&str> {
///         Some(&self.id)
///     }
///     fn meta(&self) -> &NodeMeta {
///         &self.meta
///     }
///     fn meta_mut(&mut self) -> &mut NodeMeta {
///         &mut self.meta
///     }
/// }
/// ```
pub trait Entity: DeserializeOwned {
    /// Stable identifier of the entity
    fn id(&self) -> Option<&str>;

    fn meta(&self) -> &NodeMeta;

    fn meta_mut(&mut self) -> &mut NodeMeta;

    /// Called once by the decoder after the context and raw value are set
    fn on_decoded(&mut self, _context: &ApiContext) {}

    /// The JSON text this entity was decoded from, verbatim
    fn raw_response(&self) -> &str {
        self.meta().raw()
    }

    fn raw_response_as_json(&self) -> Result<Value> {
        let raw = self.raw_response();
        serde_json::from_str(raw).map_err(|e| ApiError::malformed(raw, Some(e)))
    }

    /// Context used to fetch this entity, if still alive
    fn context(&self) -> Option<Arc<ApiContext>> {
        self.meta().context()
    }
}

/// Decode one JSON object into an entity bound to `context`
pub fn decode<T: Entity>(json: &str, context: &Arc<ApiContext>) -> Result<T> {
    decode_raw(json, context).map_err(|e| ApiError::malformed(json, Some(e)))
}

pub(crate) fn decode_raw<T: Entity>(
    json: &str,
    context: &Arc<ApiContext>,
) -> std::result::Result<T, serde_json::Error> {
    let mut node: T = serde_json::from_str(json)?;
    {
        let meta = node.meta_mut();
        meta.context = Arc::downgrade(context);
        meta.raw = json.to_string();
    }
    node.on_decoded(context);
    Ok(node)
}
