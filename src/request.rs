use crate::cancel::CancelToken;
use crate::context::ApiContext;
use crate::dispatch;
use crate::endpoint::Endpoint;
use crate::entity::Entity;
use crate::error::Result;
use crate::node_list::NodeList;
use crate::resolver;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Parameters passed to API requests, keyed by name
pub type Param = HashMap<String, Value>;

/// A request bound to a context, a resolved endpoint and a set of base
/// parameters. It can be executed any number of times, optionally with
/// extra parameters overriding the base ones.
///
/// A request carrying its own [`CancelToken`] is cancelled independently of
/// other calls on the same context; otherwise the context's token applies.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    context: Arc<ApiContext>,
    endpoint: Endpoint,
    params: Param,
    secondary_key: Option<String>,
    cancel: Option<CancelToken>,
}

impl ApiRequest {
    /// Create a request for `endpoint`, resolving its path placeholders
    /// with `uri_params`
    pub fn new(context: &Arc<ApiContext>, endpoint: &Endpoint, uri_params: &[&str]) -> Result<Self> {
        Ok(ApiRequest {
            context: Arc::clone(context),
            endpoint: endpoint.resolve(uri_params)?,
            params: Param::new(),
            secondary_key: None,
            cancel: None,
        })
    }

    /// Descend into `data.<key>` when resolving responses
    pub fn with_secondary_key(mut self, key: impl Into<String>) -> Self {
        self.secondary_key = Some(key.into());
        self
    }

    /// Cancel this request's calls through `cancel` instead of the
    /// context's token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_param(name, value);
        self
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(name.into(), value.into());
    }

    /// Replace all base parameters
    pub fn set_params(&mut self, params: Param) {
        self.params = params;
    }

    pub fn context(&self) -> &Arc<ApiContext> {
        &self.context
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn params(&self) -> &Param {
        &self.params
    }

    pub fn secondary_key(&self) -> Option<&str> {
        self.secondary_key.as_deref()
    }

    /// Get the token that cancels this request's calls
    pub fn cancel_token(&self) -> &CancelToken {
        self.cancel.as_ref().unwrap_or_else(|| self.context.cancel_token())
    }

    /// Execute the request with its base parameters
    pub fn execute<T: Entity>(&self) -> Result<NodeList<T>> {
        self.execute_with(Param::new())
    }

    /// Execute the request with `extra` merged over the base parameters.
    /// On key collision the extra value wins.
    pub fn execute_with<T: Entity>(&self, extra: Param) -> Result<NodeList<T>> {
        let mut all_params = self.params.clone();
        all_params.extend(extra);

        let body = dispatch::execute(&self.context, &self.endpoint, &all_params, self.cancel_token())?;
        resolver::resolve(&body, self)
    }

    /// Execute the request and return the first decoded entity
    pub fn execute_one<T: Entity>(&self) -> Result<Option<T>> {
        Ok(self.execute::<T>()?.into_iter().next())
    }
}
