use crate::cancel::CancelToken;
use crate::context::ApiContext;
use crate::endpoint::CREATE_ACCESS_TOKEN;
use crate::entity::{Entity, NodeMeta};
use crate::error::Result;
use crate::request::ApiRequest;
use serde::Deserialize;
use std::sync::Arc;

/// The client's own app identity, as returned by the token endpoint.
///
/// Decoding an `App` stores its token in the context it was fetched with,
/// and its id is always the context's app id.
#[derive(Debug, Clone, Deserialize)]
pub struct App {
    #[serde(rename = "id", alias = "appId", default)]
    id: Option<String>,

    #[serde(default)]
    token: Option<String>,

    #[serde(skip)]
    meta: NodeMeta,
}

impl App {
    /// Get the app access token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build the request that regenerates the app access token
    pub fn create_token(context: &Arc<ApiContext>) -> Result<ApiRequest> {
        Ok(ApiRequest::new(context, &CREATE_ACCESS_TOKEN, &[context.app_id()])?
            .with_param("appSecret", context.app_secret()))
    }

    /// Regenerate the app access token and store it in `context`
    pub fn refresh_token(context: &Arc<ApiContext>) -> Result<Option<App>> {
        Self::refresh_token_with(context, context.cancel_token())
    }

    /// Regenerate the app access token, cancellable through `cancel`
    pub fn refresh_token_with(context: &Arc<ApiContext>, cancel: &CancelToken) -> Result<Option<App>> {
        Self::create_token(context)?
            .with_cancel_token(cancel.clone())
            .execute_one::<App>()
    }
}

impl Entity for App {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn on_decoded(&mut self, context: &ApiContext) {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            context.set_token(Some(token));
        }
        self.id = Some(context.app_id().to_string());
    }
}
