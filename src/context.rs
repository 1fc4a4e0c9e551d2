use crate::cancel::CancelToken;
use crate::client::Config;
use crate::error::Result;
use crate::transport::{ReqwestTransport, Transport};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the API base URL and version, the app credentials and the app
/// access token. Shared as `Arc<ApiContext>` by every request and entity of
/// a client session.
///
/// The token is written only by the token regeneration path and read right
/// before each HTTP call. The lock makes those accesses memory safe but does
/// not serialize logical calls: concurrent calls on one context may race on
/// token regeneration, and callers needing otherwise must serialize them.
pub struct ApiContext {
    config: Config,
    app_id: String,
    app_secret: String,
    token: RwLock<Option<String>>,
    transport: Arc<dyn Transport>,
    cancel: CancelToken,
}

impl ApiContext {
    /// Create a context with the default configuration and HTTP transport
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Arc<Self>> {
        Self::builder(app_id, app_secret).build()
    }

    /// Start building a context for the given app credentials
    pub fn builder(app_id: impl Into<String>, app_secret: impl Into<String>) -> ApiContextBuilder {
        ApiContextBuilder {
            config: Config::default(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            token: None,
            transport: None,
            cancel: None,
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the API base URL
    pub fn api_base(&self) -> &str {
        &self.config.base_url
    }

    /// Get the API version path segment
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Get the app id
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Get the app secret
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Get the current app access token
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check whether an access token is held
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clear the app access token
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Store a regenerated token. An empty token clears the slot.
    pub(crate) fn set_token(&self, token: Option<&str>) {
        let token = token.filter(|t| !t.is_empty()).map(str::to_string);
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Get the transport used for HTTP calls
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Get the fallback cancellation token, used by requests that carry
    /// none of their own
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("config", &self.config)
            .field("app_id", &self.app_id)
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiContext`]
pub struct ApiContextBuilder {
    config: Config,
    app_id: String,
    app_secret: String,
    token: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    cancel: Option<CancelToken>,
}

impl ApiContextBuilder {
    /// Use the given configuration instead of the default one
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Start with an existing access token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t| !t.is_empty());
        self
    }

    /// Use a custom transport instead of the default reqwest one
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the fallback cancellation token for requests on this context
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the context, creating the default transport if none was set
    pub fn build(self) -> Result<Arc<ApiContext>> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        Ok(Arc::new(ApiContext {
            config: self.config,
            app_id: self.app_id,
            app_secret: self.app_secret,
            token: RwLock::new(self.token),
            transport,
            cancel: self.cancel.unwrap_or_default(),
        }))
    }
}
