//! Request dispatch: turns an endpoint plus parameters into an HTTP call,
//! classifies the outcome and regenerates the access token when it expired.

use crate::app::App;
use crate::cancel::CancelToken;
use crate::context::ApiContext;
use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::{ApiError, Result};
use crate::request::Param;
use crate::transport::HttpRequest;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Outcome of a single HTTP attempt
#[derive(Debug)]
enum Attempt {
    Success(String),
    /// 401 while a token was sent; the token has been cleared
    Unauthorized,
}

/// Token retry state machine. Each non-terminal state performs one step and
/// moves on; `retries` bounds the number of `TokenRefreshing` visits.
#[derive(Debug)]
enum RetryState {
    NotAttempted,
    Attempted(Attempt),
    TokenRefreshing,
    Exhausted,
}

/// Execute a call and return the raw success body. `cancel` aborts this
/// call only, including its nested token regeneration.
pub(crate) fn execute(
    context: &Arc<ApiContext>,
    endpoint: &Endpoint,
    params: &Param,
    cancel: &CancelToken,
) -> Result<String> {
    let max_retries = context.config().retry_token_max;
    let mut retries = 0;
    let mut state = RetryState::NotAttempted;

    loop {
        state = match state {
            RetryState::NotAttempted => {
                RetryState::Attempted(send_once(context, endpoint, params, cancel)?)
            }
            RetryState::Attempted(Attempt::Success(body)) => return Ok(body),
            RetryState::Attempted(Attempt::Unauthorized) => {
                if retries >= max_retries {
                    RetryState::Exhausted
                } else {
                    RetryState::TokenRefreshing
                }
            }
            RetryState::TokenRefreshing => {
                debug!(app_id = context.app_id(), "regenerating access token");
                App::refresh_token_with(context, cancel)?;
                retries += 1;

                cancel.sleep(context.config().retry_token_delay())?;
                RetryState::Attempted(send_once(context, endpoint, params, cancel)?)
            }
            RetryState::Exhausted => {
                warn!(uri = endpoint.uri(), retries, "access token rejected after regeneration");
                return Err(ApiError::RetryExhausted);
            }
        };
    }
}

fn send_once(
    context: &ApiContext,
    endpoint: &Endpoint,
    params: &Param,
    cancel: &CancelToken,
) -> Result<Attempt> {
    cancel.check()?;

    let method = endpoint.method();
    let api_url = endpoint.api_url(context);
    let token = context.token();

    let (url, body) = match method {
        HttpMethod::Get => (query_url(&api_url, params)?, None),
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
            (api_url, Some(serde_json::to_string(&sorted(params))?))
        }
        HttpMethod::Options => return Err(ApiError::UnsupportedMethod(method)),
    };

    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    if let Some(ref token) = token {
        headers.push(("Authorization".to_string(), token.clone()));
    }

    let request = HttpRequest {
        method,
        url,
        headers,
        body,
    };

    let start = Instant::now();
    let response = context.transport().send(&request)?;
    debug!(
        method = %method,
        url = %request.url,
        status = response.status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "api call"
    );
    cancel.check()?;

    if response.status == 401 && token.is_some() {
        warn!(url = %request.url, "access token expired");
        context.clear_token();
        return Ok(Attempt::Unauthorized);
    }

    if !response.is_success() {
        return Err(ApiError::RequestFailed {
            status: response.status,
            body: response.body.filter(|b| !b.is_empty()),
        });
    }

    Ok(Attempt::Success(response.body.unwrap_or_default()))
}

/// Append every parameter to the URL query string. Strings are sent as is,
/// other values as their JSON text.
fn query_url(api_url: &str, params: &Param) -> Result<String> {
    let mut url = Url::parse(api_url)?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in sorted(params) {
            pairs.append_pair(key, &query_value(value));
        }
    }
    Ok(url.into())
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn sorted(params: &Param) -> BTreeMap<&str, &Value> {
    params.iter().map(|(k, v)| (k.as_str(), v)).collect()
}
