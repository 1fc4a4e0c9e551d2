use crate::context::ApiContext;
use crate::error::{ApiError, Result};
use std::borrow::Cow;
use std::fmt;

/// HTTP request methods an endpoint may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API endpoint: a URI template relative to `base/version/` and its verb.
///
/// Templates use positional `%s` placeholders (an optional width such as
/// `%1s` is accepted and ignored). `%%` stands for a literal percent sign.
/// Endpoints are immutable; [`Endpoint::resolve`] returns a new value so
/// static tables can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    uri: Cow<'static, str>,
    method: HttpMethod,
}

impl Endpoint {
    pub const fn new(uri: &'static str, method: HttpMethod) -> Self {
        Endpoint {
            uri: Cow::Borrowed(uri),
            method,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Substitute path parameters into the template, in order.
    ///
    /// Surplus parameters are ignored; a missing one is an error.
    pub fn resolve(&self, params: &[&str]) -> Result<Endpoint> {
        let mut resolved = String::with_capacity(self.uri.len());
        let mut next = 0;
        let mut rest = self.uri.as_ref();

        while let Some(pos) = rest.find('%') {
            resolved.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('%') {
                resolved.push('%');
                rest = tail;
                continue;
            }

            let width = after.bytes().take_while(u8::is_ascii_digit).count();
            match after[width..].strip_prefix('s') {
                Some(tail) => {
                    let param = params.get(next).ok_or_else(|| ApiError::MissingPathParam {
                        template: self.uri.to_string(),
                        index: next,
                    })?;
                    resolved.push_str(param);
                    next += 1;
                    rest = tail;
                }
                None => {
                    resolved.push('%');
                    rest = after;
                }
            }
        }
        resolved.push_str(rest);

        Ok(Endpoint {
            uri: Cow::Owned(resolved),
            method: self.method,
        })
    }

    /// Get the absolute URL of this endpoint for the given context
    pub fn api_url(&self, context: &ApiContext) -> String {
        context.config().api_url(&self.uri)
    }
}

/// The endpoint to regenerate the app access token.
pub const CREATE_ACCESS_TOKEN: Endpoint = Endpoint::new("apps/%1s/token", HttpMethod::Post);

/// The endpoint to list the entities.
pub const GET_ENTITIES: Endpoint = Endpoint::new("entities", HttpMethod::Get);

/// The endpoint to create a new entity.
pub const CREATE_ENTITY: Endpoint = Endpoint::new("entities", HttpMethod::Post);

/// The endpoint to get one entity by id.
pub const GET_ENTITY_BY_ID: Endpoint = Endpoint::new("entities/%1s", HttpMethod::Get);

/// The endpoint to update an entity by id.
pub const UPDATE_ENTITY: Endpoint = Endpoint::new("entities/%1s", HttpMethod::Put);

/// The endpoint to delete an entity by id.
pub const DELETE_ENTITY: Endpoint = Endpoint::new("entities/%1s", HttpMethod::Delete);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_positional() {
        let endpoint = Endpoint::new("projects/%s/entities/%s", HttpMethod::Get);
        let resolved = endpoint.resolve(&["p1", "e2"]).unwrap();
        assert_eq!(resolved.uri(), "projects/p1/entities/e2");
        assert_eq!(resolved.method(), HttpMethod::Get);
        // resolving leaves the table entry as is
        assert_eq!(endpoint.uri(), "projects/%s/entities/%s");
    }

    #[test]
    fn test_resolve_width_placeholder() {
        let resolved = CREATE_ACCESS_TOKEN.resolve(&["app-1"]).unwrap();
        assert_eq!(resolved.uri(), "apps/app-1/token");
        assert_eq!(resolved.method(), HttpMethod::Post);
        assert_eq!(CREATE_ACCESS_TOKEN.uri(), "apps/%1s/token");
    }

    #[test]
    fn test_resolve_without_placeholders() {
        let resolved = GET_ENTITIES.resolve(&["ignored"]).unwrap();
        assert_eq!(resolved, GET_ENTITIES);
    }

    #[test]
    fn test_resolve_literal_percent() {
        let endpoint = Endpoint::new("search/100%%/%s/%d", HttpMethod::Get);
        let resolved = endpoint.resolve(&["x"]).unwrap();
        assert_eq!(resolved.uri(), "search/100%/x/%d");
    }

    #[test]
    fn test_resolve_missing_param() {
        let err = UPDATE_ENTITY.resolve(&[]).unwrap_err();
        match err {
            ApiError::MissingPathParam { template, index } => {
                assert_eq!(template, "entities/%1s");
                assert_eq!(index, 0);
            }
            other => panic!("expected MissingPathParam, got {:?}", other),
        }
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
    }
}
