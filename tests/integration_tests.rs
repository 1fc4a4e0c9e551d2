use apinode::endpoint::{CREATE_ENTITY, DELETE_ENTITY, GET_ENTITIES, GET_ENTITY_BY_ID};
use apinode::{json, ApiContext, ApiError, ApiRequest, Config, Entity, NodeMeta, Param, Time};
use httpmock::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(rename = "id", alias = "projectId")]
    id: String,
    name: String,
    #[serde(default)]
    created: Option<Time>,
    #[serde(skip)]
    meta: NodeMeta,
}

impl Entity for Project {
    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }
    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn context(server: &MockServer, token: Option<&str>) -> Arc<ApiContext> {
    init_tracing();
    let config = Config::new(server.base_url(), "v1").with_retry_token_delay(Duration::from_millis(10));
    let mut builder = ApiContext::builder("app-1", "s3cret").config(config);
    if let Some(token) = token {
        builder = builder.token(token);
    }
    builder.build().expect("failed to build context")
}

#[test]
fn test_get_single_entity() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/entities/p1")
            .header("authorization", "tok")
            .header("content-type", "application/json");
        then.status(200)
            .body(r#"{"data": {"projectId": "p1", "name": "Apollo", "created": "2024-03-01T12:30:00.000Z"}}"#);
    });

    let ctx = context(&server, Some("tok"));
    let project = ApiRequest::new(&ctx, &GET_ENTITY_BY_ID, &["p1"])
        .unwrap()
        .execute_one::<Project>()
        .expect("request failed")
        .expect("expected one project");

    mock.assert();
    assert_eq!(project.id(), Some("p1"));
    assert_eq!(project.name, "Apollo");
    assert_eq!(project.created.unwrap().to_string(), "2024-03-01T12:30:00.000Z");
    assert_eq!(
        project.raw_response(),
        r#"{"projectId": "p1", "name": "Apollo", "created": "2024-03-01T12:30:00.000Z"}"#
    );
}

#[test]
fn test_pagination_next_page() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/entities")
            .query_param("limit", "2")
            .query_param("offset", "0");
        then.status(200).body(
            r#"{"data": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
                "meta": {"pagination": {"limit": 2, "offset": 0, "total": 3}}}"#,
        );
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/entities")
            .query_param("limit", "2")
            .query_param("offset", "2");
        then.status(200).body(
            r#"{"data": [{"id": "c", "name": "C"}],
                "meta": {"pagination": {"limit": 2, "offset": 2, "total": 3}}}"#,
        );
    });

    let ctx = context(&server, None);
    let request = ApiRequest::new(&ctx, &GET_ENTITIES, &[])
        .unwrap()
        .with_param("limit", 2)
        .with_param("offset", 0);

    let page = request.execute::<Project>().expect("first page failed");
    assert_eq!(page.len(), 2);
    assert!(page.has_next_page());

    let next = page.next_page_with(2).expect("second page failed");
    assert_eq!(next.len(), 1);
    assert_eq!(next.head().unwrap().id, "c");
    assert!(!next.has_next_page());

    first.assert();
    second.assert();
}

#[test]
fn test_post_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/entities")
            .json_body(json!({"name": "Gemini", "tags": ["x", "y"]}));
        then.status(201).body(r#"{"id": "p9", "name": "Gemini"}"#);
    });

    let ctx = context(&server, None);
    let mut request = ApiRequest::new(&ctx, &CREATE_ENTITY, &[]).unwrap();
    request.set_param("name", "Gemini");
    request.set_param("tags", json!(["x", "y"]));

    let created = request.execute::<Project>().expect("create failed");
    mock.assert();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "p9");
}

#[test]
fn test_token_regenerated_once_on_401() {
    let server = MockServer::start();
    let expired = server.mock(|when, then| {
        when.method(DELETE)
            .path("/v1/entities/p1")
            .header("authorization", "expired");
        then.status(401);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/apps/app-1/token")
            .json_body(json!({"appSecret": "s3cret"}));
        then.status(200).body(r#"{"data": {"appId": "app-1", "token": "fresh"}}"#);
    });
    let retried = server.mock(|when, then| {
        when.method(DELETE)
            .path("/v1/entities/p1")
            .header("authorization", "fresh");
        then.status(200).body(r#"{"id": "p1", "name": "deleted"}"#);
    });

    let ctx = context(&server, Some("expired"));
    let deleted = ApiRequest::new(&ctx, &DELETE_ENTITY, &["p1"])
        .unwrap()
        .execute::<Project>()
        .expect("delete failed");

    assert_eq!(deleted[0].name, "deleted");
    assert_eq!(ctx.token().as_deref(), Some("fresh"));
    expired.assert_hits(1);
    refresh.assert_hits(1);
    retried.assert_hits(1);
}

#[test]
fn test_retry_exhausted_after_second_401() {
    let server = MockServer::start();
    let rejected = server.mock(|when, then| {
        when.method(GET).path("/v1/entities");
        then.status(401).body(r#"{"error": "unauthorized"}"#);
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/v1/apps/app-1/token");
        then.status(200).body(r#"{"id": "app-1", "token": "still-bad"}"#);
    });

    let ctx = context(&server, Some("expired"));
    let err = ApiRequest::new(&ctx, &GET_ENTITIES, &[])
        .unwrap()
        .execute::<Project>()
        .unwrap_err();

    assert!(matches!(err, ApiError::RetryExhausted), "got {:?}", err);
    assert_eq!(err.to_string(), "retry timeout exceeded");
    rejected.assert_hits(2);
    refresh.assert_hits(1);
}

#[test]
fn test_delete_no_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/v1/entities/p1");
        then.status(204);
    });

    let ctx = context(&server, Some("tok"));
    let deleted = ApiRequest::new(&ctx, &DELETE_ENTITY, &["p1"])
        .unwrap()
        .execute::<Project>()
        .expect("delete failed");

    mock.assert();
    assert!(deleted.is_empty());
    assert_eq!(deleted.raw_response(), "");
}

#[test]
fn test_server_error_carries_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/entities/missing");
        then.status(404).body(r#"{"error": "not found"}"#);
    });

    let ctx = context(&server, Some("tok"));
    let err = ApiRequest::new(&ctx, &GET_ENTITY_BY_ID, &["missing"])
        .unwrap()
        .execute::<Project>()
        .unwrap_err();

    assert!(err.is_request_failure());
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.raw_body_as_json().unwrap()["error"], "not found");
    // a 404 does not touch the token
    assert_eq!(ctx.token().as_deref(), Some("tok"));
}

#[test]
fn test_malformed_success_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/entities");
        then.status(200).body("{null}");
    });

    let ctx = context(&server, None);
    let err = ApiRequest::new(&ctx, &GET_ENTITIES, &[])
        .unwrap()
        .execute::<Project>()
        .unwrap_err();

    assert!(err.is_malformed_response());
    assert!(err.to_string().contains("{null}"));
}

#[test]
fn test_connection_refused_is_transport_error() {
    init_tracing();
    let config = Config::new("http://127.0.0.1:9", "v1");
    let ctx = ApiContext::builder("app-1", "s3cret")
        .config(config)
        .build()
        .unwrap();

    let err = ApiRequest::new(&ctx, &GET_ENTITIES, &[])
        .unwrap()
        .execute_with::<Project>(Param::new())
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    assert!(err.is_request_failure());
}
