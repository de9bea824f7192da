#![allow(clippy::unwrap_used, clippy::expect_used)]

use engage_http::{HttpClientBuilder, TransportSecurity};
use engage_security::RequestContext;
use engagement_access::BackendConfig;
use engagement_access::infra::rest::{RestBackend, RestSetupError};
use engagement_access_sdk::{
    AccessError, EngagementApi, LanguageApi, MetaApi, TenantApi, UserApi, UserQuery, WidgetApi,
    WidgetSortEntry,
};
use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::json;

fn backend(server: &MockServer) -> RestBackend {
    let client = HttpClientBuilder::new()
        .transport(TransportSecurity::AllowInsecureHttp)
        .build()
        .unwrap();
    RestBackend::with_client(client, &format!("{}/api", server.base_url())).unwrap()
}

fn tenant_json(short_name: &str) -> serde_json::Value {
    json!({
        "short_name": short_name,
        "title": short_name.to_uppercase(),
        "default_language": "en"
    })
}

#[tokio::test]
async fn context_travels_as_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/tenants/gdx")
                .header("authorization", "Bearer t0ken")
                .header("tenant-id", "gdx")
                .header("accept-language", "fr");
            then.status(200).json_body(tenant_json("gdx"));
        })
        .await;

    let ctx = RequestContext::builder()
        .tenant_id("gdx")
        .language_id("fr")
        .auth_token(SecretString::from("t0ken"))
        .build();
    let tenant = backend(&server).get_tenant(&ctx, "gdx").await.unwrap();

    mock.assert_async().await;
    assert_eq!(tenant.short_name, "gdx");
    assert_eq!(tenant.default_language, "en");
}

#[tokio::test]
async fn status_codes_map_to_error_kinds() {
    let cases = [
        (404, "missing"),
        (401, "anonymous"),
        (403, "forbidden"),
        (500, "broken"),
    ];
    let server = MockServer::start_async().await;
    for (status, name) in cases {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/api/tenants/{name}"));
                then.status(status);
            })
            .await;
    }
    let backend = backend(&server);
    let ctx = RequestContext::anonymous();

    let missing = backend.get_tenant(&ctx, "missing").await.unwrap_err();
    assert_eq!(missing, AccessError::not_found("tenant 'missing'"));

    for name in ["anonymous", "forbidden"] {
        let err = backend.get_tenant(&ctx, name).await.unwrap_err();
        assert_eq!(err, AccessError::Unauthorized, "{name}");
    }

    let broken = backend.get_tenant(&ctx, "broken").await.unwrap_err();
    assert!(matches!(broken, AccessError::BackendFailure(ref m) if m.contains("tenant 'broken'")));
}

#[tokio::test]
async fn duplicate_language_mapping_is_a_conflict() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/tenants/gdx/languages/fr")
                .json_body(json!({"tenant": "gdx", "language": "fr"}));
            then.status(409);
        })
        .await;

    let err = backend(&server)
        .add_tenant_language(&RequestContext::anonymous(), "gdx", "fr")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.is_conflict());
}

#[tokio::test]
async fn removing_language_sends_delete() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/tenants/gdx/languages/de");
            then.status(204);
        })
        .await;

    backend(&server)
        .remove_tenant_language(&RequestContext::anonymous(), "gdx", "de")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn slug_resolves_to_engagement_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/slugs/test-engagement");
            then.status(200)
                .json_body(json!({"slug": "test-engagement", "engagement_id": 42}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/engagements/42");
            then.status(200).json_body(json!({
                "id": 42,
                "slug": "test-engagement",
                "name": "Test",
                "status": "published",
                "start_date": "2026-01-01T00:00:00Z",
                "end_date": null
            }));
        })
        .await;

    let backend = backend(&server);
    let ctx = RequestContext::anonymous();
    let id = backend
        .engagement_id_by_slug(&ctx, "test-engagement")
        .await
        .unwrap();
    let engagement = backend.get_engagement(&ctx, id).await.unwrap();

    assert_eq!(id, 42);
    assert_eq!(engagement.slug, "test-engagement");
    assert!(engagement.start_date.is_some());
}

#[tokio::test]
async fn version_is_unwrapped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({"version": "2.4.0"}));
        })
        .await;

    let version = backend(&server)
        .api_version(&RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(version, "2.4.0");
}

#[tokio::test]
async fn user_query_becomes_query_string() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/")
                .query_param("page", "2")
                .query_param("size", "25")
                .query_param("search_text", "ada");
            then.status(200).json_body(json!({
                "items": [{"id": "u-1", "first_name": "Ada", "last_name": "Lovelace"}],
                "total": 26
            }));
        })
        .await;

    let page = backend(&server)
        .list_users(
            &RequestContext::anonymous(),
            &UserQuery {
                page: 2,
                size: 25,
                search: Some("ada".to_owned()),
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.total, 26);
    assert_eq!(page.items[0].full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn widget_order_is_patched() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/engagements/42/widgets/sort_index")
                .json_body(json!([
                    {"id": 3, "sort_index": 1},
                    {"id": 1, "sort_index": 2}
                ]));
            then.status(204);
        })
        .await;

    backend(&server)
        .sort_widgets(
            &RequestContext::anonymous(),
            42,
            &[
                WidgetSortEntry { id: 3, sort_index: 1 },
                WidgetSortEntry { id: 1, sort_index: 2 },
            ],
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_body_is_a_backend_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tenants/");
            then.status(200).body("not json");
        })
        .await;

    let err = backend(&server)
        .list_tenants(&RequestContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::BackendFailure(_)));
}

#[test]
fn invalid_base_url_is_rejected() {
    let config = BackendConfig {
        base_url: "not a url".to_owned(),
        ..BackendConfig::default()
    };
    let err = RestBackend::new(&config).unwrap_err();
    assert!(matches!(err, RestSetupError::InvalidBaseUrl { .. }));
}

#[tokio::test]
async fn plain_http_needs_opt_in_from_config() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/version");
            then.status(200).json_body(json!({ "version": "1.0.0" }));
        })
        .await;
    let base_url = format!("{}/api", server.base_url());
    let ctx = RequestContext::anonymous();

    let strict = RestBackend::new(&BackendConfig {
        base_url: base_url.clone(),
        ..BackendConfig::default()
    })
    .unwrap();
    match strict.api_version(&ctx).await.unwrap_err() {
        AccessError::BackendFailure(message) => assert!(message.contains("PlainHttp"), "{message}"),
        other => panic!("expected BackendFailure, got {other:?}"),
    }
    mock.assert_hits_async(0).await;

    let local = RestBackend::new(&BackendConfig {
        base_url,
        allow_insecure_http: true,
        ..BackendConfig::default()
    })
    .unwrap();
    assert_eq!(local.api_version(&ctx).await.unwrap(), "1.0.0");
    mock.assert_async().await;
}
