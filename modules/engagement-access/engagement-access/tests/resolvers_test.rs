#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{RecordingBackend, seed, tenant};
use engage_security::{RequestContext, Session};
use engagement_access::domain::DomainError;
use engagement_access::{AccessConfig, Service};
use engagement_access_sdk::{Backend, LanguageChange};

fn service(backend: &Arc<RecordingBackend>) -> Service {
    let backend: Arc<dyn Backend> = backend.clone();
    Service::new(backend, &AccessConfig::default())
}

#[tokio::test]
async fn removing_default_issues_no_backend_call() {
    let backend = Arc::new(RecordingBackend::new(seed()));
    let svc = service(&backend);

    let err = svc
        .remove_tenant_language(&RequestContext::anonymous(), &tenant("gdx", "en"), "en")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DefaultLanguageRemoval { .. }));
    assert!(backend.calls().is_empty(), "{:?}", backend.calls());
}

#[tokio::test]
async fn blank_language_code_issues_no_backend_call() {
    let backend = Arc::new(RecordingBackend::new(seed()));
    let svc = service(&backend);
    let gdx = tenant("gdx", "en");

    let add = svc
        .add_tenant_language(&RequestContext::anonymous(), &gdx, "  ")
        .await
        .unwrap_err();
    assert!(matches!(add, DomainError::EmptyLanguageCode));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn re_adding_enabled_language_is_a_no_op() {
    let backend = Arc::new(RecordingBackend::new(seed()));
    let svc = service(&backend);

    let change = svc
        .add_tenant_language(&RequestContext::anonymous(), &tenant("gdx", "en"), "fr")
        .await
        .unwrap();

    assert_eq!(change, LanguageChange::Unchanged);
    assert!(!backend.called("add_tenant_language"));
}

#[tokio::test]
async fn blank_tenant_issues_no_backend_call() {
    let backend = Arc::new(RecordingBackend::new(seed()));
    let svc = service(&backend);

    let err = svc
        .resolve_tenant(&RequestContext::anonymous(), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyTenant));

    let languages = svc
        .enabled_languages(&RequestContext::anonymous(), "")
        .await
        .unwrap();
    assert!(languages.is_empty());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn stale_session_language_is_replaced_on_every_resolution() {
    let backend = Arc::new(RecordingBackend::new(seed()));
    let svc = service(&backend);
    let session = Session::new();
    let gdx = tenant("gdx", "en");
    let ctx = RequestContext::anonymous();

    session.set_language("fr");
    let kept = svc.resolve_active_language(&ctx, &session, &gdx).await.unwrap();
    assert_eq!(kept.code(), Some("fr"));
    assert!(!kept.reset);

    svc.remove_tenant_language(&ctx, &gdx, "fr").await.unwrap();

    let reset = svc.resolve_active_language(&ctx, &session, &gdx).await.unwrap();
    assert_eq!(reset.code(), Some("en"));
    assert!(reset.reset);
    assert_eq!(session.language_id().as_deref(), Some("en"));
}
