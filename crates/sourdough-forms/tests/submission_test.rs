//! End-to-end contact submissions against live providers
//!
//! The gateway provider runs against a real router; Formspree and Netlify are
//! stood in for by a small axum app that counts what it receives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::Value;
use sourdough_api::{create_router, AppState};
use sourdough_client::testing::TestServer;
use sourdough_core::{Filters, MemoryBackend, StorageBackend};
use sourdough_forms::{
    ContactField, DeliveryProvider, FormController, FormError, SubmitStatus, FAILURE_MESSAGE,
    SUCCESS_MESSAGE,
};
use tokio::net::TcpListener;

// =============================================================================
// Helpers
// =============================================================================

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<AtomicUsize>,
    json: Arc<Mutex<Vec<Value>>>,
    forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
    status: Arc<Mutex<Option<StatusCode>>>,
}

impl Recorder {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> StatusCode {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.status.lock().unwrap_or(StatusCode::OK)
    }
}

async fn formspree_endpoint(State(rec): State<Recorder>, Json(body): Json<Value>) -> StatusCode {
    rec.json.lock().push(body);
    rec.respond()
}

async fn netlify_endpoint(
    State(rec): State<Recorder>,
    Form(body): Form<HashMap<String, String>>,
) -> StatusCode {
    rec.forms.lock().push(body);
    rec.respond()
}

/// Serve a recording provider; returns its origin
async fn recording_provider(rec: Recorder) -> String {
    let app = Router::new()
        .route("/f/{form_id}", post(formspree_endpoint))
        .route("/", post(netlify_endpoint))
        .with_state(rec);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

fn fill_valid(form: &FormController) {
    form.edit(ContactField::Name, "Ada Lovelace");
    form.edit(ContactField::Email, "ada@example.com");
    form.edit(ContactField::Message, "I would like a quote for bread.");
}

fn invalid_inputs() -> Vec<(ContactField, &'static str)> {
    vec![
        (ContactField::Name, ""),
        (ContactField::Email, "not-an-email"),
        (ContactField::Message, "short"),
    ]
}

// =============================================================================
// Gateway provider
// =============================================================================

#[tokio::test]
async fn test_api_provider_stores_submission() {
    let backend = Arc::new(MemoryBackend::new());
    let server = TestServer::start(create_router(AppState::new(backend.clone())))
        .await
        .unwrap();

    let form = FormController::from_provider(&DeliveryProvider::Api {
        base_url: format!("{}/api", server.base_url()),
        collection: "contacts".to_string(),
    })
    .unwrap();
    fill_valid(&form);
    form.edit(ContactField::Company, "Analytical Engines Ltd");

    form.submit().await.unwrap();
    assert_eq!(form.status(), SubmitStatus::Success(SUCCESS_MESSAGE.to_string()));

    let stored = backend.list("contacts", &Filters::new()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], "Ada Lovelace");
    assert_eq!(stored[0]["company"], "Analytical Engines Ltd");
    assert!(stored[0]["id"].is_string());
    assert!(stored[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_gateway() {
    let backend = Arc::new(MemoryBackend::new());
    let server = TestServer::start(create_router(AppState::new(backend.clone())))
        .await
        .unwrap();

    for (field, bad) in invalid_inputs() {
        let form = FormController::from_provider(&DeliveryProvider::Api {
            base_url: format!("{}/api", server.base_url()),
            collection: "contacts".to_string(),
        })
        .unwrap();
        fill_valid(&form);
        form.edit(field, bad);

        let err = form.submit().await.unwrap_err();
        match err {
            FormError::Validation(errors) => {
                assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![field])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_api_provider_unreachable_reports_error() {
    let form = FormController::from_provider(&DeliveryProvider::Api {
        base_url: "http://127.0.0.1:9/api".to_string(),
        collection: "contacts".to_string(),
    })
    .unwrap();
    fill_valid(&form);

    assert!(form.submit().await.is_err());
    assert_eq!(form.status(), SubmitStatus::Error(FAILURE_MESSAGE.to_string()));
    // values are kept so the visitor can retry
    assert_eq!(form.values().name, "Ada Lovelace");
    assert!(!form.is_submitting());
}

// =============================================================================
// Third-party providers
// =============================================================================

#[tokio::test]
async fn test_formspree_receives_json() {
    let rec = Recorder::default();
    let origin = recording_provider(rec.clone()).await;

    let form = FormController::from_provider(&DeliveryProvider::Formspree {
        form_id: "xyzabcd".to_string(),
        endpoint: format!("{}/f", origin),
    })
    .unwrap();
    fill_valid(&form);

    form.submit().await.unwrap();
    assert_eq!(rec.calls(), 1);

    let bodies = rec.json.lock();
    assert_eq!(bodies[0]["email"], "ada@example.com");
    assert!(bodies[0].get("phone").is_none());
}

#[tokio::test]
async fn test_netlify_receives_urlencoded_form() {
    let rec = Recorder::default();
    let origin = recording_provider(rec.clone()).await;

    let form = FormController::from_provider(&DeliveryProvider::Netlify {
        site_url: format!("{}/contact", origin),
        form_name: "contact".to_string(),
    })
    .unwrap();
    fill_valid(&form);
    form.edit(ContactField::Phone, "+44 20 7946 0000");

    form.submit().await.unwrap();

    let forms = rec.forms.lock();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].get("form-name").map(String::as_str), Some("contact"));
    assert_eq!(
        forms[0].get("phone").map(String::as_str),
        Some("+44 20 7946 0000")
    );
    assert!(!forms[0].contains_key("company"));
}

#[tokio::test]
async fn test_provider_rejection_sets_failure_status() {
    let rec = Recorder::default();
    *rec.status.lock() = Some(StatusCode::UNPROCESSABLE_ENTITY);
    let origin = recording_provider(rec.clone()).await;

    let form = FormController::from_provider(&DeliveryProvider::Formspree {
        form_id: "xyzabcd".to_string(),
        endpoint: format!("{}/f", origin),
    })
    .unwrap();
    fill_valid(&form);

    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, FormError::Rejected(_)));
    assert_eq!(form.status(), SubmitStatus::Error(FAILURE_MESSAGE.to_string()));

    form.edit(ContactField::Message, "Second attempt at a quote.");
    assert_eq!(form.status(), SubmitStatus::Idle);
}

#[tokio::test]
async fn test_invalid_input_makes_zero_provider_calls() {
    let rec = Recorder::default();
    let origin = recording_provider(rec.clone()).await;

    for (field, bad) in invalid_inputs() {
        for provider in [
            DeliveryProvider::Formspree {
                form_id: "xyzabcd".to_string(),
                endpoint: format!("{}/f", origin),
            },
            DeliveryProvider::Netlify {
                site_url: origin.clone(),
                form_name: "contact".to_string(),
            },
        ] {
            let form = FormController::from_provider(&provider).unwrap();
            fill_valid(&form);
            form.edit(field, bad);
            assert!(matches!(
                form.submit().await,
                Err(FormError::Validation(_))
            ));
        }
    }

    assert_eq!(rec.calls(), 0);
}

#[tokio::test]
async fn test_none_provider_only_validates() {
    let form = FormController::from_provider(&DeliveryProvider::None).unwrap();
    fill_valid(&form);
    form.submit().await.unwrap();
    assert_eq!(form.status(), SubmitStatus::Success(SUCCESS_MESSAGE.to_string()));
}
