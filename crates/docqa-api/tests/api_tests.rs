//! API Integration Tests
//!
//! Drives the router directly with fake collaborators, so no network
//! access or running services are required.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use docqa_api::AppState;
use docqa_core::{
    AppConfig, ChatMessage, DocqaError, LlmClient, RetrievalBackend, Result, RetrieveRequest,
    RetrieveResult, Snippet, SourceFile,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

// =============================================================================
// Fakes
// =============================================================================

struct FakeRetrieval {
    response: Mutex<Option<Result<RetrieveResult>>>,
    calls: AtomicUsize,
}

impl FakeRetrieval {
    fn ok(result: RetrieveResult) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(Ok(result))),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(status: Option<u16>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(Some(Err(DocqaError::Retrieval {
                status,
                message: "retrieval proxy failure".to_string(),
                details: None,
            }))),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RetrievalBackend for FakeRetrieval {
    async fn retrieve(&self, _request: &RetrieveRequest) -> Result<RetrieveResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(RetrieveResult::default()))
    }

    fn name(&self) -> &str {
        "fake-retrieval"
    }
}

struct FakeLlm {
    answers: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeLlm {
    fn answering(answers: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            Ok(String::new())
        } else {
            Ok(answers.remove(0))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(retrieval: Arc<FakeRetrieval>, llm: Arc<FakeLlm>) -> Router {
    let state = Arc::new(AppState::with_backends(
        AppConfig::for_testing(),
        retrieval,
        llm,
    ));
    docqa_api::create_router(state)
}

fn manual_rh_result() -> RetrieveResult {
    RetrieveResult {
        snippets: vec![Snippet {
            text: "Los empleados tienen 15 días hábiles de vacaciones al año.".to_string(),
            file: Some(SourceFile {
                name: "Manual_RH.pdf".to_string(),
                web_url: "https://example.com/Manual_RH.pdf".to_string(),
            }),
        }],
        top_files: vec![SourceFile {
            name: "Manual_RH.pdf".to_string(),
            web_url: "https://example.com/Manual_RH.pdf".to_string(),
        }],
    }
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Service Info / Health Tests
// =============================================================================

#[tokio::test]
async fn test_root_reports_service() {
    let app = app(
        FakeRetrieval::ok(RetrieveResult::default()),
        FakeLlm::answering(vec![]),
    );

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "docqa-api");
}

#[tokio::test]
async fn test_health_check() {
    let app = app(
        FakeRetrieval::ok(RetrieveResult::default()),
        FakeLlm::answering(vec![]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app(
        FakeRetrieval::ok(RetrieveResult::default()),
        FakeLlm::answering(vec![]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["uptime_seconds"].is_number());
    assert!(json["total_requests"].is_number());
}

// =============================================================================
// Chat Validation Tests
// =============================================================================

#[tokio::test]
async fn test_missing_query_is_rejected_before_any_outbound_call() {
    let retrieval = FakeRetrieval::ok(RetrieveResult::default());
    let llm = FakeLlm::answering(vec![]);
    let app = app(retrieval.clone(), llm.clone());

    let response = app
        .oneshot(chat_request(json!({ "topK": 5 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Falta \"query\" (string)");
    assert_eq!(json["status"], 400);
    assert!(json["details"].is_null());

    assert_eq!(retrieval.call_count(), 0);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let retrieval = FakeRetrieval::ok(RetrieveResult::default());
    let app = app(retrieval.clone(), FakeLlm::answering(vec![]));

    let response = app
        .oneshot(chat_request(json!({ "query": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "Falta \"query\" (string)");
    assert_eq!(retrieval.call_count(), 0);
}

#[tokio::test]
async fn test_whitespace_query_is_rejected() {
    let app = app(
        FakeRetrieval::ok(RetrieveResult::default()),
        FakeLlm::answering(vec![]),
    );

    let response = app
        .oneshot(chat_request(json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_string_query_is_rejected() {
    let retrieval = FakeRetrieval::ok(RetrieveResult::default());
    let app = app(retrieval.clone(), FakeLlm::answering(vec![]));

    let response = app
        .oneshot(chat_request(json!({ "query": 42 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(retrieval.call_count(), 0);
}

// =============================================================================
// Chat Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_vacation_policy_scenario() {
    let retrieval = FakeRetrieval::ok(manual_rh_result());
    let llm = FakeLlm::answering(vec![
        "Los empleados tienen 15 días hábiles de vacaciones al año según el manual.",
    ]);
    let app = app(retrieval, llm);

    let response = app
        .oneshot(chat_request(json!({
            "query": "¿Cuál es la política de vacaciones?",
            "pathPrefix": "/rrhh"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["ok"], true);
    assert_eq!(json["query"], "¿Cuál es la política de vacaciones?");
    assert_eq!(json["used"]["pathPrefix"], "/rrhh");
    assert_eq!(json["snippets"].as_array().unwrap().len(), 1);
    assert_eq!(json["debug"]["snippetsCount"], 1);

    // Sources section always references the candidate file
    let answer = json["answer"].as_str().unwrap();
    assert!(answer.contains("Fuentes:"));
    assert!(answer.contains("Manual_RH.pdf"));
}

#[tokio::test]
async fn test_default_params_echoed_in_used() {
    let retrieval = FakeRetrieval::ok(manual_rh_result());
    let llm = FakeLlm::answering(vec![
        "Respuesta suficientemente larga para pasar la puerta de calidad.",
    ]);
    let app = app(retrieval, llm);

    let response = app
        .oneshot(chat_request(json!({ "query": "pregunta" })))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["used"]["topK"], 6);
    assert_eq!(json["used"]["fileTypes"], json!(["pdf", "docx", "txt"]));
    // Default prefix is empty: omitted means global search
    assert!(json["used"].get("pathPrefix").is_none());
}

#[tokio::test]
async fn test_fractional_top_k_is_floored() {
    let retrieval = FakeRetrieval::ok(manual_rh_result());
    let llm = FakeLlm::answering(vec![
        "Respuesta suficientemente larga para pasar la puerta de calidad.",
    ]);
    let app = app(retrieval, llm);

    // Some serializers emit integral numbers as floats
    let response = app
        .oneshot(chat_request(json!({ "query": "pregunta", "topK": 3.0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["used"]["topK"], 3);
}

#[tokio::test]
async fn test_retrieval_failure_mirrors_proxy_status() {
    let app = app(FakeRetrieval::failing(Some(502)), FakeLlm::answering(vec![]));

    let response = app
        .oneshot(chat_request(json!({ "query": "pregunta" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["status"], 502);
}

#[tokio::test]
async fn test_retrieval_timeout_defaults_to_500() {
    let app = app(FakeRetrieval::failing(None), FakeLlm::answering(vec![]));

    let response = app
        .oneshot(chat_request(json!({ "query": "pregunta" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert!(json["details"].is_null());
}

#[tokio::test]
async fn test_evasive_answer_is_retried_and_replaced() {
    let retrieval = FakeRetrieval::ok(manual_rh_result());
    let llm = FakeLlm::answering(vec![
        "Lo siento, no tengo acceso a los documentos de la empresa.",
        "Los empleados tienen 15 días hábiles de vacaciones al año.",
    ]);
    let app = app(retrieval, llm.clone());

    let response = app
        .oneshot(chat_request(json!({ "query": "¿Cuántos días de vacaciones?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // Exactly one retry, and its output replaced the evasive answer
    assert_eq!(llm.call_count(), 2);
    let answer = json["answer"].as_str().unwrap();
    assert!(answer.contains("15 días"));
    assert!(!answer.contains("no tengo acceso"));
}

#[tokio::test]
async fn test_model_silence_yields_fallback_answer() {
    let retrieval = FakeRetrieval::ok(manual_rh_result());
    // The fake returns empty strings once scripted answers run out
    let llm = FakeLlm::answering(vec![]);
    let app = app(retrieval, llm);

    let response = app
        .oneshot(chat_request(json!({ "query": "pregunta" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let answer = json["answer"].as_str().unwrap();
    assert!(!answer.trim().is_empty());
    assert!(answer.contains(docqa_rag::FALLBACK_HEADER));
    assert!(answer.contains("Manual_RH.pdf"));
}
