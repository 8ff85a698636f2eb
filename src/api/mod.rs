// HTTP API
// Routes, CORS policy and error mapping for the analysis service

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::models::{
    AnalysisRequest, AnalysisResult, DetectionResult, ErrorResponse, HealthResponse,
    HumanizationResult, LanguageInfo, RootResponse, SupportedLanguage,
};
use crate::services::analysis::prompts::supported_instruction;
use crate::services::analysis::Analyzer;

pub const SERVICE_NAME: &str = "multilingual-paraphraser";
const ROOT_MESSAGE: &str = "Multilingual Academic AI Detection & Humanizer API";

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Request body missing, malformed or semantically invalid.
    Invalid(String),
    /// Collaborator call failed; message already carries the operation prefix.
    Failed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Invalid(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Failed(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Unwrap the JSON body and apply request-level validation.
fn accept(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<AnalysisRequest, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::Invalid(rejection.body_text()))?;
    req.validate().map_err(ApiError::Invalid)?;
    Ok(req)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

async fn languages() -> Json<Vec<LanguageInfo>> {
    Json(
        SupportedLanguage::ALL
            .iter()
            .map(|lang| LanguageInfo {
                code: lang.code().to_string(),
                instruction: supported_instruction(*lang).to_string(),
            })
            .collect(),
    )
}

async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<DetectionResult>, ApiError> {
    let req = accept(payload)?;
    let result = state
        .analyzer
        .detect(&req)
        .await
        .map_err(|e| ApiError::Failed(e.to_string()))?;
    Ok(Json(result))
}

async fn humanize(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<HumanizationResult>, ApiError> {
    let req = accept(payload)?;
    let result = state
        .analyzer
        .humanize(&req)
        .await
        .map_err(|e| ApiError::Failed(e.to_string()))?;
    Ok(Json(result))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let req = accept(payload)?;
    let result = state
        .analyzer
        .analyze(&req)
        .await
        .map_err(|e| ApiError::Failed(format!("Full analysis failed: {}", e)))?;
    Ok(Json(result))
}

/// Allow-list CORS with credentials. A `*` entry mirrors the caller's origin,
/// since a literal wildcard is not allowed alongside credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(analyzer: Arc<Analyzer>, cors_origins: &[String]) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %Uuid::new_v4()
        )
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/detect", post(detect))
        .route("/humanize", post(humanize))
        .route("/analyze", post(analyze))
        .with_state(AppState { analyzer })
        .layer(cors_layer(cors_origins))
        .layer(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::test_support::ScriptedGenerator;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(replies: Vec<Result<&str, &str>>) -> (Router, Arc<ScriptedGenerator>) {
        let generator = ScriptedGenerator::new(replies);
        let analyzer = Arc::new(Analyzer::new(generator.clone(), 30.0));
        (router(analyzer, &["http://localhost:3000".to_string()]), generator)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (app, _) = app(vec![]);
        let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

        let (status, body) = send(app.clone(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], ROOT_MESSAGE);

        let (status, body) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "multilingual-paraphraser"}));
    }

    #[tokio::test]
    async fn test_languages_lists_supported_codes() {
        let (app, _) = app(vec![]);
        let req = Request::builder().uri("/languages").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["en", "de", "fr", "it", "es", "pl", "tr"]);
    }

    #[tokio::test]
    async fn test_detect_collaborator_failure_is_500() {
        let (app, _) = app(vec![Err("connection refused")]);
        let request = post_json("/detect", json!({"text": "The cat sat.", "language": "en"}));
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("AI detection failed: "));
        assert!(detail.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_detect_parsed_reply() {
        let (app, _) = app(vec![Ok(
            r#"{"ai_probability": 12, "confidence": 90, "analysis": "varied", "flagged_sentences": []}"#,
        )]);
        let (status, body) = send(app, post_json("/detect", json!({"text": "The cat sat."}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "ai_probability": 12.0,
                "confidence": 90.0,
                "analysis": "varied",
                "flagged_sentences": []
            })
        );
    }

    #[tokio::test]
    async fn test_humanize_non_json_reply_returns_fallback() {
        let (app, _) = app(vec![Ok("Here is your improved paragraph!")]);
        let (status, body) = send(
            app,
            post_json(
                "/humanize",
                json!({"text": "Prior work [3] shows this.", "preserve_citations": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "original_text": "Prior work [3] shows this.",
                "humanized_text": "Prior work [3] shows this.",
                "changes_made": ["Text processed"],
                "meaning_preservation_score": 100.0,
                "citations_preserved": true
            })
        );
    }

    #[tokio::test]
    async fn test_humanize_failure_is_500() {
        let (app, _) = app(vec![Err("quota")]);
        let (status, body) = send(app, post_json("/humanize", json!({"text": "x"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Humanization failed: "));
    }

    #[tokio::test]
    async fn test_analyze_low_probability() {
        let (app, generator) = app(vec![Ok(r#"{"ai_probability": 10, "confidence": 85}"#)]);
        let (status, body) =
            send(app, post_json("/analyze", json!({"text": "I wrote this."}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detection"]["ai_probability"], 10.0);
        assert_eq!(body["humanized"]["humanized_text"], "I wrote this.");
        assert_eq!(
            body["humanized"]["changes_made"],
            json!(["No changes needed - text appears human-written"])
        );
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_detect_failure() {
        let (app, generator) = app(vec![Err("timeout"), Ok("{}")]);
        let (status, body) = send(app, post_json("/analyze", json!({"text": "x"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Full analysis failed: AI detection failed: "));
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_collaborator_call() {
        let (app, generator) = app(vec![Ok("{}")]);
        let (status, body) = send(app, post_json("/detect", json!({"text": "  "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "text must not be empty");
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let (app, _) = app(vec![]);
        let request = post_json("/analyze", json!({"text": "x", "academic_level": "postdoc"}));
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let (app, _) = app(vec![]);
        let with_origin = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(with_origin("http://localhost:3000")).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:3000");
        assert_eq!(headers["access-control-allow-credentials"], "true");

        let response = app.oneshot(with_origin("https://evil.example")).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight_mirrors_method_and_headers() {
        let (app, _) = app(vec![]);
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/analyze")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization,content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-methods"], "POST");
        assert_eq!(headers["access-control-allow-headers"], "authorization,content-type");
    }
}
