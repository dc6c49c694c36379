//! Superfície HTTP: envio de pedidos, consulta de status e download.
//!
//! Os handlers só falam com o [`BookOrchestrator`] e o seu `JobStore`; todo
//! o trabalho pesado acontece na tarefa de fundo de cada job.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::book::{BookRequest, RequestError};
use crate::orchestrator::{BookOrchestrator, find_artifact};
use crate::providers::{IllustrationSource, StorySource};
use crate::render::PdfConverter;

mod codes {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_BODY: &str = "invalid_body";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    code: &'static str,
    message: String,
}

/// Error returned by a handler, rendered as `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL, message)
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::INVALID_REQUEST,
            err.to_string(),
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), codes::INVALID_BODY, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    job_id: Uuid,
}

#[derive(Debug, Serialize)]
struct DownloadResponse {
    path: String,
}

/// Builds the router for the three book routes.
pub fn router<S, I, C>(orchestrator: Arc<BookOrchestrator<S, I, C>>) -> Router
where
    S: StorySource,
    I: IllustrationSource,
    C: PdfConverter,
{
    Router::new()
        .route("/generate-book", post(generate_book::<S, I, C>))
        .route("/job-status/{job_id}", get(job_status::<S, I, C>))
        .route("/download/{job_id}", get(download::<S, I, C>))
        .with_state(orchestrator)
}

async fn generate_book<S, I, C>(
    State(orchestrator): State<Arc<BookOrchestrator<S, I, C>>>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError>
where
    S: StorySource,
    I: IllustrationSource,
    C: PdfConverter,
{
    let Json(request) = payload?;
    let job_id = orchestrator.submit(request).map_err(|err| {
        warn!(error = %err, "book request rejected");
        ApiError::from(err)
    })?;
    Ok(Json(SubmitResponse { job_id }))
}

async fn job_status<S, I, C>(
    State(orchestrator): State<Arc<BookOrchestrator<S, I, C>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: StorySource,
    I: IllustrationSource,
    C: PdfConverter,
{
    let job = Uuid::parse_str(&job_id)
        .ok()
        .and_then(|id| orchestrator.jobs().get(&id));

    match job {
        Some(job) => Json(job).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "status": "not_found" }))).into_response(),
    }
}

async fn download<S, I, C>(
    State(orchestrator): State<Arc<BookOrchestrator<S, I, C>>>,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError>
where
    S: StorySource,
    I: IllustrationSource,
    C: PdfConverter,
{
    let not_found = || (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();

    let Ok(id) = Uuid::parse_str(&job_id) else {
        return Ok(not_found());
    };

    match find_artifact(orchestrator.media_dir(), &id).await {
        Ok(Some(path)) => Ok(Json(DownloadResponse {
            path: path.display().to_string(),
        })
        .into_response()),
        Ok(None) => Ok(not_found()),
        Err(err) => {
            error!(job_id = %id, error = %err, "failed to list job directory");
            Err(ApiError::internal("failed to read job directory"))
        }
    }
}

/// Serves `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "http server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for ctrl-c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobStore, MemoryJobStore};
    use crate::orchestrator::tests::{offline_orchestrator, wait_until_terminal};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(media: &std::path::Path) -> (Router, Arc<dyn JobStore>) {
        let jobs: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
        let router = router(offline_orchestrator(media, Arc::clone(&jobs)));
        (router, jobs)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate-book")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn submit_then_status_is_never_not_found() {
        let media = tempfile::tempdir().unwrap();
        let (router, _jobs) = app(media.path());

        let (status, body) = send(
            &router,
            post_json(r#"{"name":"Ana","age":5,"theme":"space","pages":6}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let job_id = body["job_id"].as_str().unwrap().to_string();
        assert!(Uuid::parse_str(&job_id).is_ok());

        let (status, body) = send(&router, get(&format!("/job-status/{job_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["status"], "not_found");
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn finished_job_reports_done_and_download_path() {
        let media = tempfile::tempdir().unwrap();
        let (router, jobs) = app(media.path());

        let (_, body) = send(
            &router,
            post_json(r#"{"name":"Ana","age":5,"theme":"space","pages":6}"#),
        )
        .await;
        let job_id = body["job_id"].as_str().unwrap().to_string();
        let id = Uuid::parse_str(&job_id).unwrap();
        wait_until_terminal(jobs.as_ref(), &id).await;

        let (status, body) = send(&router, get(&format!("/job-status/{job_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "done");
        assert!(body.get("error").is_none());

        let (status, body) = send(&router, get(&format!("/download/{job_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let path = body["path"].as_str().unwrap();
        assert!(path.ends_with(&format!("Ana_{job_id}.pdf")));
        assert_eq!(
            std::path::Path::new(path).parent().unwrap(),
            media.path().join(&job_id)
        );
    }

    #[tokio::test]
    async fn invalid_request_is_unprocessable() {
        let media = tempfile::tempdir().unwrap();
        let (router, _jobs) = app(media.path());

        let (status, body) = send(
            &router,
            post_json(r#"{"name":"  ","age":5,"theme":"space"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "invalid_request");
        assert_eq!(body["error"]["message"], "name must not be empty");

        let (status, body) = send(
            &router,
            post_json(r#"{"name":"Ana","age":5,"theme":"space","pages":0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "pages must be at least 1");
    }

    #[tokio::test]
    async fn missing_field_is_rejected_with_error_body() {
        let media = tempfile::tempdir().unwrap();
        let (router, _jobs) = app(media.path());

        let (status, body) = send(&router, post_json(r#"{"name":"Ana","age":5}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "invalid_body");
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let media = tempfile::tempdir().unwrap();
        let (router, _jobs) = app(media.path());

        let (status, body) = send(&router, get(&format!("/job-status/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "not_found" }));

        let (status, body) = send(&router, get("/job-status/not-a-uuid")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "status": "not_found" }));
    }

    #[tokio::test]
    async fn download_without_pdf_is_not_found() {
        let media = tempfile::tempdir().unwrap();
        let (router, _jobs) = app(media.path());

        let (status, body) = send(&router, get(&format!("/download/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "not found" }));

        let (status, body) = send(&router, get("/download/not-a-uuid")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "not found" }));
    }
}
