//! Axum route handlers for the interview API.
//!
//! The AI endpoints are thin pass-throughs over `AiService`; the session
//! endpoints drive the in-process orchestration flow; the candidate endpoints
//! back the interviewer dashboard.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::ai::Evaluation;
use crate::interview::models::{
    CandidateDetails, CandidateRecord, Difficulty, TranscriptEntry,
};
use crate::interview::session::SessionState;
use crate::pdf;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionResponse {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    pub transcript: Option<Vec<TranscriptEntry>>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// AI operations
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/parse-resume
///
/// Extracts name/email/phone from raw resume text. Fields the model cannot
/// find come back null.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<CandidateDetails>, AppError> {
    let resume_text = request.resume_text.as_deref().map(str::trim).unwrap_or_default();
    if resume_text.is_empty() {
        return Err(AppError::Validation("resume_text is required".to_string()));
    }

    let details = state.ai.parse_resume(resume_text).await?;
    Ok(Json(details))
}

/// POST /api/v1/ai/generate-question
///
/// Generates one interview question for a difficulty of easy|medium|hard.
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionRequest>,
) -> Result<Json<GenerateQuestionResponse>, AppError> {
    let difficulty = request
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .ok_or_else(|| AppError::Validation("invalid difficulty level".to_string()))?;

    let question = state.ai.generate_question(difficulty).await?;
    Ok(Json(GenerateQuestionResponse { question }))
}

/// POST /api/v1/ai/evaluate-answer
///
/// Scores one answer 1-10 with a one-sentence justification.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<EvaluateAnswerRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let question = request.question.as_deref().map(str::trim).unwrap_or_default();
    let answer = request.answer.as_deref().map(str::trim).unwrap_or_default();
    if question.is_empty() || answer.is_empty() {
        return Err(AppError::Validation(
            "question and answer are required".to_string(),
        ));
    }

    let evaluation = state.ai.evaluate_answer(question, answer).await?;
    Ok(Json(evaluation))
}

/// POST /api/v1/ai/generate-summary
///
/// Produces the final performance summary from an interview transcript.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> Result<Json<GenerateSummaryResponse>, AppError> {
    let transcript = request
        .transcript
        .ok_or_else(|| AppError::Validation("transcript is required".to_string()))?;

    let summary = state.ai.generate_summary(&transcript).await?;
    Ok(Json(GenerateSummaryResponse { summary }))
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/session/resume
///
/// Starts a session from an uploaded PDF resume (multipart field `file`).
/// Extraction and parsing failures are recovered into the manual-collection
/// chat path; only a missing file or an already-live session is an error.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionState>, AppError> {
    let mut file_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            file_bytes = Some(bytes);
            break;
        }
    }
    let file_bytes =
        file_bytes.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let resume_text = match pdf::extract_text(file_bytes).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Resume document extraction failed: {e:?}");
            None
        }
    };

    let snapshot = state.interview.intake_resume(resume_text).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/session/message
pub async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<SessionState>, AppError> {
    let text = request
        .text
        .ok_or_else(|| AppError::Validation("text is required".to_string()))?;

    let snapshot = state.interview.submit_message(&text).await?;
    Ok(Json(snapshot))
}

/// PUT /api/v1/session/draft
///
/// Syncs the candidate's unsent input; consumed by the countdown auto-submit.
pub async fn handle_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> StatusCode {
    state
        .interview
        .set_draft(request.text.as_deref().unwrap_or_default())
        .await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/session
pub async fn handle_session_snapshot(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.interview.snapshot().await)
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.interview.reset().await)
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates (interviewer dashboard)
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<Vec<CandidateRecord>> {
    Json(state.interview.candidates().await)
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateRecord>, AppError> {
    state
        .interview
        .candidate(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no candidate record {id}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::interview::ai::AiService;
    use crate::interview::flow::InterviewService;
    use crate::interview::test_support::StubAi;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn test_app() -> Router {
        let ai: Arc<dyn AiService> = Arc::new(StubAi::default());
        let interview = InterviewService::new(ai.clone(), None, None);
        build_router(AppState { ai, interview })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/ai/generate-question")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_parse_resume_requires_text() {
        let response = test_app()
            .oneshot(post_json("/api/v1/ai/parse-resume", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_resume_returns_details() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/parse-resume",
                json!({"resume_text": "Jane Doe, jane@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_generate_question_rejects_unknown_difficulty() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/generate-question",
                json!({"difficulty": "brutal"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_question_returns_question() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/generate-question",
                json!({"difficulty": "easy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["question"], "Question 1 (easy)");
    }

    #[tokio::test]
    async fn test_evaluate_answer_requires_both_fields() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/evaluate-answer",
                json!({"question": "What is JSX?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_evaluate_answer_returns_score_and_justification() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/evaluate-answer",
                json!({"question": "What is JSX?", "answer": "A syntax extension."}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["score"], 8);
        assert!(body["justification"].is_string());
    }

    #[tokio::test]
    async fn test_generate_summary_requires_transcript() {
        let response = test_app()
            .oneshot(post_json("/api/v1/ai/generate-summary", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_summary_returns_summary() {
        let response = test_app()
            .oneshot(post_json(
                "/api/v1/ai/generate-summary",
                json!({"transcript": [
                    {"text": "Q1", "answer": "A1", "score": 8, "justification": "good"}
                ]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["summary"], StubAi::SUMMARY_TEXT);
    }

    #[tokio::test]
    async fn test_session_snapshot_starts_idle() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "idle");
        assert_eq!(body["current_question_index"], -1);
    }

    #[tokio::test]
    async fn test_message_without_active_session_is_rejected() {
        let response = test_app()
            .oneshot(post_json("/api/v1/session/message", json!({"text": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/session/resume")
                    .header(
                        header::CONTENT_TYPE,
                        "multipart/form-data; boundary=XBOUNDARY",
                    )
                    .body(Body::from(
                        "--XBOUNDARY\r\ncontent-disposition: form-data; name=\"other\"\r\n\r\nx\r\n--XBOUNDARY--\r\n",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_returns_idle_snapshot() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/session/reset")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "idle");
    }

    #[tokio::test]
    async fn test_draft_sync_returns_no_content() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/session/draft")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"text": "typing..."}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_candidates_start_empty() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/candidates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_404() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/candidates/{}",
                        uuid::Uuid::new_v4()
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
