//! Shared test double for the AI seam.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::interview::ai::{AiService, Evaluation};
use crate::interview::models::{CandidateDetails, Difficulty, TranscriptEntry};
use crate::llm_client::LlmError;

/// Deterministic in-memory `AiService`: numbered questions, a fixed score
/// sequence, togglable failures, call counters.
pub struct StubAi {
    details: CandidateDetails,
    scores: Vec<u8>,
    fail_parse: AtomicBool,
    fail_question: AtomicBool,
    fail_evaluation: AtomicBool,
    fail_summary: AtomicBool,
    question_calls: AtomicUsize,
    evaluation_calls: AtomicUsize,
}

impl StubAi {
    pub const SUMMARY_TEXT: &'static str =
        "A capable candidate with solid React fundamentals and room to grow on Node.js.";

    pub fn with_details(details: CandidateDetails) -> Self {
        StubAi {
            details,
            scores: vec![8, 6, 7, 5, 9, 4],
            fail_parse: AtomicBool::new(false),
            fail_question: AtomicBool::new(false),
            fail_evaluation: AtomicBool::new(false),
            fail_summary: AtomicBool::new(false),
            question_calls: AtomicUsize::new(0),
            evaluation_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_parse(&self, fail: bool) {
        self.fail_parse.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_question(&self, fail: bool) {
        self.fail_question.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_evaluation(&self, fail: bool) {
        self.fail_evaluation.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_summary(&self, fail: bool) {
        self.fail_summary.store(fail, Ordering::SeqCst);
    }

    pub fn question_calls(&self) -> usize {
        self.question_calls.load(Ordering::SeqCst)
    }

    pub fn evaluation_calls(&self) -> usize {
        self.evaluation_calls.load(Ordering::SeqCst)
    }

    fn upstream_error() -> AppError {
        AppError::Llm(LlmError::Api {
            status: 500,
            message: "stubbed upstream failure".to_string(),
        })
    }
}

impl Default for StubAi {
    fn default() -> Self {
        StubAi::with_details(CandidateDetails {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("5551234567".to_string()),
        })
    }
}

#[async_trait]
impl AiService for StubAi {
    async fn parse_resume(&self, _resume_text: &str) -> Result<CandidateDetails, AppError> {
        if self.fail_parse.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        Ok(self.details.clone())
    }

    async fn generate_question(&self, difficulty: Difficulty) -> Result<String, AppError> {
        if self.fail_question.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        let n = self.question_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("Question {n} ({})", difficulty.as_str()))
    }

    async fn evaluate_answer(
        &self,
        _question: &str,
        _answer: &str,
    ) -> Result<Evaluation, AppError> {
        if self.fail_evaluation.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        let n = self.evaluation_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Evaluation {
            score: self.scores[n % self.scores.len()],
            justification: "Stubbed justification.".to_string(),
        })
    }

    async fn generate_summary(&self, _transcript: &[TranscriptEntry]) -> Result<String, AppError> {
        if self.fail_summary.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        Ok(Self::SUMMARY_TEXT.to_string())
    }
}
