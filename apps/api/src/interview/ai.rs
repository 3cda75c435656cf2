//! The four AI operations behind the interview flow.
//!
//! `AiService` is the seam between orchestration and the model provider: the flow
//! and the HTTP handlers only ever see the trait, carried in `AppState` as an
//! `Arc<dyn AiService>`, so tests swap in a stub without touching either.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::interview::models::{CandidateDetails, Difficulty, TranscriptEntry};
use crate::interview::prompts::{
    build_evaluation_prompt, build_question_prompt, build_resume_parse_prompt,
    build_summary_prompt, EVALUATION_SYSTEM, QUESTION_SYSTEM, RESUME_PARSE_SYSTEM, SUMMARY_SYSTEM,
};
use crate::llm_client::LlmClient;

/// Result of evaluating one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub justification: String,
}

#[async_trait]
pub trait AiService: Send + Sync {
    /// Extracts name/email/phone from raw resume text. Missing fields come back
    /// as `None`.
    async fn parse_resume(&self, resume_text: &str) -> Result<CandidateDetails, AppError>;

    /// Generates one interview question of the given difficulty.
    async fn generate_question(&self, difficulty: Difficulty) -> Result<String, AppError>;

    /// Scores an answer 1-10 with a one-sentence justification.
    async fn evaluate_answer(&self, question: &str, answer: &str)
        -> Result<Evaluation, AppError>;

    /// Produces the final 3-4 sentence performance summary.
    async fn generate_summary(&self, transcript: &[TranscriptEntry]) -> Result<String, AppError>;
}

/// Production implementation — builds prompts and calls Gemini through the shared
/// `LlmClient`.
pub struct GeminiAiService {
    llm: LlmClient,
}

impl GeminiAiService {
    pub fn new(llm: LlmClient) -> Self {
        GeminiAiService { llm }
    }
}

#[async_trait]
impl AiService for GeminiAiService {
    async fn parse_resume(&self, resume_text: &str) -> Result<CandidateDetails, AppError> {
        let prompt = build_resume_parse_prompt(resume_text);
        let details: CandidateDetails = self.llm.call_json(&prompt, RESUME_PARSE_SYSTEM).await?;
        debug!(
            "Resume parsed: name={:?}, email={:?}, phone={:?}",
            details.name, details.email, details.phone
        );
        Ok(details)
    }

    async fn generate_question(&self, difficulty: Difficulty) -> Result<String, AppError> {
        let prompt = build_question_prompt(difficulty);
        let question = self.llm.call_text(&prompt, QUESTION_SYSTEM).await?;
        debug!("Generated {} question", difficulty.as_str());
        Ok(question)
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
    ) -> Result<Evaluation, AppError> {
        let prompt = build_evaluation_prompt(question, answer);
        let evaluation: Evaluation = self.llm.call_json(&prompt, EVALUATION_SYSTEM).await?;
        Ok(evaluation)
    }

    async fn generate_summary(&self, transcript: &[TranscriptEntry]) -> Result<String, AppError> {
        let prompt = build_summary_prompt(transcript);
        let summary = self.llm.call_text(&prompt, SUMMARY_SYSTEM).await?;
        Ok(summary)
    }
}
