//! Interview orchestration — sequences the AI operations and the validation
//! helper, driving the session store through its lifecycle.
//!
//! Flow: resume intake → detail validation → correction sub-loop → Q&A loop
//! (evaluate + fetch-next joined concurrently) → finish → summary + archive.
//!
//! `InterviewService` is the single logical writer of the session tree. The
//! countdown and the summary step run as spawned tasks; the countdown carries a
//! timer epoch so a superseded timer dies on its next tick, and whichever of
//! auto-submit and manual submit takes the session lock first wins — the loser
//! observes a stopped timer or a loading status and is a no-op.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::ai::AiService;
use crate::interview::archive::{CandidateArchive, NewCandidateRecord};
use crate::interview::models::{
    CandidateRecord, ChatMessage, Difficulty, InterviewQuestion, SessionStatus, TranscriptEntry,
    QUESTION_SCHEDULE,
};
use crate::interview::session::{Session, SessionState};
use crate::interview::store::{PersistedState, StateStore};
use crate::interview::validation::{check_correction, validate_details, CorrectionField};

/// Answer recorded when the countdown expires with nothing typed.
pub const NO_ANSWER_PLACEHOLDER: &str = "[Time's Up! No answer provided.]";
/// Summary stored when summary generation fails; archiving is never blocked.
pub const SUMMARY_FALLBACK: &str = "Error: Could not generate summary.";

const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Let's try that again.";
const PARSE_FAILURE_MESSAGE: &str =
    "I'm sorry, I encountered an error reading that document. Let's get your details manually.";
const VERIFICATION_MESSAGE: &str =
    "I've successfully verified your details. Before we begin, please review the interview format.";
const RULES_MESSAGE: &str = "Here's how the interview will work:\n\n\
    - **Total Questions**: 6\n\
    - **Structure**: 2 Easy, 2 Medium, 2 Hard\n\
    - **Scoring**: Each question is scored out of 10.\n\
    - **Timing**:\n  - Easy: 20 seconds\n  - Medium: 60 seconds\n  - Hard: 120 seconds\n\n\
    When the timer runs out, your answer will be submitted automatically. \
    Let's begin with the first question.";
const CORRECTION_SAVED_MESSAGE: &str = "Thank you, I've updated that.";
const CORRECTION_RETRY_MESSAGE: &str = "That doesn't seem right. Please try again.";
const DETAILS_CONFIRMED_MESSAGE: &str =
    "Great, all your details are confirmed. Let's begin the interview.";
const ANSWER_RECORDED_MESSAGE: &str =
    "Your answer has been recorded. Preparing the next question...";
const RESULTS_SUBMITTED_MESSAGE: &str = "Your results have been successfully submitted to the \
    hiring team. Thank you for your time! You may now close this window.";
const RESULTS_SUBMITTED_FALLBACK_MESSAGE: &str = "Your results have been successfully submitted. \
    Thank you for your time! You may now close this window.";

// Chat pacing, in milliseconds. The script reads better with short gaps between
// consecutive AI messages.
const WELCOME_PAUSE_MS: u64 = 1200;
const VERIFICATION_PAUSE_MS: u64 = 1500;
const RULES_PAUSE_MS: u64 = 2500;
const CORRECTION_ASK_DELAY_MS: u64 = 800;
const CONFIRMED_PAUSE_MS: u64 = 1200;
const FIRST_QUESTION_DELAY_MS: u64 = 1500;
const NEXT_QUESTION_DELAY_MS: u64 = 1500;
const FINAL_MESSAGE_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitOrigin {
    Manual,
    Timeout,
}

/// What a submission resolved to while the session lock was held.
enum Action {
    None,
    AskNextCorrection,
    CorrectionsDone,
    FetchFirstQuestion,
    Answer {
        question: String,
        answer: String,
        next: Option<Difficulty>,
    },
}

pub struct InterviewService {
    ai: Arc<dyn AiService>,
    session: Mutex<Session>,
    archive: Mutex<CandidateArchive>,
    /// The candidate's unsent input, synced by the client and consumed once by
    /// the countdown's auto-submit.
    draft: Mutex<String>,
    store: Option<StateStore>,
    /// Self-handle for the countdown and summary tasks.
    weak: Weak<InterviewService>,
}

impl InterviewService {
    pub fn new(
        ai: Arc<dyn AiService>,
        store: Option<StateStore>,
        persisted: Option<PersistedState>,
    ) -> Arc<Self> {
        let (session, archive) = match persisted {
            Some(state) => (
                Session::from_state(state.session),
                CandidateArchive::from_records(state.candidates),
            ),
            None => (Session::default(), CandidateArchive::default()),
        };
        Arc::new_cyclic(|weak| InterviewService {
            ai,
            session: Mutex::new(session),
            archive: Mutex::new(archive),
            draft: Mutex::new(String::new()),
            store,
            weak: weak.clone(),
        })
    }

    pub async fn snapshot(&self) -> SessionState {
        self.session.lock().await.snapshot()
    }

    pub async fn candidates(&self) -> Vec<CandidateRecord> {
        self.archive.lock().await.records().to_vec()
    }

    pub async fn candidate(&self, id: Uuid) -> Option<CandidateRecord> {
        self.archive.lock().await.get(id).cloned()
    }

    pub async fn set_draft(&self, text: &str) {
        *self.draft.lock().await = text.to_string();
    }

    /// Starts a session from extracted resume text. `None` means document
    /// extraction already failed; an AI parse failure lands on the same path.
    /// Either way the session goes active and falls back to collecting all
    /// fields over chat — intake never fails the request.
    pub async fn intake_resume(
        &self,
        resume_text: Option<String>,
    ) -> Result<SessionState, AppError> {
        {
            let session = self.session.lock().await;
            if session.state().status != SessionStatus::Idle {
                return Err(AppError::Validation(
                    "an interview session is already in progress; reset it first".to_string(),
                ));
            }
        }

        let parsed = match resume_text {
            Some(text) => match self.ai.parse_resume(&text).await {
                Ok(details) => Some(details),
                Err(e) => {
                    warn!("Resume parsing failed: {e}");
                    None
                }
            },
            None => None,
        };

        match parsed {
            Some(details) => {
                let report = validate_details(&details);
                let display_name = details
                    .name
                    .clone()
                    .unwrap_or_else(|| "there".to_string());
                {
                    let mut session = self.session.lock().await;
                    session.set_candidate_details(details);
                    session.set_status(SessionStatus::Active);
                }
                if report.is_valid {
                    info!("Candidate details verified; starting onboarding");
                    self.run_onboarding(&display_name).await;
                } else {
                    info!(
                        "Candidate details need correction: {:?}",
                        report.fields_to_correct
                    );
                    {
                        let mut session = self.session.lock().await;
                        session.add_message(ChatMessage::ai(format!(
                            "Hello, {display_name}! I've reviewed your resume. A few details need confirmation."
                        )));
                        session.start_correction_flow(report.fields_to_correct);
                    }
                    pause(CORRECTION_ASK_DELAY_MS).await;
                    self.ask_front_correction().await;
                }
            }
            None => {
                {
                    let mut session = self.session.lock().await;
                    session.set_status(SessionStatus::Active);
                    session.add_message(ChatMessage::ai(PARSE_FAILURE_MESSAGE));
                    session.start_correction_flow(vec![
                        CorrectionField::Name,
                        CorrectionField::Email,
                        CorrectionField::Phone,
                    ]);
                }
                pause(CORRECTION_ASK_DELAY_MS).await;
                self.ask_front_correction().await;
            }
        }

        self.persist().await;
        Ok(self.snapshot().await)
    }

    /// A message typed by the candidate: a correction reply while the queue is
    /// non-empty, an answer submission otherwise.
    pub async fn submit_message(
        &self,
        text: &str,
    ) -> Result<SessionState, AppError> {
        self.draft.lock().await.clear();
        self.handle_submission(text, SubmitOrigin::Manual).await
    }

    /// Collapses any state back to idle.
    pub async fn reset(&self) -> SessionState {
        let snapshot = self.session.lock().await.reset();
        self.draft.lock().await.clear();
        info!("Session reset to idle");
        self.persist().await;
        snapshot
    }

    async fn handle_submission(
        &self,
        text: &str,
        origin: SubmitOrigin,
    ) -> Result<SessionState, AppError> {
        let trimmed = text.trim();

        // Everything up to the network calls happens under a single lock
        // acquisition, so a racing auto/manual submission observes either none
        // or all of it.
        let action = {
            let mut session = self.session.lock().await;
            match (session.state().status, origin) {
                (SessionStatus::Active, _) => {}
                // A timeout firing after the session moved on is stale.
                (_, SubmitOrigin::Timeout) => return Ok(session.snapshot()),
                // A submission is already in flight; this one is a no-op.
                (SessionStatus::Loading, SubmitOrigin::Manual) => return Ok(session.snapshot()),
                (_, SubmitOrigin::Manual) => {
                    return Err(AppError::Validation(
                        "no active interview session".to_string(),
                    ))
                }
            }

            if session.state().timer_active {
                session.stop_timer();
            }

            let answer = if trimmed.is_empty() {
                match origin {
                    SubmitOrigin::Timeout => NO_ANSWER_PLACEHOLDER.to_string(),
                    SubmitOrigin::Manual => {
                        return Err(AppError::Validation(
                            "message text cannot be empty".to_string(),
                        ))
                    }
                }
            } else {
                trimmed.to_string()
            };
            session.add_message(ChatMessage::user(answer.clone()));

            if let Some(field) = session.front_correction() {
                match check_correction(field, &answer) {
                    Some(value) => {
                        session.set_candidate_field(field, value);
                        session.add_message(ChatMessage::ai(CORRECTION_SAVED_MESSAGE));
                        session.process_next_correction();
                        if session.front_correction().is_none() {
                            Action::CorrectionsDone
                        } else {
                            Action::AskNextCorrection
                        }
                    }
                    None => {
                        session.add_message(ChatMessage::ai(CORRECTION_RETRY_MESSAGE));
                        Action::None
                    }
                }
            } else {
                let current = session.state().current_question().map(|q| q.text.clone());
                match current {
                    // The first question never arrived (its fetch failed); this
                    // submission is the retry trigger.
                    None => Action::FetchFirstQuestion,
                    Some(question) => {
                        let next_index = session.state().current_question_index as usize + 1;
                        session.set_status(SessionStatus::Loading);
                        Action::Answer {
                            question,
                            answer,
                            next: Session::scheduled_difficulty(next_index),
                        }
                    }
                }
            }
        };

        match action {
            Action::None => {}
            Action::AskNextCorrection => {
                pause(CORRECTION_ASK_DELAY_MS).await;
                self.ask_front_correction().await;
            }
            Action::CorrectionsDone => {
                pause(CONFIRMED_PAUSE_MS).await;
                self.say(DETAILS_CONFIRMED_MESSAGE).await;
                pause(FIRST_QUESTION_DELAY_MS).await;
                self.start_first_question().await;
            }
            Action::FetchFirstQuestion => self.start_first_question().await,
            Action::Answer {
                question,
                answer,
                next,
            } => self.resolve_answer(question, answer, next).await,
        }

        self.persist().await;
        Ok(self.snapshot().await)
    }

    /// The onboarding script for a candidate whose details validated cleanly.
    async fn run_onboarding(&self, name: &str) {
        self.say(format!("Hello, {name}! Welcome to ApexHire.")).await;
        pause(WELCOME_PAUSE_MS).await;
        self.say(VERIFICATION_MESSAGE).await;
        pause(VERIFICATION_PAUSE_MS).await;
        self.say(RULES_MESSAGE).await;
        pause(RULES_PAUSE_MS).await;
        self.start_first_question().await;
    }

    async fn start_first_question(&self) {
        let difficulty = QUESTION_SCHEDULE[0];
        match self.ai.generate_question(difficulty).await {
            Ok(text) => {
                let epoch = {
                    let mut session = self.session.lock().await;
                    session.start_interview(InterviewQuestion::new(text, difficulty));
                    session.start_timer(difficulty.time_limit_secs())
                };
                self.spawn_countdown(epoch);
            }
            Err(e) => {
                warn!("Failed to fetch the first question: {e}");
                self.say(GENERIC_ERROR_MESSAGE).await;
            }
        }
    }

    /// Evaluates the submitted answer and, when more questions remain, fetches
    /// the next question concurrently; both must resolve before the session
    /// advances. The evaluation is always recorded before the next question is
    /// appended.
    async fn resolve_answer(
        &self,
        question: String,
        answer: String,
        next: Option<Difficulty>,
    ) {
        let result = match next {
            Some(difficulty) => {
                let (evaluation, next_question) = tokio::join!(
                    self.ai.evaluate_answer(&question, &answer),
                    self.ai.generate_question(difficulty)
                );
                evaluation.and_then(|e| next_question.map(|q| (e, Some(q))))
            }
            None => self
                .ai
                .evaluate_answer(&question, &answer)
                .await
                .map(|e| (e, None)),
        };

        let (evaluation, next_question) = match result {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Interview loop failed: {e}");
                let mut session = self.session.lock().await;
                session.add_message(ChatMessage::ai(GENERIC_ERROR_MESSAGE));
                session.set_status(SessionStatus::Active);
                return;
            }
        };

        {
            let mut session = self.session.lock().await;
            session.save_answer_and_score(&answer, evaluation.score, &evaluation.justification);
            session.add_message(ChatMessage::ai(ANSWER_RECORDED_MESSAGE));
        }

        match (next, next_question) {
            (Some(difficulty), Some(text)) => {
                pause(NEXT_QUESTION_DELAY_MS).await;
                let epoch = {
                    let mut session = self.session.lock().await;
                    session.set_status(SessionStatus::Active);
                    session.ask_next_question(InterviewQuestion::new(text, difficulty));
                    session.start_timer(difficulty.time_limit_secs())
                };
                self.spawn_countdown(epoch);
            }
            _ => {
                info!("All questions answered; finishing interview");
                self.session.lock().await.end_interview();
                self.spawn_summary_task();
            }
        }
    }

    async fn ask_front_correction(&self) {
        let mut session = self.session.lock().await;
        if let Some(field) = session.front_correction() {
            let prompt = correction_prompt(field);
            // Do not repeat the prompt if it is already the latest message.
            if session.state().messages.last().map(|m| m.text.as_str()) != Some(prompt) {
                session.add_message(ChatMessage::ai(prompt));
            }
        }
    }

    /// One-second countdown for the live question. Exits as soon as its epoch is
    /// superseded; on reaching zero it stops the timer and auto-submits exactly
    /// once.
    fn spawn_countdown(&self, epoch: u64) {
        let Some(service) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(Duration::from_secs(1));
            ticks.tick().await; // the first tick completes immediately
            loop {
                ticks.tick().await;
                let mut session = service.session.lock().await;
                if !session.timer_matches(epoch) {
                    return;
                }
                if session.tick_timer() == Some(0) {
                    session.stop_timer();
                    drop(session);
                    service.handle_timeout().await;
                    return;
                }
            }
        });
    }

    async fn handle_timeout(&self) {
        let draft = std::mem::take(&mut *self.draft.lock().await);
        debug!("Countdown expired; auto-submitting");
        if let Err(e) = self.handle_submission(&draft, SubmitOrigin::Timeout).await {
            warn!("Auto-submission failed: {e}");
        }
    }

    /// Generates the summary and archives the finished interview. Runs detached:
    /// summary failure never blocks archiving, and a session reset in the
    /// meantime does not cancel the record.
    fn spawn_summary_task(&self) {
        let Some(service) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let (details, questions, total_score) = {
                let session = service.session.lock().await;
                let state = session.state();
                (
                    state.candidate_details.clone(),
                    state.questions.clone(),
                    state.total_score.unwrap_or(0),
                )
            };
            let transcript: Vec<TranscriptEntry> =
                questions.iter().map(TranscriptEntry::from).collect();

            let (final_summary, final_message) =
                match service.ai.generate_summary(&transcript).await {
                    Ok(summary) => {
                        service
                            .session
                            .lock()
                            .await
                            .set_final_summary(summary.clone());
                        (summary, RESULTS_SUBMITTED_MESSAGE)
                    }
                    Err(e) => {
                        warn!("Summary generation failed: {e}");
                        (SUMMARY_FALLBACK.to_string(), RESULTS_SUBMITTED_FALLBACK_MESSAGE)
                    }
                };

            let record = service.archive.lock().await.add_record(NewCandidateRecord {
                details,
                questions,
                total_score,
                final_summary,
            });
            info!(
                "Archived candidate record {} (total {})",
                record.id, record.total_score
            );

            pause(FINAL_MESSAGE_DELAY_MS).await;
            service.say(final_message).await;
            service.persist().await;
        });
    }

    async fn say(&self, text: impl Into<String>) {
        self.session.lock().await.add_message(ChatMessage::ai(text));
    }

    async fn persist(&self) {
        let Some(store) = &self.store else { return };
        let state = PersistedState {
            session: self.session.lock().await.snapshot(),
            candidates: self.archive.lock().await.records().to_vec(),
        };
        if let Err(e) = store.save(&state).await {
            warn!("Failed to persist interview state: {e:?}");
        }
    }
}

fn correction_prompt(field: CorrectionField) -> &'static str {
    match field {
        CorrectionField::Name => "Could you please provide your full name?",
        CorrectionField::Email => "Could you please provide your email address?",
        CorrectionField::Phone => "And finally, your 10-digit phone number?",
    }
}

async fn pause(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
