//! The interview session state machine.
//!
//! `SessionState` is the full observable state tree; `Session` wraps it behind named
//! transition operations, each returning the new snapshot. There is a single logical
//! writer (the orchestration flow), so no internal locking lives here.
//!
//! Lifecycle: `idle → active → loading → active (repeat) → finished → idle` (reset).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::interview::models::{
    CandidateDetails, ChatMessage, Difficulty, InterviewQuestion, SessionStatus,
    MAX_QUESTION_SCORE, TOTAL_QUESTIONS,
};
use crate::interview::validation::CorrectionField;

/// Aggregate state of the single active session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub candidate_details: CandidateDetails,
    pub messages: Vec<ChatMessage>,
    pub correction_queue: VecDeque<CorrectionField>,
    pub questions: Vec<InterviewQuestion>,
    /// Valid index into `questions` while a question is live; -1 before the first.
    pub current_question_index: i32,
    pub timer_active: bool,
    pub remaining_time: Option<u32>,
    pub final_summary: Option<String>,
    pub total_score: Option<u32>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            status: SessionStatus::Idle,
            candidate_details: CandidateDetails::default(),
            messages: Vec::new(),
            correction_queue: VecDeque::new(),
            questions: Vec::new(),
            current_question_index: -1,
            timer_active: false,
            remaining_time: None,
            final_summary: None,
            total_score: None,
        }
    }
}

impl SessionState {
    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        usize::try_from(self.current_question_index)
            .ok()
            .and_then(|i| self.questions.get(i))
    }
}

/// The session store. Every mutation goes through one of the named transitions
/// below and returns the resulting snapshot.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    /// Bumped on every timer start/stop/reset; a countdown task holding a stale
    /// epoch exits on its next tick instead of touching the session.
    timer_epoch: u64,
}

impl Session {
    /// Restores a persisted session. A rehydrated session never resumes a live
    /// countdown, and a `loading` status collapses to `active` (the call it was
    /// waiting on died with the previous process).
    pub fn from_state(mut state: SessionState) -> Self {
        state.timer_active = false;
        state.remaining_time = None;
        if state.status == SessionStatus::Loading {
            state.status = SessionStatus::Active;
        }
        Session {
            state,
            timer_epoch: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// The field at the front of the correction queue, if any.
    pub fn front_correction(&self) -> Option<CorrectionField> {
        self.state.correction_queue.front().copied()
    }

    pub fn timer_matches(&self, epoch: u64) -> bool {
        self.state.timer_active && self.timer_epoch == epoch
    }

    // ── transitions ─────────────────────────────────────────────────────────

    pub fn set_status(&mut self, status: SessionStatus) -> SessionState {
        self.state.status = status;
        self.snapshot()
    }

    pub fn set_candidate_details(&mut self, details: CandidateDetails) -> SessionState {
        self.state.candidate_details = details;
        self.snapshot()
    }

    pub fn set_candidate_field(&mut self, field: CorrectionField, value: String) -> SessionState {
        match field {
            CorrectionField::Name => self.state.candidate_details.name = Some(value),
            CorrectionField::Email => self.state.candidate_details.email = Some(value),
            CorrectionField::Phone => self.state.candidate_details.phone = Some(value),
        }
        self.snapshot()
    }

    pub fn add_message(&mut self, message: ChatMessage) -> SessionState {
        self.state.messages.push(message);
        self.snapshot()
    }

    pub fn start_correction_flow(&mut self, fields: Vec<CorrectionField>) -> SessionState {
        self.state.correction_queue = fields.into();
        self.snapshot()
    }

    pub fn process_next_correction(&mut self) -> SessionState {
        self.state.correction_queue.pop_front();
        self.snapshot()
    }

    /// Records the first question, points the index at it and echoes it into chat.
    pub fn start_interview(&mut self, question: InterviewQuestion) -> SessionState {
        let text = question.text.clone();
        self.state.questions.push(question);
        self.state.current_question_index = 0;
        self.state.messages.push(ChatMessage::ai(text));
        self.snapshot()
    }

    /// Writes the evaluation of the current question. A no-op before the first
    /// question is asked.
    pub fn save_answer_and_score(
        &mut self,
        answer: &str,
        score: u8,
        justification: &str,
    ) -> SessionState {
        if let Ok(i) = usize::try_from(self.state.current_question_index) {
            if let Some(q) = self.state.questions.get_mut(i) {
                q.answer = Some(answer.to_string());
                q.score = Some(score.min(MAX_QUESTION_SCORE));
                q.justification = Some(justification.to_string());
            }
        }
        self.snapshot()
    }

    pub fn ask_next_question(&mut self, question: InterviewQuestion) -> SessionState {
        let text = question.text.clone();
        self.state.questions.push(question);
        self.state.current_question_index += 1;
        self.state.messages.push(ChatMessage::ai(text));
        self.snapshot()
    }

    /// Marks the session finished, computes the total (unscored questions count 0)
    /// and appends the completion message.
    pub fn end_interview(&mut self) -> SessionState {
        self.state.status = SessionStatus::Finished;
        self.state.timer_active = false;
        let total: u32 = self
            .state
            .questions
            .iter()
            .map(|q| u32::from(q.score.unwrap_or(0)))
            .sum();
        self.state.total_score = Some(total);
        let max = MAX_QUESTION_SCORE as usize * TOTAL_QUESTIONS;
        self.state.messages.push(ChatMessage::ai(format!(
            "The interview is now complete. Thank you for your time!\n\nYour final score is: {total} / {max}."
        )));
        self.snapshot()
    }

    /// Arms the countdown and returns the epoch the new countdown task must carry.
    pub fn start_timer(&mut self, seconds: u32) -> u64 {
        self.state.timer_active = true;
        self.state.remaining_time = Some(seconds);
        self.timer_epoch += 1;
        self.timer_epoch
    }

    /// Decrements the countdown by one second. Returns the new remaining time, or
    /// `None` when no timer is live.
    pub fn tick_timer(&mut self) -> Option<u32> {
        if !self.state.timer_active {
            return None;
        }
        match self.state.remaining_time {
            Some(t) if t > 0 => {
                self.state.remaining_time = Some(t - 1);
                Some(t - 1)
            }
            other => other,
        }
    }

    pub fn stop_timer(&mut self) -> SessionState {
        self.state.timer_active = false;
        self.state.remaining_time = None;
        self.timer_epoch += 1;
        self.snapshot()
    }

    pub fn set_final_summary(&mut self, summary: String) -> SessionState {
        self.state.final_summary = Some(summary);
        self.snapshot()
    }

    /// Collapses any state back to the documented initial values.
    pub fn reset(&mut self) -> SessionState {
        self.state = SessionState::default();
        self.timer_epoch += 1;
        self.snapshot()
    }

    /// Difficulty of question `index` under the fixed schedule, `None` past the end.
    pub fn scheduled_difficulty(index: usize) -> Option<Difficulty> {
        crate::interview::models::QUESTION_SCHEDULE.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::Sender;

    fn question(text: &str, difficulty: Difficulty) -> InterviewQuestion {
        InterviewQuestion::new(text, difficulty)
    }

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        let s = session.state();
        assert_eq!(s.status, SessionStatus::Idle);
        assert!(s.messages.is_empty());
        assert!(s.correction_queue.is_empty());
        assert!(s.questions.is_empty());
        assert_eq!(s.current_question_index, -1);
        assert!(!s.timer_active);
        assert_eq!(s.remaining_time, None);
        assert_eq!(s.final_summary, None);
        assert_eq!(s.total_score, None);
    }

    #[test]
    fn test_start_interview_sets_index_and_echoes_question() {
        let mut session = Session::default();
        session.set_status(SessionStatus::Active);
        let snap = session.start_interview(question("Q1", Difficulty::Easy));
        assert_eq!(snap.current_question_index, 0);
        assert_eq!(snap.questions.len(), 1);
        assert_eq!(snap.messages.last().unwrap().sender, Sender::Ai);
        assert_eq!(snap.messages.last().unwrap().text, "Q1");
    }

    #[test]
    fn test_index_tracks_questions_through_the_schedule() {
        let mut session = Session::default();
        session.set_status(SessionStatus::Active);
        session.start_interview(question("Q1", Difficulty::Easy));
        for (i, d) in crate::interview::models::QUESTION_SCHEDULE.iter().enumerate().skip(1) {
            let snap = session.ask_next_question(question(&format!("Q{}", i + 1), *d));
            assert_eq!(snap.current_question_index, i as i32);
            assert_eq!(snap.questions[i].difficulty, *d);
        }
    }

    #[test]
    fn test_save_answer_before_first_question_is_noop() {
        let mut session = Session::default();
        let snap = session.save_answer_and_score("hello", 5, "n/a");
        assert!(snap.questions.is_empty());
    }

    #[test]
    fn test_save_answer_clamps_score() {
        let mut session = Session::default();
        session.start_interview(question("Q1", Difficulty::Easy));
        let snap = session.save_answer_and_score("a", 14, "overshoot");
        assert_eq!(snap.questions[0].score, Some(10));
    }

    #[test]
    fn test_end_interview_sums_scores() {
        let mut session = Session::default();
        session.start_interview(question("Q1", Difficulty::Easy));
        session.save_answer_and_score("a1", 8, "j");
        for (i, (d, score)) in [
            (Difficulty::Easy, 6),
            (Difficulty::Medium, 7),
            (Difficulty::Medium, 5),
            (Difficulty::Hard, 9),
            (Difficulty::Hard, 4),
        ]
        .iter()
        .enumerate()
        {
            session.ask_next_question(question(&format!("Q{}", i + 2), *d));
            session.save_answer_and_score("a", *score, "j");
        }
        let snap = session.end_interview();
        assert_eq!(snap.status, SessionStatus::Finished);
        assert_eq!(snap.total_score, Some(39));
        assert!(snap.messages.last().unwrap().text.contains("39 / 60"));
    }

    #[test]
    fn test_end_interview_counts_unscored_as_zero() {
        let mut session = Session::default();
        session.start_interview(question("Q1", Difficulty::Easy));
        session.save_answer_and_score("a1", 7, "j");
        session.ask_next_question(question("Q2", Difficulty::Easy));
        // Q2 never evaluated.
        let snap = session.end_interview();
        assert_eq!(snap.total_score, Some(7));
    }

    #[test]
    fn test_timer_start_tick_stop() {
        let mut session = Session::default();
        let epoch = session.start_timer(20);
        assert!(session.timer_matches(epoch));
        assert_eq!(session.state().remaining_time, Some(20));
        assert_eq!(session.tick_timer(), Some(19));
        let snap = session.stop_timer();
        assert!(!snap.timer_active);
        assert_eq!(snap.remaining_time, None);
        assert!(!session.timer_matches(epoch));
    }

    #[test]
    fn test_tick_does_not_go_below_zero() {
        let mut session = Session::default();
        session.start_timer(1);
        assert_eq!(session.tick_timer(), Some(0));
        assert_eq!(session.tick_timer(), Some(0));
    }

    #[test]
    fn test_restarting_timer_invalidates_old_epoch() {
        let mut session = Session::default();
        let first = session.start_timer(20);
        let second = session.start_timer(60);
        assert!(!session.timer_matches(first));
        assert!(session.timer_matches(second));
        assert_eq!(session.state().remaining_time, Some(60));
    }

    #[test]
    fn test_correction_queue_is_fifo() {
        let mut session = Session::default();
        session.start_correction_flow(vec![CorrectionField::Name, CorrectionField::Phone]);
        assert_eq!(session.front_correction(), Some(CorrectionField::Name));
        session.process_next_correction();
        assert_eq!(session.front_correction(), Some(CorrectionField::Phone));
        session.process_next_correction();
        assert_eq!(session.front_correction(), None);
    }

    #[test]
    fn test_reset_restores_every_field() {
        let mut session = Session::default();
        session.set_status(SessionStatus::Active);
        session.set_candidate_field(CorrectionField::Name, "Jane".into());
        session.add_message(ChatMessage::user("hi"));
        session.start_correction_flow(vec![CorrectionField::Email]);
        session.start_interview(question("Q1", Difficulty::Easy));
        session.start_timer(20);
        session.set_final_summary("done".into());
        let snap = session.reset();
        assert_eq!(snap, SessionState::default());
    }

    #[test]
    fn test_rehydration_forces_timer_inert_and_active_status() {
        let mut session = Session::default();
        session.set_status(SessionStatus::Loading);
        session.start_interview(question("Q1", Difficulty::Easy));
        session.start_timer(20);
        let restored = Session::from_state(session.snapshot());
        assert_eq!(restored.state().status, SessionStatus::Active);
        assert!(!restored.state().timer_active);
        assert_eq!(restored.state().remaining_time, None);
        assert_eq!(restored.state().questions.len(), 1);
    }
}
