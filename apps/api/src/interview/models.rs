//! Core data model for one interview session and the archived outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question difficulty. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Countdown length for a question of this difficulty, in seconds.
    pub fn time_limit_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Difficulty> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// The fixed question plan for every interview: 2 easy, 2 medium, 2 hard, in order.
pub const QUESTION_SCHEDULE: [Difficulty; 6] = [
    Difficulty::Easy,
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Hard,
];

/// Total number of questions per interview.
pub const TOTAL_QUESTIONS: usize = QUESTION_SCHEDULE.len();

/// Maximum score per question; the interview total is out of `10 * TOTAL_QUESTIONS`.
pub const MAX_QUESTION_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Ai,
    User,
}

/// One entry in the chat transcript. Append-only; insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn ai(text: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::Ai,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }
}

/// Candidate contact details, filled in incrementally as fields are extracted from
/// the resume or corrected over chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// One interview question. Created when fetched; `answer`/`score`/`justification`
/// are written exactly once when the answer is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub text: String,
    pub difficulty: Difficulty,
    pub answer: Option<String>,
    pub score: Option<u8>,
    pub justification: Option<String>,
}

impl InterviewQuestion {
    pub fn new(text: impl Into<String>, difficulty: Difficulty) -> Self {
        InterviewQuestion {
            text: text.into(),
            difficulty,
            answer: None,
            score: None,
            justification: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Loading,
    Active,
    Finished,
}

/// An archived interview outcome. Created exactly once per finished session and
/// immutable thereafter; owned solely by the archive store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Uuid,
    pub details: CandidateDetails,
    pub questions: Vec<InterviewQuestion>,
    pub total_score: u32,
    pub final_summary: String,
    pub completed_at: DateTime<Utc>,
}

/// One question as sent to the summary endpoint. Difficulty is deliberately absent:
/// the summary contract only carries text, answer and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub answer: Option<String>,
    pub score: Option<u8>,
    pub justification: Option<String>,
}

impl From<&InterviewQuestion> for TranscriptEntry {
    fn from(q: &InterviewQuestion) -> Self {
        TranscriptEntry {
            text: q.text.clone(),
            answer: q.answer.clone(),
            score: q.score,
            justification: q.justification.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_is_two_of_each() {
        assert_eq!(
            QUESTION_SCHEDULE,
            [
                Difficulty::Easy,
                Difficulty::Easy,
                Difficulty::Medium,
                Difficulty::Medium,
                Difficulty::Hard,
                Difficulty::Hard,
            ]
        );
        assert_eq!(TOTAL_QUESTIONS, 6);
    }

    #[test]
    fn test_time_limits() {
        assert_eq!(Difficulty::Easy.time_limit_secs(), 20);
        assert_eq!(Difficulty::Medium.time_limit_secs(), 60);
        assert_eq!(Difficulty::Hard.time_limit_secs(), 120);
    }

    #[test]
    fn test_difficulty_parse_round_trip() {
        for d in QUESTION_SCHEDULE {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("brutal"), None);
    }

    #[test]
    fn test_difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"medium\""
        );
    }
}
