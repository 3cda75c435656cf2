//! The candidate archive — append-only store of finished interviews.
//!
//! Records are immutable once created; there is no update or delete, and no
//! deduplication: a candidate who interviews twice appears twice.

use chrono::Utc;
use uuid::Uuid;

use crate::interview::models::{CandidateDetails, CandidateRecord, InterviewQuestion};

/// Input for `add_record`; id and timestamp are synthesized on insertion.
#[derive(Debug, Clone)]
pub struct NewCandidateRecord {
    pub details: CandidateDetails,
    pub questions: Vec<InterviewQuestion>,
    pub total_score: u32,
    pub final_summary: String,
}

#[derive(Debug, Default)]
pub struct CandidateArchive {
    records: Vec<CandidateRecord>,
}

impl CandidateArchive {
    pub fn from_records(records: Vec<CandidateRecord>) -> Self {
        CandidateArchive { records }
    }

    /// Appends a finished interview, synthesizing a unique id and the completion
    /// timestamp. Returns the stored record.
    pub fn add_record(&mut self, new: NewCandidateRecord) -> CandidateRecord {
        let record = CandidateRecord {
            id: Uuid::new_v4(),
            details: new.details,
            questions: new.questions,
            total_score: new.total_score,
            final_summary: new.final_summary,
            completed_at: Utc::now(),
        };
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&CandidateRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}
