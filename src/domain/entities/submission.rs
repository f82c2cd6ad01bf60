use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

impl SubmissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "Waiting for feedback",
            SubmissionStatus::Graded => "Graded",
        }
    }
}

/// Payload the student side sends for one assignment module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub module_id: i64,
    pub student: String,
    pub uml_source: String,
    pub status: SubmissionStatus,
    pub submitted_at: String,
}

/// Teacher feedback; applied as a partial update of the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub score: f64,
    pub feedback: String,
    pub status: SubmissionStatus,
    pub graded_at: String,
}
