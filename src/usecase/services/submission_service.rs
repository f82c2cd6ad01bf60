use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::domain::entities::record::{RecordId, RowData};
use crate::domain::entities::resource::Resource;
use crate::domain::entities::submission::{Feedback, NewSubmission, SubmissionStatus};
use crate::domain::plantuml::{self, ImageFormat};
use crate::usecase::ports::api::{AdminApi, ApiError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("The diagram has no content")]
    EmptyDiagram,
    #[error("Enter your name before submitting")]
    MissingStudent,
    #[error("Score must be between 0 and {max}")]
    ScoreOutOfRange { max: f64 },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Student submissions and teacher feedback. Callers refetch the submission
/// list after either call; nothing is patched locally.
pub struct SubmissionService {
    api: Arc<dyn AdminApi>,
    plantuml_server: String,
}

impl SubmissionService {
    pub fn new(api: Arc<dyn AdminApi>, plantuml_server: impl Into<String>) -> Self {
        Self {
            api,
            plantuml_server: plantuml_server.into(),
        }
    }

    pub fn preview_url(&self, source: &str) -> String {
        plantuml::image_url(&self.plantuml_server, source, ImageFormat::Svg)
    }

    pub fn submit(
        &self,
        assignment_id: i64,
        module_id: i64,
        student: &str,
        source: &str,
    ) -> Result<RowData, SubmissionError> {
        let student = student.trim();
        if student.is_empty() {
            return Err(SubmissionError::MissingStudent);
        }
        if !plantuml::has_diagram_content(source) {
            return Err(SubmissionError::EmptyDiagram);
        }
        let submission = NewSubmission {
            assignment_id,
            module_id,
            student: student.to_string(),
            uml_source: plantuml::normalize_source(source),
            status: SubmissionStatus::Submitted,
            submitted_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        let row = self
            .api
            .create(Resource::Submissions, serde_json::to_value(&submission)?)?;
        tracing::info!(id = %row.id, assignment_id, module_id, "submission created");
        Ok(row)
    }

    pub fn grade(
        &self,
        id: RecordId,
        score: f64,
        feedback: &str,
        max_score: f64,
    ) -> Result<RowData, SubmissionError> {
        if !score.is_finite() || score < 0.0 || score > max_score {
            return Err(SubmissionError::ScoreOutOfRange { max: max_score });
        }
        let feedback = Feedback {
            score,
            feedback: feedback.trim().to_string(),
            status: SubmissionStatus::Graded,
            graded_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        let row = self
            .api
            .update(Resource::Submissions, id, serde_json::to_value(&feedback)?)?;
        tracing::info!(%id, score, "submission graded");
        Ok(row)
    }
}
