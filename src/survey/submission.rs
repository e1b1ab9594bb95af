use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::{Department, MAX_SCORE, MIN_SCORE, MoodLabel, average_score, question};

const MAX_NAME_CHARS: usize = 120;
const MAX_EMPLOYEE_ID_CHARS: usize = 32;
const MAX_FEEDBACK_CHARS: usize = 2000;

/// Question id to 1..=5 answer. Unanswered questions are simply absent.
pub type ScoreMap = BTreeMap<String, i16>;

/// A persisted check-in as read back from the store.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub scores: ScoreMap,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn average_score(&self) -> Option<f64> {
        average_score(&self.scores)
    }

    /// Label of the record's own mean; an unanswered record reads as 0.
    pub fn mood_label(&self) -> MoodLabel {
        MoodLabel::from_average(self.average_score().unwrap_or(0.0))
    }

    pub fn known_department(&self) -> Option<Department> {
        Department::parse(&self.department)
    }
}

/// Raw request body for a check-in, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub scores: BTreeMap<String, Value>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// A validated check-in ready to be appended to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub department: Department,
    pub scores: ScoreMap,
    pub feedback: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("name is required")]
    MissingName,
    #[error("name must be at most 120 characters")]
    NameTooLong,
    #[error("employee id must be at most 32 characters")]
    EmployeeIdTooLong,
    #[error("unknown department: {0}")]
    UnknownDepartment(String),
    #[error("at least one score is required")]
    MissingScores,
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("score for {0} must be an integer between 1 and 5")]
    InvalidScore(String),
    #[error("feedback must be at most 2000 characters")]
    FeedbackTooLong,
}

impl SubmissionInput {
    pub fn validate(self) -> Result<NewSubmission, SubmissionError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubmissionError::MissingName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(SubmissionError::NameTooLong);
        }

        let employee_id = self
            .employee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        if employee_id.is_some_and(|id| id.chars().count() > MAX_EMPLOYEE_ID_CHARS) {
            return Err(SubmissionError::EmployeeIdTooLong);
        }

        let department = Department::parse(self.department.trim())
            .ok_or_else(|| SubmissionError::UnknownDepartment(self.department.clone()))?;

        if self.scores.is_empty() {
            return Err(SubmissionError::MissingScores);
        }

        let mut scores = ScoreMap::new();
        for (key, value) in self.scores {
            if question(&key).is_none() {
                return Err(SubmissionError::UnknownQuestion(key));
            }
            let score = value
                .as_i64()
                .filter(|v| (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(v))
                .ok_or_else(|| SubmissionError::InvalidScore(key.clone()))?;
            scores.insert(key, score as i16);
        }

        let feedback = self.feedback.unwrap_or_default().trim().to_string();
        if feedback.chars().count() > MAX_FEEDBACK_CHARS {
            return Err(SubmissionError::FeedbackTooLong);
        }

        let name = match employee_id {
            Some(id) => format!("{name} (ID: {id})"),
            None => name.to_string(),
        };

        Ok(NewSubmission {
            name,
            department,
            scores,
            feedback,
        })
    }
}
