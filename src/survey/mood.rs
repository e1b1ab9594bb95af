use serde::{Serialize, Serializer};

use super::ScoreMap;

/// Four-tier qualitative reading of a record's mean score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoodLabel {
    Dissatisfied,
    Neutral,
    Satisfied,
    VerySatisfied,
}

impl MoodLabel {
    pub fn from_average(avg: f64) -> Self {
        if avg >= 4.5 {
            MoodLabel::VerySatisfied
        } else if avg >= 3.5 {
            MoodLabel::Satisfied
        } else if avg >= 2.5 {
            MoodLabel::Neutral
        } else {
            MoodLabel::Dissatisfied
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::VerySatisfied => "Very Satisfied",
            MoodLabel::Satisfied => "Satisfied",
            MoodLabel::Neutral => "Neutral",
            MoodLabel::Dissatisfied => "Dissatisfied",
        }
    }
}

impl Serialize for MoodLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Mean of the answered questions, `None` when nothing was answered.
pub fn average_score(scores: &ScoreMap) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let total: i64 = scores.values().map(|&v| i64::from(v)).sum();
    Some(total as f64 / scores.len() as f64)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
