mod departments;
mod mood;
mod submission;

pub use departments::Department;
pub use mood::{MoodLabel, average_score, round_one_decimal};
pub use submission::{NewSubmission, ScoreMap, SubmissionInput, SubmissionRecord};

/// One survey question as presented by the check-in form.
pub struct QuestionDescriptor {
    pub id: &'static str,
    pub text: &'static str,
    pub category: &'static str,
}

pub const QUESTIONS: &[QuestionDescriptor] = &[
    QuestionDescriptor {
        id: "q1",
        text: "How are you today?",
        category: "Mood & Well-Being",
    },
    QuestionDescriptor {
        id: "q2",
        text: "How appreciated do you feel?",
        category: "Collaboration",
    },
    QuestionDescriptor {
        id: "q3",
        text: "How manageable is your workload today?",
        category: "Productivity",
    },
    QuestionDescriptor {
        id: "q4",
        text: "How comfortable is your workspace today?",
        category: "Work Environment",
    },
    QuestionDescriptor {
        id: "q5",
        text: "How motivated do you feel today?",
        category: "Motivation & Purpose",
    },
];

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;

pub fn question(id: &str) -> Option<&'static QuestionDescriptor> {
    QUESTIONS.iter().find(|q| q.id == id)
}
