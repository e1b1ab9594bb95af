use axum::Json;
use serde::Serialize;

use crate::survey::{Department, MAX_SCORE, MIN_SCORE, QUESTIONS};

#[derive(Serialize)]
pub struct QuestionDto {
    id: &'static str,
    text: &'static str,
    category: &'static str,
}

#[derive(Serialize)]
pub struct ScaleDto {
    min: i16,
    max: i16,
}

#[derive(Serialize)]
pub struct SurveyDefinition {
    questions: Vec<QuestionDto>,
    departments: Vec<&'static str>,
    scale: ScaleDto,
}

/// Questions and departments the check-in form offers.
pub async fn survey_definition() -> Json<SurveyDefinition> {
    Json(SurveyDefinition {
        questions: QUESTIONS
            .iter()
            .map(|q| QuestionDto {
                id: q.id,
                text: q.text,
                category: q.category,
            })
            .collect(),
        departments: Department::ALL.iter().map(Department::as_str).collect(),
        scale: ScaleDto {
            min: MIN_SCORE,
            max: MAX_SCORE,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn definition_lists_questions_and_departments_in_order() {
        let Json(definition) = survey_definition().await;
        let value = serde_json::to_value(&definition).unwrap();

        assert_eq!(value["questions"].as_array().unwrap().len(), 5);
        assert_eq!(value["questions"][0]["id"], "q1");
        assert_eq!(value["departments"][0], "Executive");
        assert_eq!(value["departments"][8], "Trimega");
        assert_eq!(value["scale"]["max"], 5);
    }
}
