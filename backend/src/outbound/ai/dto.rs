//! Wire DTOs for the AI adventure sub-protocol.
//!
//! The protocol uses snake_case JSON. These types own the wire shape only;
//! conversion into domain payloads validates the protocol invariants
//! (at least two choices, scores within `[0, 1]`).

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::adventure::AdventureScores;
use crate::domain::ports::{
    ChoiceEvaluation, EvaluationRequest, GeneratedScenario, ScenarioRequest,
};

pub(super) const MIN_CHOICES: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub(super) struct GenerateAdventureRequestDto {
    pub user_age: i32,
    pub allowance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_activities: Option<Vec<String>>,
}

impl From<ScenarioRequest> for GenerateAdventureRequestDto {
    fn from(request: ScenarioRequest) -> Self {
        Self {
            user_age: request.user_age,
            allowance: request.allowance.to_f64().unwrap_or(0.0),
            goal_context: request.goal_context,
            recent_activities: (!request.recent_activities.is_empty())
                .then_some(request.recent_activities),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct GenerateAdventureResponseDto {
    pub scenario: String,
    pub choices: Vec<String>,
    pub opik_trace_id: String,
}

impl GenerateAdventureResponseDto {
    pub fn into_domain(self) -> Result<GeneratedScenario, String> {
        if self.choices.len() < MIN_CHOICES {
            return Err(format!(
                "expected at least {MIN_CHOICES} choices, got {}",
                self.choices.len()
            ));
        }
        if self.scenario.trim().is_empty() {
            return Err("scenario must not be empty".to_owned());
        }
        Ok(GeneratedScenario {
            scenario: self.scenario,
            choices: self.choices,
            trace_id: self.opik_trace_id,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct EvaluateChoiceRequestDto {
    pub scenario: String,
    pub choice_index: i32,
    pub choice_text: String,
    pub user_age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amounts: Option<BTreeMap<String, f64>>,
}

impl From<EvaluationRequest> for EvaluateChoiceRequestDto {
    fn from(request: EvaluationRequest) -> Self {
        Self {
            scenario: request.scenario,
            choice_index: request.choice_index,
            choice_text: request.choice_text,
            user_age: request.user_age,
            amounts: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct EvaluateChoiceResponseDto {
    pub feedback: String,
    pub scores: BTreeMap<String, f64>,
    pub opik_trace_id: String,
}

impl EvaluateChoiceResponseDto {
    pub fn into_domain(self) -> Result<ChoiceEvaluation, String> {
        let scores = AdventureScores::try_new(self.scores).map_err(|err| err.to_string())?;
        Ok(ChoiceEvaluation {
            feedback: self.feedback,
            scores,
            trace_id: self.opik_trace_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    fn generate_request_serialises_snake_case_and_drops_empty_fields() {
        let dto = GenerateAdventureRequestDto::from(ScenarioRequest {
            user_age: 10,
            allowance: dec!(70000),
            goal_context: None,
            recent_activities: Vec::new(),
        });
        let value = serde_json::to_value(dto).expect("serialises");
        assert_eq!(value, json!({"user_age": 10, "allowance": 70000.0}));
    }

    #[rstest]
    fn generate_response_decodes_into_domain() {
        let dto: GenerateAdventureResponseDto = serde_json::from_value(json!({
            "scenario": "Kamu menemukan Rp 10.000",
            "choices": ["Menabung", "Jajan"],
            "opik_trace_id": "t1"
        }))
        .expect("decodes");
        let generated = dto.into_domain().expect("valid");
        assert_eq!(generated.trace_id, "t1");
        assert_eq!(generated.choices.len(), 2);
    }

    #[rstest]
    fn single_choice_responses_are_rejected() {
        let dto = GenerateAdventureResponseDto {
            scenario: "s".to_owned(),
            choices: vec!["only".to_owned()],
            opik_trace_id: "t1".to_owned(),
        };
        let err = dto.into_domain().expect_err("too few choices");
        assert!(err.contains("at least 2"));
    }

    #[rstest]
    fn evaluate_request_omits_absent_amounts() {
        let dto = EvaluateChoiceRequestDto::from(EvaluationRequest {
            scenario: "s".to_owned(),
            choice_index: 0,
            choice_text: "Menabung".to_owned(),
            user_age: 10,
        });
        let value = serde_json::to_value(dto).expect("serialises");
        assert!(value.get("amounts").is_none());
        assert_eq!(value.get("choice_index"), Some(&json!(0)));
    }

    #[rstest]
    fn evaluate_response_keeps_the_free_form_score_map() {
        let dto: EvaluateChoiceResponseDto = serde_json::from_value(json!({
            "feedback": "Pilihan bagus",
            "scores": {
                "age_appropriateness": 0.9,
                "goal_alignment": 0.95,
                "financial_reasoning": 0.85,
                "responsibility": 0.7
            },
            "opik_trace_id": "t2"
        }))
        .expect("decodes");
        let evaluation = dto.into_domain().expect("valid");
        assert_eq!(evaluation.scores.iter().count(), 4);
        assert_eq!(evaluation.scores.get("responsibility"), Some(0.7));
    }

    #[rstest]
    fn out_of_range_scores_are_rejected() {
        let dto = EvaluateChoiceResponseDto {
            feedback: "f".to_owned(),
            scores: BTreeMap::from([("goal_alignment".to_owned(), 1.2)]),
            opik_trace_id: "t2".to_owned(),
        };
        dto.into_domain().expect_err("out of range");
    }
}
