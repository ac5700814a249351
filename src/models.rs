use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub run_id: String,
    pub company: String,
    pub search_hits: Vec<SearchHit>,
    pub synthesis: Option<SynthesisOutcome>,
    pub use_cases: Vec<UseCaseRecord>,
    pub additional_resources: Vec<SearchHit>,
    pub dataset_links: Vec<DatasetEntry>,
    pub proposals: String,
    pub stage_times: HashMap<String, u64>,
    pub total_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

/// Mutable per-run context filled in by the pipeline stages, one after
/// another. Nothing outside the running pipeline ever mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub company: String,
    pub search_hits: Vec<SearchHit>,
    pub synthesis: Option<SynthesisOutcome>,
    pub use_cases: Vec<UseCaseRecord>,
    pub additional_resources: Vec<SearchHit>,
    pub dataset_links: Vec<DatasetEntry>,
    pub proposals: String,
}

impl AnalysisContext {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            search_hits: vec![],
            synthesis: None,
            use_cases: vec![],
            additional_resources: vec![],
            dataset_links: vec![],
            proposals: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// The four advisory fields the model is asked to emit per use case. The
/// field names mirror the JSON keys exactly; an object with any other shape
/// is kept as a raw value instead (see [`UseCaseRecord`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UseCase {
    #[serde(rename = "UseCase")]
    pub use_case: String,
    #[serde(rename = "Objective")]
    pub objective: String,
    #[serde(rename = "AI application")]
    pub ai_application: String,
    #[serde(rename = "Cross-Functional Benefits")]
    pub cross_functional_benefits: String,
}

/// One element of the model's use-case array. The model is asked to conform
/// to [`UseCase`] but is not guaranteed to; non-conforming elements are
/// carried through untouched so the snapshot file round-trips exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UseCaseRecord {
    Structured(UseCase),
    Other(Value),
}

impl UseCaseRecord {
    pub fn title(&self) -> Option<&str> {
        match self {
            UseCaseRecord::Structured(uc) => Some(uc.use_case.as_str()),
            UseCaseRecord::Other(value) => value.get("UseCase").and_then(Value::as_str),
        }
    }

    pub fn objective(&self) -> Option<&str> {
        match self {
            UseCaseRecord::Structured(uc) => Some(uc.objective.as_str()),
            UseCaseRecord::Other(value) => value.get("Objective").and_then(Value::as_str),
        }
    }

    pub fn is_object(&self) -> bool {
        match self {
            UseCaseRecord::Structured(_) => true,
            UseCaseRecord::Other(value) => value.is_object(),
        }
    }
}

/// Outcome of one synthesis pass. `Empty` is a soft failure: the model
/// replied, but not with a usable JSON array, and the run continues on an
/// empty use-case list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SynthesisOutcome {
    Synthesized { count: usize },
    Empty { reason: EmptyReason, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NotAnArray,
    InvalidJson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub use_case: UseCaseRecord,
    pub datasets: Vec<DatasetLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilySearchRequest {
    pub query: String,
    pub max_results: i32,
    pub search_depth: String,
    pub include_raw_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilySearchResponse {
    pub results: Vec<TavilyResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conforming_object_parses_as_structured() {
        let value = json!({
            "UseCase": "Defect Detection",
            "Objective": "Reduce waste",
            "AI application": "Computer Vision",
            "Cross-Functional Benefits": "Quality+Cost"
        });
        let record: UseCaseRecord = serde_json::from_value(value).unwrap();
        assert!(matches!(record, UseCaseRecord::Structured(_)));
        assert_eq!(record.title(), Some("Defect Detection"));
        assert_eq!(record.objective(), Some("Reduce waste"));
    }

    #[test]
    fn extra_field_keeps_record_raw() {
        let value = json!({
            "UseCase": "Forecasting",
            "Objective": "Plan inventory",
            "AI application": "Time series",
            "Cross-Functional Benefits": "Ops",
            "Priority": "high"
        });
        let record: UseCaseRecord = serde_json::from_value(value.clone()).unwrap();
        assert!(matches!(record, UseCaseRecord::Other(_)));
        // the raw value still answers title() through the UseCase key
        assert_eq!(record.title(), Some("Forecasting"));
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn non_object_record_has_no_title() {
        let record: UseCaseRecord = serde_json::from_value(json!("just a string")).unwrap();
        assert!(!record.is_object());
        assert_eq!(record.title(), None);
    }
}
