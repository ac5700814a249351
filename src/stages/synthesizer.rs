use super::Stage;
use crate::models::{
    AnalysisContext, EmptyReason, SearchHit, SynthesisOutcome, UseCase, UseCaseRecord,
};
use crate::tools::llm::get_llm;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::completion::Prompt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Asks the model for a JSON array of use cases built from the collected
/// search content. The search snapshot is re-read from disk rather than taken
/// from the context, so the stage sees exactly what the collector persisted.
pub struct UseCaseSynthesizer {
    snapshot_path: PathBuf,
    output_path: PathBuf,
}

impl UseCaseSynthesizer {
    pub fn new(snapshot_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            snapshot_path,
            output_path,
        }
    }

    fn synthesis_preamble(company: &str) -> String {
        format!(
            "Analyze the following content and generate at least 20 relevant use cases \
             in the format of a JSON array of objects, where each object contains the keys \
             'UseCase', 'Objective', 'AI application', and 'Cross-Functional Benefits'. \
             Make sure to provide a clear structure and avoid any markdown or code block formatting. \
             Focus on how {company} can leverage GenAI, LLMs, and ML technologies to improve their \
             processes, enhance customer satisfaction, and boost operational efficiency."
        )
    }
}

#[async_trait]
impl Stage for UseCaseSynthesizer {
    fn id(&self) -> &'static str {
        "use_case_synthesizer"
    }

    #[instrument(skip(self, ctx), fields(company = %ctx.company))]
    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()> {
        let raw = tokio::fs::read_to_string(&self.snapshot_path)
            .await
            .with_context(|| format!("failed to read {}", self.snapshot_path.display()))?;
        let hits: Vec<SearchHit> =
            serde_json::from_str(&raw).context("search snapshot is not valid JSON")?;

        let combined_content = hits
            .iter()
            .map(|h| h.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let agent = get_llm(&Self::synthesis_preamble(&ctx.company))?;
        let response = agent
            .prompt(&combined_content)
            .await
            .map_err(|e| anyhow::anyhow!("prompt error: {}", e))?;

        let (records, outcome) = parse_use_cases(&response);
        match &outcome {
            SynthesisOutcome::Synthesized { count } => {
                info!(count, "synthesized use cases");
                ctx.use_cases.extend(records);
                persist_snapshot(&self.output_path, &ctx.use_cases).await?;
            }
            SynthesisOutcome::Empty { reason, detail } => {
                // soft failure: the run continues on an empty use-case list
                warn!(?reason, detail, "model output yielded no use cases");
            }
        }
        ctx.synthesis = Some(outcome);
        Ok(())
    }
}

/// The only validation applied to the model's reply: is it a JSON array.
/// Array elements keep their raw shape unless they match the advisory
/// four-field schema exactly.
pub fn parse_use_cases(raw: &str) -> (Vec<UseCaseRecord>, SynthesisOutcome) {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => {
            let records: Vec<UseCaseRecord> = items
                .into_iter()
                .map(|item| match serde_json::from_value::<UseCase>(item.clone()) {
                    Ok(uc) => UseCaseRecord::Structured(uc),
                    Err(_) => UseCaseRecord::Other(item),
                })
                .collect();
            let count = records.len();
            (records, SynthesisOutcome::Synthesized { count })
        }
        Ok(other) => (
            vec![],
            SynthesisOutcome::Empty {
                reason: EmptyReason::NotAnArray,
                detail: format!("expected an array of use cases, got {}", json_type(&other)),
            },
        ),
        Err(e) => (
            vec![],
            SynthesisOutcome::Empty {
                reason: EmptyReason::InvalidJson,
                detail: e.to_string(),
            },
        ),
    }
}

async fn persist_snapshot(path: &Path, records: &[UseCaseRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
