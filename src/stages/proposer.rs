use super::Stage;
use crate::models::AnalysisContext;
use crate::tools::llm::get_llm;
use anyhow::Result;
use async_trait::async_trait;
use rig::completion::Prompt;
use tracing::{info, instrument};

const PREAMBLE: &str = "Propose GenAI solutions, for the following use cases generated";

/// Final pass: the use-case list goes back to the model as flat text and the
/// reply is kept verbatim as prose. No structure is imposed on the output.
pub struct SolutionProposer;

#[async_trait]
impl Stage for SolutionProposer {
    fn id(&self) -> &'static str {
        "solution_proposer"
    }

    #[instrument(skip(self, ctx))]
    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()> {
        let use_cases_text = ctx
            .use_cases
            .iter()
            .map(|uc| {
                format!(
                    "UseCase: {}, Objective: {}",
                    uc.title().unwrap_or_default(),
                    uc.objective().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let agent = get_llm(PREAMBLE)?;
        let solutions = agent
            .prompt(&use_cases_text)
            .await
            .map_err(|e| anyhow::anyhow!("prompt error: {}", e))?;

        info!("generated proposals with {} characters", solutions.len());
        ctx.proposals = solutions;
        Ok(())
    }
}
