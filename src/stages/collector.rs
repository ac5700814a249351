use super::Stage;
use crate::models::AnalysisContext;
use crate::tools::tavily::{TavilyClient, DEPTH_ADVANCED};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, instrument};

const MAX_RESULTS: i32 = 5;

/// Industry research: one advanced search about the company, persisted as a
/// JSON snapshot for the synthesizer to re-read.
pub struct SearchCollector {
    tavily: TavilyClient,
    snapshot_path: PathBuf,
}

impl SearchCollector {
    pub fn new(tavily: TavilyClient, snapshot_path: PathBuf) -> Self {
        Self {
            tavily,
            snapshot_path,
        }
    }

    fn research_query(company: &str) -> String {
        format!(
            "What industry does {company} operate in, and what segment the company is working in \
             (e.g., Automotive, Manufacturing, Finance, Retail, Healthcare, etc.)? \
             What are the company's key offerings and strategic focus areas \
             (e.g., operations, supply chain, customer experience, etc.)? \
             What are its recent products and its technological advancements? \
             How has it made use of AI?"
        )
    }
}

#[async_trait]
impl Stage for SearchCollector {
    fn id(&self) -> &'static str {
        "search_collector"
    }

    #[instrument(skip(self, ctx), fields(company = %ctx.company))]
    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()> {
        let query = Self::research_query(&ctx.company);
        let hits = self.tavily.search(&query, DEPTH_ADVANCED, MAX_RESULTS).await?;

        // hits without a title or url are unusable downstream
        let hits: Vec<_> = hits
            .into_iter()
            .filter(|h| !h.title.is_empty() && !h.url.is_empty())
            .collect();

        let json = serde_json::to_string_pretty(&hits)?;
        tokio::fs::write(&self.snapshot_path, json)
            .await
            .with_context(|| format!("failed to write {}", self.snapshot_path.display()))?;

        info!("collected {} search hits", hits.len());
        ctx.search_hits = hits;
        Ok(())
    }
}
