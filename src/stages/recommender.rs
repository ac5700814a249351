use super::Stage;
use crate::models::AnalysisContext;
use crate::tools::tavily::{TavilyClient, DEPTH_ADVANCED};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, instrument};

const MAX_RESULTS: i32 = 3;

pub const REPORT_QUERIES: [&str; 5] = [
    "AI and digital transformation insights McKinsey",
    "Deloitte AI applications in business",
    "Nexocode digital transformation trends",
    "How is the retail industry leveraging AI and ML",
    "AI applications in automotive manufacturing",
];

/// Industry trend reports: a fixed query list, flattened in query order then
/// API order. No deduplication across queries.
pub struct ResourceRecommender {
    tavily: TavilyClient,
}

impl ResourceRecommender {
    pub fn new(tavily: TavilyClient) -> Self {
        Self { tavily }
    }
}

#[async_trait]
impl Stage for ResourceRecommender {
    fn id(&self) -> &'static str {
        "resource_recommender"
    }

    #[instrument(skip(self, ctx))]
    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()> {
        for query in REPORT_QUERIES {
            let hits = self.tavily.search(query, DEPTH_ADVANCED, MAX_RESULTS).await?;
            ctx.additional_resources.extend(hits);
        }
        info!(
            "accumulated {} additional resources",
            ctx.additional_resources.len()
        );
        Ok(())
    }
}
