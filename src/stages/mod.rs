mod collector;
mod miner;
mod proposer;
mod recommender;
mod synthesizer;

pub use collector::SearchCollector;
pub use miner::DatasetMiner;
pub use proposer::SolutionProposer;
pub use recommender::ResourceRecommender;
pub use synthesizer::{parse_use_cases, UseCaseSynthesizer};

use crate::models::AnalysisContext;
use crate::tools::tavily::TavilyClient;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SEARCH_SNAPSHOT_FILE: &str = "search_results.json";
pub const USE_CASE_SNAPSHOT_FILE: &str = "use_cases.json";
pub const DATASET_REPORT_FILE: &str = "datasets.md";

#[async_trait]
pub trait Stage: Send + Sync {
    fn id(&self) -> &'static str;

    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()>;
}

/// Drives the stages strictly in order. A stage error aborts the run; there
/// is no retry and no resumption, and a restarted run overwrites whatever
/// files the aborted one left behind.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(tavily: TavilyClient, output_dir: impl AsRef<Path>) -> Self {
        let dir: PathBuf = output_dir.as_ref().to_path_buf();
        let search_snapshot = dir.join(SEARCH_SNAPSHOT_FILE);
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(SearchCollector::new(tavily.clone(), search_snapshot.clone())),
            Box::new(UseCaseSynthesizer::new(
                search_snapshot,
                dir.join(USE_CASE_SNAPSHOT_FILE),
            )),
            Box::new(ResourceRecommender::new(tavily.clone())),
            Box::new(DatasetMiner::new(tavily, dir.join(DATASET_REPORT_FILE))),
            Box::new(SolutionProposer),
        ];
        Self { stages }
    }

    pub async fn run(&self, company: &str) -> Result<(AnalysisContext, HashMap<String, u64>)> {
        let mut ctx = AnalysisContext::new(company);
        let mut stage_times = HashMap::new();

        for stage in &self.stages {
            let start_time = std::time::Instant::now();
            info!(stage = stage.id(), "running stage");
            stage.run(&mut ctx).await?;
            stage_times.insert(
                stage.id().to_string(),
                start_time.elapsed().as_millis() as u64,
            );
        }

        Ok((ctx, stage_times))
    }
}
