use super::Stage;
use crate::models::{AnalysisContext, DatasetEntry, DatasetLink, UseCaseRecord};
use crate::tools::tavily::{TavilyClient, DEPTH_ADVANCED};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, instrument};

const MAX_RESULTS: i32 = 2;
const DATASETS_PER_USE_CASE: usize = 2;

pub const DATASET_QUERIES: [&str; 3] = [
    "AI datasets site:kaggle.com",
    "machine learning datasets site:huggingface.co",
    "AI datasets site:github.com",
];

pub const NONE_FOUND: &str = "None found";

/// Dataset links per use case, mined host by host. Hosts are tried in the
/// fixed query order and the search stops for a use case as soon as two
/// links are accumulated, so later hosts may never be consulted.
pub struct DatasetMiner {
    tavily: TavilyClient,
    report_path: PathBuf,
}

impl DatasetMiner {
    pub fn new(tavily: TavilyClient, report_path: PathBuf) -> Self {
        Self {
            tavily,
            report_path,
        }
    }
}

#[async_trait]
impl Stage for DatasetMiner {
    fn id(&self) -> &'static str {
        "dataset_miner"
    }

    #[instrument(skip(self, ctx))]
    async fn run(&self, ctx: &mut AnalysisContext) -> Result<()> {
        let mut dataset_links = Vec::with_capacity(ctx.use_cases.len());

        for use_case in &ctx.use_cases {
            let title = use_case.title().unwrap_or_default();
            let mut datasets: Vec<DatasetLink> = Vec::new();

            for query in DATASET_QUERIES {
                let full_query = format!("{query} for use case {title}");
                let hits = self
                    .tavily
                    .search(&full_query, DEPTH_ADVANCED, MAX_RESULTS)
                    .await?;
                datasets.extend(hits.into_iter().map(|h| DatasetLink {
                    title: h.title,
                    url: h.url,
                }));

                if datasets.len() >= DATASETS_PER_USE_CASE {
                    break;
                }
            }

            if datasets.len() < DATASETS_PER_USE_CASE {
                datasets.push(DatasetLink {
                    title: NONE_FOUND.to_string(),
                    url: String::new(),
                });
            }

            dataset_links.push(DatasetEntry {
                use_case: use_case.clone(),
                datasets,
            });
        }

        tokio::fs::write(&self.report_path, render_report(&dataset_links))
            .await
            .with_context(|| format!("failed to write {}", self.report_path.display()))?;

        info!(
            "mined datasets for {} use cases, report at {}",
            dataset_links.len(),
            self.report_path.display()
        );
        ctx.dataset_links = dataset_links;
        Ok(())
    }
}

/// Markdown report: one heading per use case, one bullet per dataset link.
/// A link with an empty url is the "None found" sentinel and renders as
/// plain text.
pub fn render_report(entries: &[DatasetEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let heading = match &entry.use_case {
            UseCaseRecord::Structured(uc) => uc.use_case.as_str(),
            UseCaseRecord::Other(value) if value.is_object() => value
                .get("UseCase")
                .and_then(Value::as_str)
                .unwrap_or("No Use Case Found"),
            UseCaseRecord::Other(_) => NONE_FOUND,
        };
        out.push_str(&format!("### Use Case: {heading}\n"));

        for link in &entry.datasets {
            if link.url.is_empty() {
                out.push_str(&format!("- {}\n", link.title));
            } else {
                out.push_str(&format!("- [{}]({})\n", link.title, link.url));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UseCase;
    use serde_json::json;

    fn structured(title: &str) -> UseCaseRecord {
        UseCaseRecord::Structured(UseCase {
            use_case: title.to_string(),
            objective: "obj".to_string(),
            ai_application: "app".to_string(),
            cross_functional_benefits: "benefits".to_string(),
        })
    }

    #[test]
    fn report_links_and_sentinels() {
        let entries = vec![
            DatasetEntry {
                use_case: structured("Defect Detection"),
                datasets: vec![
                    DatasetLink {
                        title: "Casting defects".to_string(),
                        url: "https://kaggle.com/casting".to_string(),
                    },
                    DatasetLink {
                        title: NONE_FOUND.to_string(),
                        url: String::new(),
                    },
                ],
            },
            DatasetEntry {
                use_case: UseCaseRecord::Other(json!({"Extra": "no title here"})),
                datasets: vec![],
            },
            DatasetEntry {
                use_case: UseCaseRecord::Other(json!("not an object")),
                datasets: vec![],
            },
        ];

        let report = render_report(&entries);
        assert!(report.contains("### Use Case: Defect Detection\n"));
        assert!(report.contains("- [Casting defects](https://kaggle.com/casting)\n"));
        assert!(report.contains("- None found\n"));
        assert!(report.contains("### Use Case: No Use Case Found\n"));
        assert!(report.contains("### Use Case: None found\n"));
    }
}
