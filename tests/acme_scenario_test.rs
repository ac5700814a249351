//! End-to-end shape of a run for a small fixed company, with the search API
//! mocked and the model reply replaced by a fixture.

use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use usecase_scout::models::{AnalysisContext, SynthesisOutcome, UseCaseRecord};
use usecase_scout::stages::{
    parse_use_cases, DatasetMiner, SearchCollector, Stage, DATASET_REPORT_FILE,
    SEARCH_SNAPSHOT_FILE,
};
use usecase_scout::tools::tavily::TavilyClient;

const MODEL_REPLY: &str = r#"[{"UseCase":"Defect Detection","Objective":"Reduce waste","AI application":"Computer Vision","Cross-Functional Benefits":"Quality+Cost"}]"#;

#[tokio::test]
async fn acme_corp_run_shape() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    // collector: one industry hit for the company
    let research_mock = server.mock(|when, then| {
        when.method(POST).path("/search").body_contains("Acme Corp");
        then.status(200).json_body(json!({
            "results": [{
                "title": "Acme and machine vision",
                "url": "https://example.com/acme",
                "content": "Acme makes widgets using AI vision",
                "score": 0.97
            }]
        }));
    });

    let client = TavilyClient::with_endpoint("test-key", server.url("/search"));
    let collector = SearchCollector::new(
        client.clone(),
        temp_dir.path().join(SEARCH_SNAPSHOT_FILE),
    );

    let mut ctx = AnalysisContext::new("Acme Corp");
    collector.run(&mut ctx).await.unwrap();
    research_mock.assert();
    assert_eq!(ctx.search_hits.len(), 1);

    // synthesizer parse step on the fixed model reply
    let (records, outcome) = parse_use_cases(MODEL_REPLY);
    assert_eq!(outcome, SynthesisOutcome::Synthesized { count: 1 });
    assert_eq!(records[0].title(), Some("Defect Detection"));
    assert!(matches!(records[0], UseCaseRecord::Structured(_)));
    ctx.use_cases.extend(records);
    ctx.synthesis = Some(outcome);

    // miner: every host query must reference the use case; the first two
    // hosts deliver one link each, so the third host is never consulted
    let kaggle_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/search")
            .body_contains("kaggle.com")
            .body_contains("Defect Detection");
        then.status(200).json_body(json!({
            "results": [{
                "title": "Casting product quality",
                "url": "https://kaggle.com/casting",
                "content": "",
                "score": 0.8
            }]
        }));
    });
    let huggingface_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/search")
            .body_contains("huggingface.co")
            .body_contains("Defect Detection");
        then.status(200).json_body(json!({
            "results": [{
                "title": "Surface defect images",
                "url": "https://huggingface.co/datasets/defects",
                "content": "",
                "score": 0.8
            }]
        }));
    });
    let github_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/search")
            .body_contains("github.com")
            .body_contains("Defect Detection");
        then.status(200).json_body(json!({ "results": [] }));
    });

    let miner = DatasetMiner::new(client, temp_dir.path().join(DATASET_REPORT_FILE));
    miner.run(&mut ctx).await.unwrap();

    kaggle_mock.assert_hits(1);
    huggingface_mock.assert_hits(1);
    github_mock.assert_hits(0);

    assert_eq!(ctx.dataset_links.len(), 1);
    let entry = &ctx.dataset_links[0];
    assert_eq!(entry.use_case.title(), Some("Defect Detection"));
    assert_eq!(entry.datasets.len(), 2);
    assert_eq!(entry.datasets[0].url, "https://kaggle.com/casting");
    assert_eq!(entry.datasets[1].url, "https://huggingface.co/datasets/defects");
}
