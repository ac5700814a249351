use crate::models::{SearchHit, TavilySearchRequest, TavilySearchResponse};
use anyhow::{Context, Result};
use std::env;

pub const SEARCH_ENDPOINT: &str = "https://api.tavily.com/search";

pub const DEPTH_ADVANCED: &str = "advanced";

/// Thin blocking-style wrapper over the Tavily search API. One POST per
/// query, no retry; transport and decode errors propagate to the caller.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TAVILY_API_KEY")
            .map_err(|_| anyhow::anyhow!("TAVILY_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    pub async fn search(
        &self,
        query: &str,
        search_depth: &str,
        max_results: i32,
    ) -> Result<Vec<SearchHit>> {
        let request = TavilySearchRequest {
            query: query.to_string(),
            max_results,
            search_depth: search_depth.to_string(),
            include_raw_content: false,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("tavily request failed")?;

        let search_response: TavilySearchResponse = response
            .json()
            .await
            .context("failed to parse tavily response")?;

        Ok(search_response
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}
