use anyhow::Result;
use rig::prelude::*;
use rig::providers::openai;

pub type LlmAgent = rig::agent::Agent<openai::CompletionModel>;

pub const MODEL: &str = "gpt-4o-mini";

/// Builds a single-turn agent with the given system preamble. The API key is
/// read from the environment at call time, so a missing key fails the stage
/// that needed the model rather than server startup.
pub fn get_llm(preamble: &str) -> Result<LlmAgent> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OpenAI API key not configured"))?;
    let client = openai::Client::new(&api_key);
    Ok(client.agent(MODEL).preamble(preamble).build())
}
