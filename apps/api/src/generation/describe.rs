//! Job-description drafting — builds a prompt from a posting and its
//! company, streams a forced tool call through the LLM client, and
//! persists the accumulated result.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::DESCRIPTION_SYSTEM;
use crate::jobs::store;
use crate::llm_client::{LlmClient, ToolSpec};
use crate::models::company::CompanyRow;
use crate::models::job::JobPostingRow;

/// Tool arguments as accumulated from the stream.
#[derive(Debug, Deserialize)]
struct DescriptionArguments {
    description: String,
}

/// The single forced tool: one required string field, `description`.
fn description_tool() -> ToolSpec {
    ToolSpec {
        name: "record_job_description".to_string(),
        description: "Record a job description drafted from the provided details.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "The drafted job description."
                }
            },
            "required": ["description"]
        }),
    }
}

pub fn build_description_prompt(
    job: &JobPostingRow,
    company: &CompanyRow,
    required_tools: &[String],
) -> String {
    let tools = required_tools.join(", ");
    format!(
        "Generate a professional job description for the position '{}' at {}, \
         a company in the {} industry. \
         The role requires expertise in the following tools: {}. \
         Structure the response as a single paragraph.",
        job.title, company.name, company.industry, tools
    )
}

/// Drafts a description and overwrites the stored one. Every failure in
/// here — network, malformed stream output, persistence — maps to a single
/// generation error; the posting keeps its previous description unless the
/// final UPDATE succeeds.
pub async fn draft_and_store_description(
    pool: &PgPool,
    llm: &LlmClient,
    job: &JobPostingRow,
    company: &CompanyRow,
    required_tools: &[String],
) -> Result<String, AppError> {
    let prompt = build_description_prompt(job, company, required_tools);
    let tool = description_tool();

    let raw_arguments = llm
        .call_tool_streaming(&prompt, DESCRIPTION_SYSTEM, &tool)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;

    let arguments: DescriptionArguments = serde_json::from_str(&raw_arguments)
        .map_err(|e| AppError::Generation(format!("malformed tool arguments: {e}")))?;

    store::set_description(pool, job.id, &arguments.description)
        .await
        .map_err(|e| AppError::Generation(e.to_string()))?;

    info!("Stored generated description for job {}", job.id);

    Ok(arguments.description)
}
