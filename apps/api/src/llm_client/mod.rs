/// LLM Client — the single point of entry for all Claude API calls in Hireboard.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in Hireboard.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("API stream error: {0}")]
    Stream(String),

    #[error("stream ended without any tool arguments")]
    EmptyToolArguments,
}

/// A tool the model is forced to call. The arguments it produces are the
/// structured output of the request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    tools: &'a [ToolSpec],
    tool_choice: ToolChoice<'a>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Server-sent events emitted by the streaming Messages API. Only the
/// variants this client acts on are modelled; everything else falls
/// through to `Other` and is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    Error { error: AnthropicErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    InputJsonDelta { partial_json: String },
    #[serde(other)]
    Other,
}

/// The single LLM client used by all services in Hireboard.
/// Wraps the Anthropic Messages API in streaming tool-use mode.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Calls the API with a single forced tool and streaming enabled, then
    /// drains the SSE stream and returns the accumulated tool-arguments
    /// JSON. The caller is responsible for deserializing the buffer.
    pub async fn call_tool_streaming(
        &self,
        prompt: &str,
        system: &str,
        tool: &ToolSpec,
    ) -> Result<String, LlmError> {
        let request_body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            tools: std::slice::from_ref(tool),
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: &tool.name,
            },
            stream: true,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let stream = response.bytes_stream().map(|chunk| chunk.map_err(LlmError::Http));
        let arguments = drain_tool_arguments(stream).await?;

        debug!("LLM stream drained: {} bytes of tool arguments", arguments.len());

        Ok(arguments)
    }
}

/// Drains an SSE byte stream, concatenating `input_json_delta` fragments
/// strictly in arrival order. The returned buffer is only meaningful once
/// the stream has fully ended.
///
/// Network chunk boundaries do not align with event boundaries, so bytes
/// are line-buffered first. Splitting on newline bytes is UTF-8 safe:
/// continuation bytes never equal b'\n'.
async fn drain_tool_arguments(
    stream: impl Stream<Item = Result<Bytes, LlmError>>,
) -> Result<String, LlmError> {
    futures_util::pin_mut!(stream);

    let mut line_buf: Vec<u8> = Vec::new();
    let mut arguments = String::new();

    while let Some(chunk) = stream.next().await {
        line_buf.extend_from_slice(&chunk?);

        while let Some(newline) = line_buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = line_buf.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(fragment) = parse_sse_line(line.trim_end())? {
                arguments.push_str(&fragment);
            }
        }
    }

    if arguments.is_empty() {
        return Err(LlmError::EmptyToolArguments);
    }

    Ok(arguments)
}

/// Parses a single SSE line. Returns the `partial_json` fragment for
/// `input_json_delta` events, `None` for everything else that is benign,
/// and an error for in-stream error events.
fn parse_sse_line(line: &str) -> Result<Option<String>, LlmError> {
    let Some(data) = line.strip_prefix("data:") else {
        // `event:` lines, comments and blank keep-alive lines
        return Ok(None);
    };
    let data = data.trim_start();
    if data.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<StreamEvent>(data)? {
        StreamEvent::ContentBlockDelta {
            delta: Delta::InputJsonDelta { partial_json },
        } => Ok(Some(partial_json)),
        StreamEvent::Error { error } => Err(LlmError::Stream(error.message)),
        StreamEvent::ContentBlockDelta { .. } | StreamEvent::Other => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn delta_line(fragment: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "input_json_delta", "partial_json": fragment}
            })
        )
    }

    #[test]
    fn test_parse_sse_line_extracts_json_fragment() {
        let line = delta_line("{\"descr");
        let fragment = parse_sse_line(line.trim_end()).unwrap();
        assert_eq!(fragment.as_deref(), Some("{\"descr"));
    }

    #[test]
    fn test_parse_sse_line_skips_event_names_and_pings() {
        assert!(parse_sse_line("event: content_block_delta").unwrap().is_none());
        assert!(parse_sse_line("data: {\"type\": \"ping\"}").unwrap().is_none());
        assert!(parse_sse_line("").unwrap().is_none());
    }

    #[test]
    fn test_parse_sse_line_skips_text_deltas() {
        let line = r#"data: {"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "hi"}}"#;
        assert!(parse_sse_line(line).unwrap().is_none());
    }

    #[test]
    fn test_parse_sse_line_surfaces_error_events() {
        let line = r#"data: {"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}"#;
        let err = parse_sse_line(line).unwrap_err();
        assert!(matches!(err, LlmError::Stream(msg) if msg == "Overloaded"));
    }

    #[tokio::test]
    async fn test_drain_concatenates_fragments_in_arrival_order() {
        let events = [
            "event: message_start\n".to_string(),
            "data: {\"type\": \"message_start\"}\n\n".to_string(),
            delta_line("{\"description\": "),
            delta_line("\"Drives and "),
            delta_line("navigates.\"}"),
            "data: {\"type\": \"message_stop\"}\n\n".to_string(),
        ];
        let chunks = events
            .iter()
            .map(|e| Ok(Bytes::copy_from_slice(e.as_bytes())))
            .collect::<Vec<Result<Bytes, LlmError>>>();

        let buffer = drain_tool_arguments(stream::iter(chunks)).await.unwrap();
        assert_eq!(buffer, "{\"description\": \"Drives and navigates.\"}");
    }

    #[tokio::test]
    async fn test_drain_reassembles_lines_split_across_chunks() {
        // One event split mid-line over three network chunks
        let line = delta_line("{\"description\": \"ok\"}");
        let (a, rest) = line.split_at(10);
        let (b, c) = rest.split_at(25);
        let chunks: Vec<Result<Bytes, LlmError>> = vec![
            Ok(Bytes::copy_from_slice(a.as_bytes())),
            Ok(Bytes::copy_from_slice(b.as_bytes())),
            Ok(Bytes::copy_from_slice(c.as_bytes())),
        ];

        let buffer = drain_tool_arguments(stream::iter(chunks)).await.unwrap();
        assert_eq!(buffer, "{\"description\": \"ok\"}");
    }

    #[tokio::test]
    async fn test_drain_without_tool_fragments_is_an_error() {
        let chunks: Vec<Result<Bytes, LlmError>> =
            vec![Ok(Bytes::from("data: {\"type\": \"message_stop\"}\n"))];
        let err = drain_tool_arguments(stream::iter(chunks)).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyToolArguments));
    }

    #[tokio::test]
    async fn test_drain_surfaces_mid_stream_error_events() {
        let chunks: Vec<Result<Bytes, LlmError>> = vec![
            Ok(Bytes::copy_from_slice(delta_line("{\"description\"").as_bytes())),
            Ok(Bytes::from(
                "data: {\"type\": \"error\", \"error\": {\"type\": \"api_error\", \"message\": \"boom\"}}\n",
            )),
        ];
        let err = drain_tool_arguments(stream::iter(chunks)).await.unwrap_err();
        assert!(matches!(err, LlmError::Stream(msg) if msg == "boom"));
    }
}
