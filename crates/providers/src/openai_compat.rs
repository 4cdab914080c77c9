//! OpenAI-compatible generator.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM and any endpoint exposing
//! `/chat/completions`. When the prompt carries tools they are sent as
//! native function definitions, and a tool call in the reply comes back as
//! `{"tool": <name>, "args": <arguments>}` text.

use actloop_config::AppConfig;
use actloop_core::{Generator, Message, Prompt, ProviderError, Role, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// A generator backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiCompatGenerator {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1024,
            client,
        })
    }

    /// Build from loaded configuration. Fails when no API key is available.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProviderError::NotConfigured(
                "no API key; set ACTLOOP_API_KEY or api_key in ~/.actloop/config.toml".into(),
            )
        })?;
        Ok(Self::new(&config.api_url, api_key, &config.model)?
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: None,
            })
            .collect()
    }

    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(&prompt.messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        if !prompt.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&prompt.tools));
        }

        body
    }
}

/// Flatten a completion message into reply text.
///
/// The first tool call wins; its arguments string is parsed so the loop sees
/// a proper `args` object. Plain replies pass through as their content.
fn reply_text(message: ApiMessage) -> Result<String, ProviderError> {
    if let Some(call) = message.tool_calls.and_then(|calls| calls.into_iter().next()) {
        let args: Value = if call.function.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                ProviderError::InvalidResponse(format!(
                    "tool call arguments for '{}' are not JSON: {e}",
                    call.function.name
                ))
            })?
        };
        let invocation = serde_json::json!({ "tool": call.function.name, "args": args });
        return Ok(invocation.to_string());
    }

    Ok(message.content.unwrap_or_default())
}

#[async_trait]
impl Generator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        "openai_compat"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt);

        debug!(
            model = %self.model,
            messages = prompt.messages.len(),
            tools = prompt.tools.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = &api_response.usage {
            debug!(
                model = %api_response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        reply_text(choice.message)
    }
}

// --- OpenAI API types ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> OpenAiCompatGenerator {
        OpenAiCompatGenerator::new("https://api.example.com/v1/", "sk-test", "gpt-4o").unwrap()
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(generator().base_url, "https://api.example.com/v1");
    }

    #[test]
    fn from_config_requires_a_key() {
        let err = OpenAiCompatGenerator::from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));

        let config = AppConfig {
            api_key: Some("sk-test".into()),
            max_tokens: 256,
            ..AppConfig::default()
        };
        let generator = OpenAiCompatGenerator::from_config(&config).unwrap();
        assert_eq!(generator.model(), "gpt-4o");
        assert_eq!(generator.max_tokens, 256);
    }

    #[test]
    fn message_conversion() {
        let messages = vec![Message::system("You are helpful"), Message::user("Hello")];
        let api_messages = OpenAiCompatGenerator::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn tools_only_sent_when_present() {
        let generator = generator();
        let bare = generator.request_body(&Prompt::new(vec![Message::user("hi")]));
        assert!(bare.get("tools").is_none());
        assert_eq!(bare["max_tokens"], 1024);

        let prompt = Prompt::new(vec![Message::user("hi")]).with_tools(vec![ToolDefinition {
            name: "list_files".into(),
            description: "Returns a list of files in the directory.".into(),
            parameters: serde_json::json!({"type": "object", "properties": {}, "required": []}),
        }]);
        let body = generator.request_body(&prompt);
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "list_files");
    }

    #[test]
    fn tool_call_becomes_invocation_text() {
        let data = r#"{
            "model": "gpt-4o",
            "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": [
                {"id": "call_1", "type": "function",
                 "function": {"name": "read_file", "arguments": "{\"file_name\": \"main.rs\"}"}}
            ]}}]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let message = parsed.choices.into_iter().next().unwrap().message;

        let text = reply_text(message).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "read_file");
        assert_eq!(value["args"]["file_name"], "main.rs");
    }

    #[test]
    fn empty_arguments_become_empty_object() {
        let message = ApiMessage {
            role: "assistant".into(),
            content: None,
            tool_calls: Some(vec![ApiToolCall {
                id: "call_1".into(),
                r#type: "function".into(),
                function: ApiFunction {
                    name: "list_files".into(),
                    arguments: String::new(),
                },
            }]),
        };
        let value: Value = serde_json::from_str(&reply_text(message).unwrap()).unwrap();
        assert_eq!(value["args"], serde_json::json!({}));
    }

    #[test]
    fn plain_reply_passes_through() {
        let message = ApiMessage {
            role: "assistant".into(),
            content: Some("I give up".into()),
            tool_calls: None,
        };
        assert_eq!(reply_text(message).unwrap(), "I give up");
    }
}
