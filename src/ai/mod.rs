mod prompts;

pub use prompts::{SYMPTOM_CHECK_PROMPT, SYSTEM_PROMPT};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{AiConfig, AiProvider, ChatRole, Message};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model selected when the user switches provider without picking one.
pub fn default_model(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
        AiProvider::Openai => DEFAULT_OPENAI_MODEL,
    }
}

/// Thin bring-your-own-key chat client. Provider, model and key come from
/// the stored [`AiConfig`]; conversation state stays with the caller.
pub struct AiClient {
    http: reqwest::Client,
}

impl AiClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Send the conversation and return the assistant reply.
    pub async fn chat(
        &self,
        config: &AiConfig,
        messages: &[Message],
        symptom_check: bool,
    ) -> Result<String> {
        let system_prompt = if symptom_check {
            SYMPTOM_CHECK_PROMPT
        } else {
            SYSTEM_PROMPT
        };

        match config.provider {
            AiProvider::Openai => self.chat_openai(config, system_prompt, messages).await,
            AiProvider::Gemini => self.chat_gemini(config, system_prompt, messages).await,
        }
    }

    async fn chat_openai(
        &self,
        config: &AiConfig,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String> {
        let mut chat_messages = vec![OpenAiMessage {
            role: "system",
            content: system_prompt.to_string(),
        }];
        chat_messages.extend(messages.iter().map(|msg| OpenAiMessage {
            role: match msg.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            content: msg.content.clone(),
        }));

        let request = OpenAiRequest {
            model: &config.model,
            messages: chat_messages,
        };

        let response: OpenAiResponse = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&config.api_key)
            .json(&request)
            .send()
            .await
            .context("openai request failed")?
            .error_for_status()
            .context("openai returned an error status")?
            .json()
            .await
            .context("failed to decode openai response")?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("openai response contained no choices"))
    }

    async fn chat_gemini(
        &self,
        config: &AiConfig,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            },
            contents: messages
                .iter()
                .map(|msg| GeminiContent {
                    role: Some(
                        match msg.role {
                            ChatRole::User => "user",
                            ChatRole::Assistant => "model",
                        }
                        .to_string(),
                    ),
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                })
                .collect(),
        };

        let url = format!(
            "{GEMINI_BASE_URL}/{}:generateContent?key={}",
            config.model, config.api_key
        );

        let response: GeminiResponse = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .context("gemini request failed")?
            .error_for_status()
            .context("gemini returned an error status")?
            .json()
            .await
            .context("failed to decode gemini response")?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("gemini response contained no candidates"))?;

        Ok(candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

impl Default for AiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
