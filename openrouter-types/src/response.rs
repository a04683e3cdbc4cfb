//! Synchronous (non-streaming) response bodies and the pieces they share with
//! streaming chunks.

use serde::{Deserialize, Deserializer, Serialize};

use crate::request::ChatMessage;

/// Token accounting for one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens generated.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Prompt plus completion.
    #[serde(default)]
    pub total_tokens: u64,
    /// Cached prompt token breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    /// Reasoning token breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

/// Breakdown of prompt tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    /// Prompt tokens served from the provider's cache.
    #[serde(default)]
    pub cached_tokens: u64,
}

/// Breakdown of completion tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionTokensDetails {
    /// Completion tokens spent on reasoning.
    #[serde(default)]
    pub reasoning_tokens: u64,
}

/// One candidate token and its log probability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogProbToken {
    /// Token text.
    pub token: String,
    /// UTF-8 bytes of the token, when provided.
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
    /// Log probability.
    pub logprob: f64,
}

/// Log probability of a generated token plus its top alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenLogProbs {
    /// Token text.
    pub token: String,
    /// UTF-8 bytes of the token, when provided.
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
    /// Log probability.
    pub logprob: f64,
    /// Most likely alternatives at this position.
    #[serde(default)]
    pub top_logprobs: Vec<LogProbToken>,
}

/// Log probability information for a choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogProbs {
    /// Per-token log probabilities of the content.
    #[serde(default)]
    pub content: Vec<TokenLogProbs>,
    /// Per-token log probabilities of a refusal, when the model refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<Vec<TokenLogProbs>>,
}

/// A choice in a [`CompletionResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    /// Position in the choice list.
    #[serde(default)]
    pub index: u32,
    /// Generated text.
    #[serde(default)]
    pub text: String,
    /// Normalized reason generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Reason as reported by the upstream provider.
    #[serde(default)]
    pub native_finish_reason: Option<String>,
    /// Reasoning text, for models that expose it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Log probability detail, when requested. Unrecognized shapes read as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_logprobs"
    )]
    pub logprobs: Option<LogProbs>,
}

/// Read `logprobs` as [`LogProbs`], or `None` if the value has another shape
/// (providers send strings, legacy token arrays, or nothing at all).
pub(crate) fn lenient_logprobs<'de, D>(deserializer: D) -> Result<Option<LogProbs>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Response body of `POST /completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generation identifier.
    pub id: String,
    /// Upstream provider that served the request.
    #[serde(default)]
    pub provider: String,
    /// Model that produced the output.
    #[serde(default)]
    pub model: String,
    /// Object kind, e.g. `"text_completion"`.
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
    /// Generated choices.
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    /// Backend configuration fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
}

/// A choice in a [`ChatCompletionResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Position in the choice list.
    #[serde(default)]
    pub index: u32,
    /// Generated message.
    pub message: ChatMessage,
    /// Why generation stopped, e.g. `"stop"` or `"length"`.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body of `POST /chat/completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generation identifier.
    pub id: String,
    /// Upstream provider that served the request.
    #[serde(default)]
    pub provider: String,
    /// Model that produced the output.
    #[serde(default)]
    pub model: String,
    /// Object kind, e.g. `"chat.completion"`.
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
    /// Generated choices.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
}
