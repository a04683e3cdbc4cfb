//! Account and catalog metadata: credits, models, endpoints, generations.
//!
//! Prices arrive as decimal strings (USD per token, image or request) and are
//! kept exact with [`Decimal`].

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The `{"data": ...}` envelope used by every metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Payload.
    pub data: T,
}

/// Account balance from `GET /credits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditsData {
    /// Credits purchased, in USD.
    #[serde(default)]
    pub total_credits: f64,
    /// Credits spent, in USD.
    #[serde(default)]
    pub total_usage: f64,
}

impl CreditsData {
    /// Credits left to spend.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.total_credits - self.total_usage
    }
}

/// A model from `GET /models`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    /// Model identifier, e.g. `"openai/gpt-4o"`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unix timestamp the model was added.
    #[serde(default)]
    pub created: f64,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Input and output modalities.
    #[serde(default)]
    pub architecture: ModelArchitecture,
    /// Limits of the preferred provider.
    #[serde(default)]
    pub top_provider: ModelTopProvider,
    /// Pricing.
    #[serde(default)]
    pub pricing: ModelPricing,
    /// Context window in tokens.
    #[serde(default)]
    pub context_length: Option<f64>,
    /// Hugging Face repository, for open-weight models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugging_face_id: Option<String>,
    /// Per-request limits, when the model has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_request_limits: Option<HashMap<String, serde_json::Value>>,
    /// Request parameters the model honors.
    #[serde(default)]
    pub supported_parameters: Vec<String>,
}

/// Modalities and tokenizer of a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelArchitecture {
    /// Accepted input kinds, e.g. `["text", "image"]`.
    #[serde(default)]
    pub input_modalities: Vec<String>,
    /// Produced output kinds.
    #[serde(default)]
    pub output_modalities: Vec<String>,
    /// Tokenizer family.
    #[serde(default)]
    pub tokenizer: String,
    /// Instruction format, when the model has one.
    #[serde(default)]
    pub instruct_type: Option<String>,
}

/// Limits of the preferred provider for a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTopProvider {
    /// Whether the provider moderates content.
    #[serde(default)]
    pub is_moderated: bool,
    /// Context window in tokens.
    #[serde(default)]
    pub context_length: Option<f64>,
    /// Maximum completion tokens.
    #[serde(default)]
    pub max_completion_tokens: Option<f64>,
}

/// Model pricing, USD per unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Per prompt token.
    #[serde(default)]
    pub prompt: Decimal,
    /// Per completion token.
    #[serde(default)]
    pub completion: Decimal,
    /// Per input image.
    #[serde(default)]
    pub image: Decimal,
    /// Per request.
    #[serde(default)]
    pub request: Decimal,
    /// Per cached prompt token read.
    #[serde(default)]
    pub input_cache_read: Decimal,
    /// Per cached prompt token written.
    #[serde(default)]
    pub input_cache_write: Decimal,
    /// Per web search.
    #[serde(default)]
    pub web_search: Decimal,
    /// Per internal reasoning token.
    #[serde(default)]
    pub internal_reasoning: Decimal,
}

/// A model and its serving endpoints from `GET /models/{author}/{slug}/endpoints`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointData {
    /// Model identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unix timestamp the model was added.
    #[serde(default)]
    pub created: f64,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Input and output modalities.
    #[serde(default)]
    pub architecture: ModelArchitecture,
    /// Providers serving this model.
    #[serde(default)]
    pub endpoints: Vec<EndpointDetail>,
}

/// One provider endpoint serving a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointDetail {
    /// Endpoint name.
    #[serde(default)]
    pub name: String,
    /// Context window in tokens.
    #[serde(default)]
    pub context_length: f64,
    /// Pricing at this endpoint.
    #[serde(default)]
    pub pricing: EndpointPricing,
    /// Provider name.
    #[serde(default)]
    pub provider_name: String,
    /// Request parameters this endpoint honors.
    #[serde(default)]
    pub supported_parameters: Vec<String>,
}

/// Endpoint pricing, USD per unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointPricing {
    /// Per request.
    #[serde(default)]
    pub request: Decimal,
    /// Per input image.
    #[serde(default)]
    pub image: Decimal,
    /// Per prompt token.
    #[serde(default)]
    pub prompt: Decimal,
    /// Per completion token.
    #[serde(default)]
    pub completion: Decimal,
}

/// Cost and timing of one generation from `GET /generation?id=...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    /// Generation identifier.
    pub id: String,
    /// Total cost in USD.
    #[serde(default)]
    pub total_cost: f64,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub created_at: String,
    /// Model used.
    #[serde(default)]
    pub model: String,
    /// Origin URL of the request.
    #[serde(default)]
    pub origin: String,
    /// Usage charged, in USD.
    #[serde(default)]
    pub usage: f64,
    /// Whether the caller's own provider key was used.
    #[serde(default)]
    pub is_byok: bool,
    /// Identifier assigned by the upstream provider.
    #[serde(default)]
    pub upstream_id: Option<String>,
    /// Discount from cache hits.
    #[serde(default)]
    pub cache_discount: Option<f64>,
    /// Calling app, if attributed.
    #[serde(default)]
    pub app_id: Option<i64>,
    /// Whether the generation was streamed.
    #[serde(default)]
    pub streamed: bool,
    /// Whether the generation was cancelled.
    #[serde(default)]
    pub cancelled: bool,
    /// Upstream provider name.
    #[serde(default)]
    pub provider_name: String,
    /// Time to first token, milliseconds.
    #[serde(default)]
    pub latency: Option<i64>,
    /// Moderation time, milliseconds.
    #[serde(default)]
    pub moderation_latency: Option<i64>,
    /// Generation time, milliseconds.
    #[serde(default)]
    pub generation_time: Option<i64>,
    /// Normalized stop reason.
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Stop reason as reported upstream.
    #[serde(default)]
    pub native_finish_reason: Option<String>,
    /// Prompt tokens (normalized tokenizer).
    #[serde(default)]
    pub tokens_prompt: u64,
    /// Completion tokens (normalized tokenizer).
    #[serde(default)]
    pub tokens_completion: u64,
    /// Prompt tokens (provider tokenizer).
    #[serde(default)]
    pub native_tokens_prompt: u64,
    /// Completion tokens (provider tokenizer).
    #[serde(default)]
    pub native_tokens_completion: u64,
    /// Reasoning tokens (provider tokenizer).
    #[serde(default)]
    pub native_tokens_reasoning: u64,
    /// Media items in the prompt.
    #[serde(default)]
    pub num_media_prompt: u64,
    /// Media items in the completion.
    #[serde(default)]
    pub num_media_completion: u64,
    /// Web search results used.
    #[serde(default)]
    pub num_search_results: u64,
}
