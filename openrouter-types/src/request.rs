//! Request objects for the completion and chat completion endpoints, with
//! fluent builders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Token allocation level for model reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    /// Roughly 80% of `max_tokens` goes to reasoning.
    High,
    /// Roughly 50% of `max_tokens` goes to reasoning.
    Medium,
    /// Roughly 20% of `max_tokens` goes to reasoning.
    Low,
}

/// Precision of the model weights served by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// Integer, 4 bit.
    Int4,
    /// Integer, 8 bit.
    Int8,
    /// Floating point, 4 bit.
    Fp4,
    /// Floating point, 6 bit.
    Fp6,
    /// Floating point, 8 bit.
    Fp8,
    /// Floating point, 16 bit.
    Fp16,
    /// Brain floating point, 16 bit.
    Bf16,
    /// Floating point, 32 bit.
    Fp32,
    /// Unknown precision.
    Unknown,
}

/// Reasoning (thinking token) configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasoningOptions {
    /// Proportional reasoning budget. Mutually exclusive with `max_tokens`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<Effort>,
    /// Absolute reasoning token budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Use reasoning internally but leave it out of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
}

/// Whether to include usage accounting in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageOptions {
    /// Include token usage (and cost) details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<bool>,
}

/// Provider routing preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Allow backup providers when the primary is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fallbacks: Option<bool>,
    /// Only route to providers supporting every request parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_parameters: Option<bool>,
    /// Data collection policy: `"allow"` or `"deny"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection: Option<String>,
    /// Providers to try, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
    /// Providers allowed for this request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,
    /// Providers to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    /// Acceptable quantization levels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantizations: Vec<Quantization>,
    /// Sort strategy: `"price"`, `"throughput"` or `"latency"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Maximum pricing accepted for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<MaxPrice>,
    /// Experimental routing switches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<ExperimentalOptions>,
}

/// Price ceilings, in USD per million tokens (or per image / request).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxPrice {
    /// Prompt token price ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<f64>,
    /// Completion token price ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<f64>,
    /// Per-image price ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<f64>,
    /// Per-request price ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<f64>,
}

/// Experimental routing options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalOptions {
    /// Route the completion through the chat completions path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_chat_completions: Option<bool>,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `"system"`, `"user"` or `"assistant"`.
    pub role: String,
    /// Text content.
    pub content: String,
}

impl ChatMessage {
    /// A system prompt message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, e.g. `"openai/gpt-3.5-turbo-instruct"`.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Fallback models, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    /// Provider routing preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderOptions>,
    /// Reasoning configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningOptions>,
    /// Usage accounting options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageOptions>,
    /// Prompt transforms, e.g. `"middle-out"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,
    /// Stream the response as server-sent events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature, `[0, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Seed for deterministic sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Nucleus sampling, `(0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling, `[1, inf)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Frequency penalty, `[-2, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty, `[-2, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Repetition penalty, `(0, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Token ID to bias mapping.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub logit_bias: HashMap<String, f64>,
    /// Number of top log probabilities to return per token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    /// Minimum token probability, `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    /// Top-a sampling, `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,
    /// Return log probabilities of output tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier, e.g. `"openai/gpt-4o"`.
    pub model: String,
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,
    /// Fallback models, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    /// Provider routing preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderOptions>,
    /// Reasoning configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningOptions>,
    /// Usage accounting options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageOptions>,
    /// Prompt transforms, e.g. `"middle-out"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,
    /// Stream the response as server-sent events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature, `[0, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Seed for deterministic sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Nucleus sampling, `(0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling, `[1, inf)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Frequency penalty, `[-2, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty, `[-2, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Repetition penalty, `(0, 2]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Token ID to bias mapping.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub logit_bias: HashMap<String, f64>,
    /// Number of top log probabilities to return per token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    /// Minimum token probability, `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    /// Top-a sampling, `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,
    /// Return log probabilities of output tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Stable end-user identifier for abuse detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

// The two request shapes share every sampling knob, so their builders do too.
macro_rules! sampling_setters {
    () => {
        /// Set fallback models for routing.
        #[must_use]
        pub fn with_models(mut self, models: Vec<String>) -> Self {
            self.request.models = models;
            self
        }

        /// Set provider routing preferences.
        #[must_use]
        pub fn with_provider(mut self, provider: ProviderOptions) -> Self {
            self.request.provider = Some(provider);
            self
        }

        /// Set reasoning configuration.
        #[must_use]
        pub fn with_reasoning(mut self, reasoning: ReasoningOptions) -> Self {
            self.request.reasoning = Some(reasoning);
            self
        }

        /// Ask for usage accounting in the response.
        #[must_use]
        pub fn with_usage(mut self, include: bool) -> Self {
            self.request
                .usage
                .get_or_insert_with(UsageOptions::default)
                .include = Some(include);
            self
        }

        /// Set prompt transforms.
        #[must_use]
        pub fn with_transforms(mut self, transforms: Vec<String>) -> Self {
            self.request.transforms = transforms;
            self
        }

        /// Enable or disable streaming.
        ///
        /// The streaming client methods force this on regardless.
        #[must_use]
        pub fn with_stream(mut self, stream: bool) -> Self {
            self.request.stream = Some(stream);
            self
        }

        /// Set the maximum number of tokens to generate.
        #[must_use]
        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.request.max_tokens = Some(max_tokens);
            self
        }

        /// Set the sampling temperature.
        #[must_use]
        pub fn with_temperature(mut self, temperature: f64) -> Self {
            self.request.temperature = Some(temperature);
            self
        }

        /// Set the sampling seed.
        #[must_use]
        pub fn with_seed(mut self, seed: i64) -> Self {
            self.request.seed = Some(seed);
            self
        }

        /// Set nucleus sampling.
        #[must_use]
        pub fn with_top_p(mut self, top_p: f64) -> Self {
            self.request.top_p = Some(top_p);
            self
        }

        /// Set top-k sampling.
        #[must_use]
        pub fn with_top_k(mut self, top_k: u32) -> Self {
            self.request.top_k = Some(top_k);
            self
        }

        /// Set the frequency penalty.
        #[must_use]
        pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
            self.request.frequency_penalty = Some(penalty);
            self
        }

        /// Set the presence penalty.
        #[must_use]
        pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
            self.request.presence_penalty = Some(penalty);
            self
        }

        /// Set the repetition penalty.
        #[must_use]
        pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
            self.request.repetition_penalty = Some(penalty);
            self
        }

        /// Set per-token logit biases.
        #[must_use]
        pub fn with_logit_bias(mut self, logit_bias: HashMap<String, f64>) -> Self {
            self.request.logit_bias = logit_bias;
            self
        }

        /// Set how many top log probabilities to return.
        #[must_use]
        pub fn with_top_logprobs(mut self, top_logprobs: u32) -> Self {
            self.request.top_logprobs = Some(top_logprobs);
            self
        }

        /// Set the minimum token probability.
        #[must_use]
        pub fn with_min_p(mut self, min_p: f64) -> Self {
            self.request.min_p = Some(min_p);
            self
        }

        /// Set top-a sampling.
        #[must_use]
        pub fn with_top_a(mut self, top_a: f64) -> Self {
            self.request.top_a = Some(top_a);
            self
        }

        /// Return log probabilities of output tokens.
        #[must_use]
        pub fn with_logprobs(mut self, logprobs: bool) -> Self {
            self.request.logprobs = Some(logprobs);
            self
        }

        /// Set stop sequences.
        #[must_use]
        pub fn with_stop(mut self, stop: Vec<String>) -> Self {
            self.request.stop = stop;
            self
        }
    };
}

/// Fluent builder for [`CompletionRequest`].
///
/// ```
/// use openrouter_types::CompletionRequestBuilder;
///
/// let request = CompletionRequestBuilder::new("openai/gpt-3.5-turbo-instruct", "Once upon a time")
///     .with_max_tokens(64)
///     .with_temperature(0.7)
///     .build();
/// assert_eq!(request.max_tokens, Some(64));
/// ```
#[derive(Debug, Clone)]
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    /// Start a request with the required model and prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            request: CompletionRequest {
                model: model.into(),
                prompt: prompt.into(),
                ..Default::default()
            },
        }
    }

    sampling_setters!();

    /// Finish building.
    #[must_use]
    pub fn build(self) -> CompletionRequest {
        self.request
    }
}

/// Fluent builder for [`ChatCompletionRequest`].
#[derive(Debug, Clone)]
pub struct ChatCompletionRequestBuilder {
    request: ChatCompletionRequest,
}

impl ChatCompletionRequestBuilder {
    /// Start a request with the required model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            request: ChatCompletionRequest {
                model: model.into(),
                messages,
                ..Default::default()
            },
        }
    }

    sampling_setters!();

    /// Set the end-user identifier.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.request.user = Some(user.into());
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ChatCompletionRequest {
        self.request
    }
}

/// Fluent builder for [`ProviderOptions`].
#[derive(Debug, Clone, Default)]
pub struct ProviderOptionsBuilder {
    options: ProviderOptions,
}

impl ProviderOptionsBuilder {
    /// Start with no preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow or forbid fallback providers.
    #[must_use]
    pub fn with_allow_fallbacks(mut self, allow: bool) -> Self {
        self.options.allow_fallbacks = Some(allow);
        self
    }

    /// Require providers to support every request parameter.
    #[must_use]
    pub fn with_require_parameters(mut self, require: bool) -> Self {
        self.options.require_parameters = Some(require);
        self
    }

    /// Set the data collection policy (`"allow"` or `"deny"`).
    #[must_use]
    pub fn with_data_collection(mut self, policy: impl Into<String>) -> Self {
        self.options.data_collection = Some(policy.into());
        self
    }

    /// Set the provider order.
    #[must_use]
    pub fn with_order(mut self, providers: Vec<String>) -> Self {
        self.options.order = providers;
        self
    }

    /// Restrict routing to these providers.
    #[must_use]
    pub fn with_only(mut self, providers: Vec<String>) -> Self {
        self.options.only = providers;
        self
    }

    /// Skip these providers.
    #[must_use]
    pub fn with_ignore(mut self, providers: Vec<String>) -> Self {
        self.options.ignore = providers;
        self
    }

    /// Restrict to these quantization levels.
    #[must_use]
    pub fn with_quantizations(mut self, quantizations: Vec<Quantization>) -> Self {
        self.options.quantizations = quantizations;
        self
    }

    /// Set the sort strategy.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.options.sort = Some(sort.into());
        self
    }

    /// Replace all price ceilings at once.
    #[must_use]
    pub fn with_max_price(mut self, max_price: MaxPrice) -> Self {
        self.options.max_price = Some(max_price);
        self
    }

    /// Set the prompt price ceiling.
    #[must_use]
    pub fn with_max_prompt_price(mut self, price: f64) -> Self {
        self.max_price_mut().prompt = Some(price);
        self
    }

    /// Set the completion price ceiling.
    #[must_use]
    pub fn with_max_completion_price(mut self, price: f64) -> Self {
        self.max_price_mut().completion = Some(price);
        self
    }

    /// Set the per-image price ceiling.
    #[must_use]
    pub fn with_max_image_price(mut self, price: f64) -> Self {
        self.max_price_mut().image = Some(price);
        self
    }

    /// Set the per-request price ceiling.
    #[must_use]
    pub fn with_max_request_price(mut self, price: f64) -> Self {
        self.max_price_mut().request = Some(price);
        self
    }

    /// Force completions through the chat completions path.
    #[must_use]
    pub fn with_force_chat_completions(mut self, force: bool) -> Self {
        self.options
            .experimental
            .get_or_insert_with(ExperimentalOptions::default)
            .force_chat_completions = Some(force);
        self
    }

    fn max_price_mut(&mut self) -> &mut MaxPrice {
        self.options.max_price.get_or_insert_with(MaxPrice::default)
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ProviderOptions {
        self.options
    }
}
