//! Streaming chunk types.
//!
//! Each server-sent `data:` line carries exactly one of these, JSON encoded.
//! Fields the service may leave out are `Option`s (or defaulted scalars), so a
//! chunk never fails to decode merely because it is sparse: the final chunk of
//! a stream usually carries `usage` and nothing else of interest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::response::{LogProbs, Usage, lenient_logprobs};

/// A chunk schema a stream reader can decode.
pub trait StreamChunk: DeserializeOwned + Send + 'static {
    /// Short name of the schema, used in log fields.
    const KIND: &'static str;
}

/// A choice in a [`CompletionStreamChunk`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamingChoice {
    /// Position in the choice list.
    #[serde(default)]
    pub index: u32,
    /// Text fragment produced since the previous chunk.
    #[serde(default)]
    pub text: String,
    /// Normalized stop reason; absent until the choice finishes.
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Stop reason as reported upstream.
    #[serde(default)]
    pub native_finish_reason: Option<String>,
    /// Log probability detail, when requested. Unrecognized shapes read as
    /// `None` so they never cost the text fragment.
    #[serde(default, deserialize_with = "lenient_logprobs")]
    pub logprobs: Option<LogProbs>,
}

/// One chunk of a streaming `POST /completions` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStreamChunk {
    /// Generation identifier, shared by every chunk of one stream.
    #[serde(default)]
    pub id: String,
    /// Upstream provider serving the stream.
    #[serde(default)]
    pub provider: String,
    /// Model producing the stream. May change mid-stream under fallback routing.
    #[serde(default)]
    pub model: String,
    /// Object kind.
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
    /// Choices carried by this chunk (possibly none).
    #[serde(default)]
    pub choices: Vec<StreamingChoice>,
    /// Backend configuration fingerprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
    /// Token accounting, typically only on the last chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl StreamChunk for CompletionStreamChunk {
    const KIND: &'static str = "completion";
}

/// Incremental content of a chat stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Author role; only present on the first chunk of a message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content fragment, not cumulative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A choice in a [`ChatCompletionStreamChunk`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamingChoice {
    /// Position in the choice list.
    #[serde(default)]
    pub index: u32,
    /// What changed since the previous chunk.
    #[serde(default)]
    pub delta: Delta,
    /// Stop reason; absent until the choice finishes.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// One chunk of a streaming `POST /chat/completions` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionStreamChunk {
    /// Generation identifier, shared by every chunk of one stream.
    #[serde(default)]
    pub id: String,
    /// Object kind, e.g. `"chat.completion.chunk"`.
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created: i64,
    /// Model producing the stream. May change mid-stream under fallback routing.
    #[serde(default)]
    pub model: String,
    /// Choices carried by this chunk (possibly none).
    #[serde(default)]
    pub choices: Vec<ChatStreamingChoice>,
    /// Token accounting, typically only on the last chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl StreamChunk for ChatCompletionStreamChunk {
    const KIND: &'static str = "chat";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_completion_chunk_decodes() {
        let chunk: CompletionStreamChunk =
            serde_json::from_str(r#"{"id":"x","choices":[{"index":0,"text":"Hello"}]}"#).unwrap();
        assert_eq!(chunk.id, "x");
        assert_eq!(chunk.choices.len(), 1);
        assert_eq!(chunk.choices[0].text, "Hello");
        assert!(chunk.choices[0].finish_reason.is_none());
        assert!(chunk.usage.is_none());
        assert!(chunk.provider.is_empty());
    }

    #[test]
    fn null_finish_reason_is_absent_and_empty_string_is_not() {
        let null: StreamingChoice =
            serde_json::from_str(r#"{"index":0,"text":"a","finish_reason":null}"#).unwrap();
        assert_eq!(null.finish_reason, None);

        let empty: StreamingChoice =
            serde_json::from_str(r#"{"index":0,"text":"a","finish_reason":""}"#).unwrap();
        assert_eq!(empty.finish_reason.as_deref(), Some(""));
    }

    #[test]
    fn unrecognized_logprobs_shape_keeps_text() {
        for logprobs in [
            r#""abc""#,
            r#"{"tokens":["Hel"],"token_logprobs":[-0.1]}"#,
            r#"{"content":[{"token":"Hel"}]}"#,
            "7",
            "null",
        ] {
            let json = format!(r#"{{"index":0,"text":"Hello","logprobs":{logprobs}}}"#);
            let choice: StreamingChoice = serde_json::from_str(&json).unwrap();
            assert_eq!(choice.text, "Hello", "logprobs = {logprobs}");
        }

        let choice: StreamingChoice =
            serde_json::from_str(r#"{"index":0,"text":"a","logprobs":"abc"}"#).unwrap();
        assert!(choice.logprobs.is_none());
    }

    #[test]
    fn well_formed_logprobs_still_decode() {
        let choice: StreamingChoice = serde_json::from_str(
            r#"{"index":0,"text":"Hi","logprobs":{"content":[{"token":"Hi","logprob":-0.5,"top_logprobs":[]}]}}"#,
        )
        .unwrap();
        let logprobs = choice.logprobs.unwrap();
        assert_eq!(logprobs.content[0].token, "Hi");
        assert_eq!(logprobs.content[0].logprob, -0.5);
    }

    #[test]
    fn chat_chunk_with_role_and_content() {
        let chunk: ChatCompletionStreamChunk = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"}}]}"#,
        )
        .unwrap();
        let delta = &chunk.choices[0].delta;
        assert_eq!(delta.role.as_deref(), Some("assistant"));
        assert_eq!(delta.content.as_deref(), Some("Hi"));
    }

    #[test]
    fn chat_chunk_without_delta_defaults() {
        let chunk: ChatCompletionStreamChunk = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#,
        )
        .unwrap();
        assert_eq!(chunk.choices[0].delta, Delta::default());
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(chunk.usage.unwrap().total_tokens, 4);
    }

    #[test]
    fn delta_omits_absent_fields_when_serialized() {
        let delta = Delta {
            role: None,
            content: Some("x".into()),
        };
        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            serde_json::json!({"content": "x"})
        );
    }

    #[test]
    fn chunk_kinds_are_distinct() {
        assert_ne!(CompletionStreamChunk::KIND, ChatCompletionStreamChunk::KIND);
    }
}
