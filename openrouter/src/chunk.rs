//! Decoding of `data:` payloads into typed chunks.

use openrouter_types::StreamChunk;

/// Decode one payload, or `None` if it does not match the chunk schema.
///
/// Malformed payloads are dropped rather than ending the stream: a live feed
/// keeps going past a bad frame. Each drop is logged at `warn`.
pub(crate) fn decode_chunk<T: StreamChunk>(payload: &str) -> Option<T> {
    match serde_json::from_str::<T>(payload) {
        Ok(chunk) => Some(chunk),
        Err(e) => {
            tracing::warn!(
                kind = T::KIND,
                error = %e,
                payload_len = payload.len(),
                "skipping malformed stream chunk"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use openrouter_types::{ChatCompletionStreamChunk, CompletionStreamChunk};

    use super::*;

    #[test]
    fn decodes_completion_chunk() {
        let chunk: CompletionStreamChunk =
            decode_chunk(r#"{"id":"x","choices":[{"index":0,"text":"Hello"}]}"#).unwrap();
        assert_eq!(chunk.id, "x");
        assert_eq!(chunk.choices[0].text, "Hello");
    }

    #[test]
    fn decodes_chat_chunk() {
        let chunk: ChatCompletionStreamChunk = decode_chunk(
            r#"{"id":"x","choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hi"));
    }

    #[test]
    fn invalid_json_is_skipped() {
        assert!(decode_chunk::<CompletionStreamChunk>("{invalid json}").is_none());
    }

    #[test]
    fn wrong_shape_is_skipped() {
        // `choices` must be an array.
        assert!(decode_chunk::<ChatCompletionStreamChunk>(r#"{"id":"x","choices":7}"#).is_none());
        assert!(decode_chunk::<ChatCompletionStreamChunk>(r#""just a string""#).is_none());
    }
}
