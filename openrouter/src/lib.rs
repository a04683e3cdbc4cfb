//! Async client for the OpenRouter API.
//!
//! [`OpenRouter`] sends text and chat completions, either waiting for the full
//! response or streaming it chunk by chunk through a [`StreamReader`], and
//! reads account and catalog metadata (credits, models, endpoints,
//! generations).
//!
//! ```no_run
//! use openrouter::{ChatCompletionRequestBuilder, ChatMessage, OpenRouter};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenRouter::from_env()?;
//! let request = ChatCompletionRequestBuilder::new(
//!     "openai/gpt-4o-mini",
//!     vec![ChatMessage::user("Write a haiku about Rust")],
//! )
//! .build();
//!
//! let mut stream = client.chat_completion_stream(request).await?;
//! while let Some(chunk) = stream.recv().await? {
//!     if let Some(text) = chunk.choices.first().and_then(|c| c.delta.content.as_deref()) {
//!         print!("{text}");
//!     }
//! }
//! stream.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub(crate) mod chunk;
pub(crate) mod http_error;
pub mod sse;
pub mod stream;

pub use client::{DEFAULT_BASE_URL, OpenRouter};
pub use stream::{CloseHandle, StreamReader};

// Re-export openrouter-types for convenience
pub use openrouter_types::*;
