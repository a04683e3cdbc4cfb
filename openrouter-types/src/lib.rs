//! Shared types for the OpenRouter API.
//!
//! This crate holds pure data: request objects and their builders, synchronous
//! responses, streaming chunks, model/endpoint metadata, and the error
//! taxonomy. It has no HTTP dependency; the `openrouter` crate does the I/O.

pub mod error;
pub mod metadata;
pub mod request;
pub mod response;
pub mod stream;

pub use error::*;
pub use metadata::*;
pub use request::*;
pub use response::*;
pub use stream::*;
