//! Streaming example: real-time chat output from OpenRouter.
//!
//! Set OPENROUTER_API_KEY in your environment and run:
//!   cargo run --example streaming -p openrouter
//!
//! `RUST_LOG=openrouter=debug` shows request and stream lifecycle logs.

use std::io::Write;
use std::time::Duration;

use openrouter::{ChatCompletionRequestBuilder, ChatMessage, OpenRouter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = OpenRouter::from_env()?;

    let request = ChatCompletionRequestBuilder::new(
        "openai/gpt-4o-mini",
        vec![
            ChatMessage::system("You are a terse poet."),
            ChatMessage::user("Write a haiku about Rust programming."),
        ],
    )
    .with_max_tokens(256)
    .with_usage(true)
    .build();

    let mut stream = client.chat_completion_stream(request).await?;

    // Give up if the upstream stalls between chunks.
    let stall = Duration::from_secs(30);

    print!("Streaming: ");
    std::io::stdout().flush()?;

    loop {
        let chunk = match tokio::time::timeout(stall, stream.recv()).await {
            Ok(Ok(Some(chunk))) => chunk,
            Ok(Ok(None)) => break,
            Ok(Err(err)) => {
                eprintln!("\nStream error: {err}");
                break;
            }
            Err(_) => {
                eprintln!("\nNo data for {stall:?}, giving up.");
                break;
            }
        };

        for choice in &chunk.choices {
            if let Some(text) = &choice.delta.content {
                print!("{text}");
                std::io::stdout().flush()?;
            }
        }
        if let Some(usage) = chunk.usage {
            println!();
            println!(
                "Token usage: {} prompt, {} completion",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
    }

    stream.close();
    println!();
    println!("Stream complete.");
    Ok(())
}
