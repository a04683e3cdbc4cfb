//! Basic example: a completion plus account and catalog metadata.
//!
//! Set OPENROUTER_API_KEY in your environment and run:
//!   cargo run --example basic -p openrouter

use openrouter::{CompletionRequestBuilder, OpenRouter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = OpenRouter::from_env()?.site_title("openrouter basic example");

    let credits = client.credits().await?;
    println!(
        "Credits: {:.2} used of {:.2} ({:.2} left)",
        credits.total_usage,
        credits.total_credits,
        credits.remaining()
    );

    let models = client.models().await?;
    println!("{} models available", models.len());
    for model in models.iter().take(5) {
        println!(
            "  {} (prompt {} / completion {} USD per token)",
            model.id, model.pricing.prompt, model.pricing.completion
        );
    }

    let request =
        CompletionRequestBuilder::new("openai/gpt-3.5-turbo-instruct", "The Rust borrow checker")
            .with_max_tokens(48)
            .with_temperature(0.7)
            .build();
    let response = client.completion(request).await?;
    if let Some(choice) = response.choices.first() {
        println!("Completion: {}", choice.text.trim());
    }
    println!(
        "Token usage: {} prompt, {} completion",
        response.usage.prompt_tokens, response.usage.completion_tokens
    );

    let generation = client.generation(&response.id).await?;
    println!(
        "Generation {} cost {} USD via {}",
        generation.id, generation.total_cost, generation.provider_name
    );

    Ok(())
}
