//! Basic content generation example for Gemini API.
//!
//! This example demonstrates:
//! - Creating a client from environment variables
//! - A single `generateContent` call with a typed request
//! - Reading the typed response and the joined text
//!
//! # Usage
//!
//! Set your API key as an environment variable:
//! ```bash
//! export GEMINI_API_KEY="your-api-key-here"
//! # or
//! export GOOGLE_API_KEY="your-api-key-here"
//! ```
//!
//! Then run:
//! ```bash
//! cargo run --example basic
//! ```

use integrations_gemini_ai::{
    create_client_from_env,
    types::{GenerateContentRequest, GenerationConfig},
    CallOptions, GeminiClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    println!("=== Gemini Basic Content Generation Example ===\n");

    // Reads GEMINI_API_KEY or GOOGLE_API_KEY, plus the optional GEMINI_* settings
    let client = create_client_from_env()?;

    let prompt = "Explain quantum computing in simple terms, in 2-3 sentences.";
    println!("Prompt: {}\n", prompt);

    let payload = GenerateContentRequest::from_text(prompt)
        .with_generation_config(GenerationConfig {
            temperature: Some(0.4),
            max_output_tokens: Some(256),
            ..Default::default()
        })
        .to_payload()?;

    let options = CallOptions::new().model("gemini-1.5-flash");
    let output = client.content().generate_content(payload, options).await?;

    println!("=== Response ===\n");
    println!("{}\n", output.text()?);

    for response in output.responses()? {
        for reason in response.finish_reasons() {
            println!("Finish reason: {:?}", reason);
        }

        if let Some(usage) = &response.usage_metadata {
            println!("Prompt tokens:     {}", usage.prompt_token_count);
            println!("Completion tokens: {}", usage.candidates_token_count.unwrap_or(0));
            println!("Total tokens:      {}", usage.total_token_count);
        }
    }

    Ok(())
}
