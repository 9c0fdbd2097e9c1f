//! Streaming content generation example for Gemini API.
//!
//! This example demonstrates:
//! - Creating a client from environment variables
//! - Streaming generation over Server-Sent Events
//! - Printing each decoded document from the callback as it arrives
//! - Handling errors reported with a non-success status
//!
//! # Usage
//!
//! Set your API key as an environment variable:
//! ```bash
//! export GEMINI_API_KEY="your-api-key-here"
//! ```
//!
//! Then run:
//! ```bash
//! cargo run --example streaming
//! ```

use std::io::Write;

use integrations_gemini_ai::{
    streaming::DecodedResult, types::GenerateContentRequest, CallOptions, GeminiClientImpl,
    GeminiClient, GeminiError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .init();

    println!("=== Gemini Streaming Content Generation Example ===\n");

    let client = GeminiClientImpl::from_env()?;

    let prompt = "Write a short story about a robot learning to paint. Make it about 200 words.";
    let payload = GenerateContentRequest::from_text(prompt).to_payload()?;

    let mut events = 0;
    let mut print_chunk = |result: &DecodedResult| {
        events += 1;
        print!("{}", result.text);
        let _ = std::io::stdout().flush();
    };

    let result = client
        .content()
        .stream_generate_content(
            payload,
            CallOptions::new().model("gemini-1.5-flash"),
            Some(&mut print_chunk),
        )
        .await;

    match result {
        Ok(output) => {
            println!("\n\n=== Streaming Complete ===");
            println!("Documents received: {}", output.documents().len());
            println!("Characters:         {}", output.text()?.chars().count());
        }
        Err(GeminiError::Request(error)) => {
            eprintln!("\nThe API rejected the request: {}", error);
            eprintln!("Payload: {}", error.payload());
        }
        Err(error) => return Err(error.into()),
    }

    println!("Callbacks: {}", events);
    Ok(())
}
