//! Example demonstrating the Hugging Face reader
//!
//! This example asks a question against a fixed context passage, without
//! touching Wikipedia.
//!
//! Note: This example calls the hosted inference API. Set HF_TOKEN if your
//! account requires it.
//! To run: cargo run --example huggingface_example

use wikiqa_core::models::QaInput;
use wikiqa_model::{HuggingFaceReader, QuestionAnswerer};

fn main() {
    println!("WikiQA Model - Hugging Face Reader Example");
    println!("==========================================\n");

    let reader = match HuggingFaceReader::hosted("deepset/tinyroberta-squad2") {
        Ok(reader) => reader,
        Err(e) => {
            println!("✗ Failed to create reader: {}", e);
            return;
        }
    };
    let reader = match std::env::var("HF_TOKEN") {
        Ok(token) => reader.with_token(token),
        Err(_) => reader,
    };

    println!("Reader Configuration:");
    println!("  Model: {}", reader.model_name());
    println!("  URL: {}", reader.inference_url());
    println!();

    let context = "The Eiffel Tower is a wrought-iron lattice tower on the Champ de Mars in Paris. \
                   It is named after the engineer Gustave Eiffel, whose company designed \
                   and built the tower.";
    let question = "Who is the Eiffel Tower named after?";

    println!("Question: {}", question);
    println!("Attempting inference...");
    println!("(This will fail without network access)\n");

    match reader.answer(&QaInput::new(question, context)) {
        Ok(span) => {
            println!("✓ Answer: {}", span.answer);
            println!("  Score: {:.3}", span.score);
            println!("  Span: {}..{}", span.start, span.end);
            println!("  Extractive: {}", span.is_span_of(context));
        }
        Err(e) => {
            println!("✗ Inference failed:");
            println!("  {}", e);
            println!("\nTo run this example successfully:");
            println!("  1. Create a token at https://huggingface.co/settings/tokens");
            println!("  2. export HF_TOKEN=hf_...");
            println!("  3. Run this example again");
        }
    }
}
