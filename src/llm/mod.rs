mod client;
mod types;

pub use client::{CompletionClient, InferenceClient, extract_model_names, extract_text};
pub use types::*;
