pub mod client;
pub mod extractor;
pub mod retry;

pub use client::{GeminiClient, GenerativeClient};
pub use extractor::{ExtractionError, StatementExtractor};
pub use retry::{retry, Exhausted, RetryPolicy};
