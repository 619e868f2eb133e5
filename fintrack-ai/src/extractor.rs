use crate::client::GenerativeClient;
use crate::retry::{retry, RetryPolicy};
use std::sync::Arc;

/// Failure of the retried model call
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("AI service exhausted after {attempts} attempts: {detail}")]
    ServiceExhausted { attempts: u32, detail: String },
}

/// Runs the transaction-extraction call against the model, retrying
/// per the policy. Holds no per-request state; one value is shared by
/// all concurrent uploads.
pub struct StatementExtractor {
    client: Arc<dyn GenerativeClient>,
    policy: RetryPolicy,
}

impl StatementExtractor {
    pub fn new(client: Arc<dyn GenerativeClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Ask the model for structured transactions in the statement text.
    /// Returns the raw model reply; parsing is the caller's next stage.
    pub async fn extract(&self, statement_text: &str) -> Result<String, ExtractionError> {
        let prompt = build_prompt(statement_text);

        retry(&self.policy, || self.client.generate(&prompt))
            .await
            .map_err(|exhausted| ExtractionError::ServiceExhausted {
                attempts: exhausted.attempts,
                detail: exhausted.last_error.to_string(),
            })
    }
}

fn build_prompt(statement_text: &str) -> String {
    format!(
        "Extract transactions as JSON array with date, description, merchant, amount, type, category from:\n{}",
        statement_text
    )
}
