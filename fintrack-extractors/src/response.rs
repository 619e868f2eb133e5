use fintrack_types::RawTransactionRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Failure while pulling structured records out of a model reply. Both
/// variants keep the full raw reply so the caller can return it for
/// diagnosis.
#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("No JSON block found in AI response")]
    MissingBlock { raw: String },

    #[error("AI response block is not a transaction array: {source}")]
    MalformedArray {
        raw: String,
        source: serde_json::Error,
    },
}

impl ResponseParseError {
    /// The original model reply, for the diagnostic error payload
    pub fn raw_response(&self) -> &str {
        match self {
            ResponseParseError::MissingBlock { raw } => raw,
            ResponseParseError::MalformedArray { raw, .. } => raw,
        }
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)```").unwrap())
}

/// Locate the fenced ```json block inside a freeform reply
fn find_fenced_json(raw: &str) -> Option<&str> {
    fence_regex()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Parse the model's freeform reply into raw transaction records.
///
/// Two fallible steps: locate the fenced block, then strictly parse its
/// content as an array. There is no partial recovery — either the whole
/// array parses or the request fails.
pub fn parse_transactions(raw: &str) -> Result<Vec<RawTransactionRecord>, ResponseParseError> {
    let block = find_fenced_json(raw).ok_or_else(|| ResponseParseError::MissingBlock {
        raw: raw.to_string(),
    })?;

    serde_json::from_str(block).map_err(|source| ResponseParseError::MalformedArray {
        raw: raw.to_string(),
        source,
    })
}
