use serde::{Deserialize, Serialize};

/// Direction of a transaction after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// One row of the model's reply, exactly as parsed from the fenced
/// JSON block. Every field is optional and untyped until normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransactionRecord {
    pub date: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    pub merchant: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
}

/// A normalized transaction ready for insertion. `user_id` always comes
/// from the authenticated request context, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: i64,
    pub date: i64,
    pub amount: f64,
    pub description: String,
    pub merchant: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
}

/// A persisted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: i64,
    pub amount: f64,
    pub description: String,
    pub merchant: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Income/expense totals over a stored batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
}

/// Response for a successful statement upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadStatementResponse {
    pub message: String,
    pub summary: TransactionSummary,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

/// Body for updating a stored transaction; absent fields are left as-is
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub merchant: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
}
