use serde::{Deserialize, Serialize};

pub mod transaction;
pub mod user;

pub use transaction::{
    NewTransaction, RawTransactionRecord, Transaction, TransactionResponse, TransactionSummary,
    TransactionType, TransactionsResponse, UpdateTransactionRequest, UploadStatementResponse,
};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
