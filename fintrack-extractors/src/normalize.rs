use chrono::{DateTime, NaiveDate};
use fintrack_types::{NewTransaction, RawTransactionRecord, TransactionType};

/// Coercion failure on a raw record. Normalization does no validation
/// beyond this naive coercion; one bad record fails the whole batch.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Transaction amount is not numeric: {0}")]
    BadAmount(String),

    #[error("Transaction date is not parseable: {0}")]
    BadDate(String),
}

/// Map a raw type value onto the canonical enumeration. Unknown and
/// missing values default to expense.
pub fn classify_type(raw: Option<&str>) -> TransactionType {
    match raw.unwrap_or_default().to_lowercase().as_str() {
        "income" | "credit" => TransactionType::Income,
        _ => TransactionType::Expense,
    }
}

/// Accept a JSON number, or a numeric string with optional `$` and
/// thousands separators
fn coerce_amount(raw: Option<&serde_json::Value>) -> Result<f64, NormalizeError> {
    let value = raw.ok_or_else(|| NormalizeError::BadAmount("missing".to_string()))?;

    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| NormalizeError::BadAmount(n.to_string())),
        serde_json::Value::String(s) => s
            .replace(',', "")
            .replace('$', "")
            .trim()
            .parse()
            .map_err(|_| NormalizeError::BadAmount(s.clone())),
        other => Err(NormalizeError::BadAmount(other.to_string())),
    }
}

/// Accept RFC 3339, `2024-01-31`, or `01/31/2024`; anything else fails
pub fn coerce_date(raw: Option<&str>) -> Result<i64, NormalizeError> {
    let date_str = raw.ok_or_else(|| NormalizeError::BadDate("missing".to_string()))?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp());
            }
        }
    }

    Err(NormalizeError::BadDate(date_str.to_string()))
}

/// Normalize parsed AI records into canonical transactions attributed to
/// the authenticated user.
pub fn normalize_records(
    records: Vec<RawTransactionRecord>,
    user_id: i64,
) -> Result<Vec<NewTransaction>, NormalizeError> {
    records
        .into_iter()
        .map(|record| {
            let description = record.description.unwrap_or_default();
            let merchant = record.merchant.unwrap_or_else(|| description.clone());

            Ok(NewTransaction {
                user_id,
                date: coerce_date(record.date.as_deref())?,
                amount: coerce_amount(record.amount.as_ref())?,
                merchant,
                description,
                transaction_type: classify_type(record.transaction_type.as_deref()),
                category: record.category.unwrap_or_else(|| "other".to_string()),
            })
        })
        .collect()
}
