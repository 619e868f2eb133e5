use crate::auth::AuthenticatedUser;
use crate::config::ApiConfig;
use crate::database::{transactions as db, Database};
use crate::errors::ApiError;
use crate::helpers::upload;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Result as ActixResult};
use fintrack_ai::StatementExtractor;
use fintrack_extractors::normalize::{classify_type, coerce_date};
use fintrack_extractors::{normalize_records, parse_transactions, read_statement};
use fintrack_types::{
    Transaction, TransactionResponse, TransactionSummary, TransactionType, TransactionsResponse,
    UpdateTransactionRequest, UploadStatementResponse,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Income/expense totals over a stored batch. An empty batch sums to zero.
fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Income)
        .map(|t| t.amount)
        .sum();

    let total_expense: f64 = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .map(|t| t.amount)
        .sum();

    TransactionSummary {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
    }
}

/// Full ingestion pipeline: upload -> extract text -> model call with
/// retry -> parse -> normalize -> persist -> summary.
pub async fn upload_statement(
    db: web::Data<Arc<Database>>,
    extractor: web::Data<Arc<StatementExtractor>>,
    config: web::Data<ApiConfig>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let upload_dir = config
        .storage
        .clone()
        .unwrap_or_default()
        .upload_dir;

    let saved = upload::save_statement(payload, &upload_dir)
        .await?
        .ok_or_else(|| {
            ApiError::Validation("Please upload a valid bank statement".to_string())
        })?;

    info!(
        "Processing statement upload: user_id={} file={:?}",
        user.id, saved.path
    );

    let content = read_statement(&saved.path, &saved.extension).map_err(ApiError::from)?;

    let raw_reply = extractor.extract(&content).await.map_err(ApiError::from)?;

    let records = parse_transactions(&raw_reply).map_err(ApiError::from)?;
    info!("Parsed {} transaction(s) from model reply", records.len());

    let normalized = normalize_records(records, user.id).map_err(ApiError::from)?;

    let stored = db::insert_transactions(db.async_connection.clone(), &normalized)
        .await
        .map_err(ApiError::Internal)?;

    // The uploaded file is removed only once the batch is persisted;
    // failure exits above leave it in the upload dir for inspection.
    if let Err(e) = std::fs::remove_file(&saved.path) {
        warn!("Failed to remove uploaded statement {:?}: {}", saved.path, e);
    }

    let summary = summarize(&stored);

    info!(
        "Stored {} transaction(s) for user {}: income={} expense={}",
        stored.len(),
        user.id,
        summary.total_income,
        summary.total_expense
    );

    Ok(HttpResponse::Ok().json(UploadStatementResponse {
        message: "Transactions uploaded successfully".to_string(),
        summary,
        transactions: stored,
    }))
}

pub async fn list_transactions(
    db: web::Data<Arc<Database>>,
    user: AuthenticatedUser,
) -> ActixResult<HttpResponse> {
    let transactions = db::list_for_user(db.async_connection.clone(), user.id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(TransactionsResponse { transactions }))
}

pub async fn get_transaction(
    db: web::Data<Arc<Database>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let transaction = db::get_for_user(db.async_connection.clone(), user.id, *path)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

    Ok(HttpResponse::Ok().json(TransactionResponse { transaction }))
}

pub async fn update_transaction(
    db: web::Data<Arc<Database>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateTransactionRequest>,
) -> ActixResult<HttpResponse> {
    let req = request.into_inner();

    let mut transaction = db::get_for_user(db.async_connection.clone(), user.id, *path)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

    if let Some(date) = req.date.as_deref() {
        transaction.date =
            coerce_date(Some(date)).map_err(|e| ApiError::Validation(e.to_string()))?;
    }
    if let Some(amount) = req.amount {
        transaction.amount = amount;
    }
    if let Some(description) = req.description {
        transaction.description = description;
    }
    if let Some(merchant) = req.merchant {
        transaction.merchant = merchant;
    }
    if let Some(raw_type) = req.transaction_type.as_deref() {
        // client-supplied type strings go through the same classification
        // as AI output
        transaction.transaction_type = classify_type(Some(raw_type));
    }
    if let Some(category) = req.category {
        transaction.category = category;
    }
    transaction.updated_at = chrono::Utc::now().timestamp();

    let updated = db::update_for_user(db.async_connection.clone(), &transaction)
        .await
        .map_err(ApiError::Internal)?;
    if !updated {
        return Err(ApiError::NotFound("Transaction not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Transaction updated",
        "transaction": transaction,
    })))
}

pub async fn delete_transaction(
    db: web::Data<Arc<Database>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let deleted = db::delete_for_user(db.async_connection.clone(), user.id, *path)
        .await
        .map_err(ApiError::Internal)?;

    if !deleted {
        return Err(ApiError::NotFound("Transaction not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Transaction deleted",
    })))
}
