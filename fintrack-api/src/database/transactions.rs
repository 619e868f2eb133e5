use crate::database::AsyncDbConnection;
use anyhow::Result;
use fintrack_types::{NewTransaction, Transaction, TransactionType};
use rusqlite::OptionalExtension;

fn parse_type(value: &str) -> TransactionType {
    match value {
        "income" => TransactionType::Income,
        _ => TransactionType::Expense,
    }
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let type_str: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        merchant: row.get(5)?,
        transaction_type: parse_type(&type_str),
        category: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

const TRANSACTION_COLUMNS: &str =
    "id, user_id, date, amount, description, merchant, type, category, created_at, updated_at";

/// Bulk-insert a normalized batch inside one SQLite transaction:
/// either every record is stored or none is.
pub async fn insert_transactions(
    conn: AsyncDbConnection,
    records: &[NewTransaction],
) -> Result<Vec<Transaction>> {
    let mut conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    let mut stored = Vec::with_capacity(records.len());

    for record in records {
        let id: i64 = tx.query_row(
            "INSERT INTO transactions
                (user_id, date, amount, description, merchant, type, category, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                RETURNING id",
            rusqlite::params![
                record.user_id,
                record.date,
                record.amount,
                &record.description,
                &record.merchant,
                record.transaction_type.as_str(),
                &record.category,
                now,
                now,
            ],
            |row| row.get(0),
        )?;

        stored.push(Transaction {
            id,
            user_id: record.user_id,
            date: record.date,
            amount: record.amount,
            description: record.description.clone(),
            merchant: record.merchant.clone(),
            transaction_type: record.transaction_type,
            category: record.category.clone(),
            created_at: now,
            updated_at: now,
        });
    }

    tx.commit()?;

    Ok(stored)
}

/// List a user's transactions, newest first
pub async fn list_for_user(conn: AsyncDbConnection, user_id: i64) -> Result<Vec<Transaction>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE user_id = ?1 ORDER BY date DESC"
    ))?;

    let rows = stmt.query_map([user_id], row_to_transaction)?;

    let mut transactions = Vec::new();
    for row_result in rows {
        transactions.push(row_result?);
    }

    Ok(transactions)
}

pub async fn get_for_user(
    conn: AsyncDbConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<Option<Transaction>> {
    let conn = conn.lock().await;

    let transaction = conn
        .query_row(
            &format!(
                "SELECT {TRANSACTION_COLUMNS} FROM transactions
                    WHERE id = ?1 AND user_id = ?2"
            ),
            [transaction_id, user_id],
            row_to_transaction,
        )
        .optional()?;

    Ok(transaction)
}

/// Overwrite a stored transaction's mutable fields; scoped by owner
pub async fn update_for_user(conn: AsyncDbConnection, transaction: &Transaction) -> Result<bool> {
    let conn = conn.lock().await;

    let updated = conn.execute(
        "UPDATE transactions
            SET date = ?1, amount = ?2, description = ?3, merchant = ?4,
                type = ?5, category = ?6, updated_at = ?7
            WHERE id = ?8 AND user_id = ?9",
        rusqlite::params![
            transaction.date,
            transaction.amount,
            &transaction.description,
            &transaction.merchant,
            transaction.transaction_type.as_str(),
            &transaction.category,
            transaction.updated_at,
            transaction.id,
            transaction.user_id,
        ],
    )?;

    Ok(updated > 0)
}

pub async fn delete_for_user(
    conn: AsyncDbConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<bool> {
    let conn = conn.lock().await;

    let deleted = conn.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        [transaction_id, user_id],
    )?;

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{users, Database};

    async fn seeded_db() -> (tempfile::TempDir, AsyncDbConnection, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.sqlite3")).unwrap();
        let conn = db.async_connection;
        let user = users::insert_user(conn.clone(), "Ada", "ada@example.com", "hash")
            .await
            .unwrap();
        (dir, conn, user.id)
    }

    fn record(user_id: i64, amount: f64, transaction_type: TransactionType) -> NewTransaction {
        NewTransaction {
            user_id,
            date: 1704067200,
            amount,
            description: "test".to_string(),
            merchant: "test".to_string(),
            transaction_type,
            category: "other".to_string(),
        }
    }

    #[tokio::test]
    async fn batch_insert_returns_stored_rows() {
        let (_dir, conn, user_id) = seeded_db().await;

        let stored = insert_transactions(
            conn.clone(),
            &[
                record(user_id, 100.0, TransactionType::Income),
                record(user_id, 40.0, TransactionType::Expense),
            ],
        )
        .await
        .unwrap();

        assert_eq!(stored.len(), 2);
        assert!(stored[0].id > 0);

        let listed = list_for_user(conn, user_id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn empty_batch_stores_nothing() {
        let (_dir, conn, user_id) = seeded_db().await;

        let stored = insert_transactions(conn.clone(), &[]).await.unwrap();
        assert!(stored.is_empty());
        assert!(list_for_user(conn, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_row_rolls_back_the_whole_batch() {
        let (_dir, conn, user_id) = seeded_db().await;

        // second row violates the users foreign key
        let result = insert_transactions(
            conn.clone(),
            &[
                record(user_id, 100.0, TransactionType::Income),
                record(user_id + 999, 40.0, TransactionType::Expense),
            ],
        )
        .await;

        assert!(result.is_err());
        assert!(list_for_user(conn, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_is_scoped_by_user() {
        let (_dir, conn, user_id) = seeded_db().await;
        let other = users::insert_user(conn.clone(), "Eve", "eve@example.com", "hash")
            .await
            .unwrap();

        insert_transactions(conn.clone(), &[record(user_id, 10.0, TransactionType::Expense)])
            .await
            .unwrap();
        insert_transactions(conn.clone(), &[record(other.id, 20.0, TransactionType::Expense)])
            .await
            .unwrap();

        let listed = list_for_user(conn.clone(), user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 10.0);

        let theirs = list_for_user(conn, other.id).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].amount, 20.0);
    }

    #[tokio::test]
    async fn get_update_delete_are_scoped_by_user() {
        let (_dir, conn, user_id) = seeded_db().await;

        let stored = insert_transactions(
            conn.clone(),
            &[record(user_id, 10.0, TransactionType::Expense)],
        )
        .await
        .unwrap();
        let id = stored[0].id;

        // owner sees it, a stranger does not
        assert!(get_for_user(conn.clone(), user_id, id).await.unwrap().is_some());
        assert!(get_for_user(conn.clone(), user_id + 1, id)
            .await
            .unwrap()
            .is_none());

        let mut updated = stored[0].clone();
        updated.amount = 99.0;
        updated.transaction_type = TransactionType::Income;
        assert!(update_for_user(conn.clone(), &updated).await.unwrap());

        let fetched = get_for_user(conn.clone(), user_id, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.amount, 99.0);
        assert_eq!(fetched.transaction_type, TransactionType::Income);

        assert!(!delete_for_user(conn.clone(), user_id + 1, id).await.unwrap());
        assert!(delete_for_user(conn.clone(), user_id, id).await.unwrap());
        assert!(get_for_user(conn, user_id, id).await.unwrap().is_none());
    }
}
