use crate::database::AsyncDbConnection;
use anyhow::Result;
use fintrack_types::User;
use rusqlite::OptionalExtension;

/// Insert a new user and return it
pub async fn insert_user(
    conn: AsyncDbConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO users (name, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4) RETURNING id",
        rusqlite::params![name, email, password_hash, now],
        |row| row.get(0),
    )?;

    Ok(User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        created_at: now,
    })
}

/// Look up a user by email, returning the stored password hash alongside
pub async fn find_by_email(conn: AsyncDbConnection, email: &str) -> Result<Option<(User, String)>> {
    let conn = conn.lock().await;

    let row = conn
        .query_row(
            "SELECT id, name, email, password_hash, created_at
                FROM users WHERE email = ?1",
            [email],
            |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: row.get(4)?,
                    },
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn test_db() -> (tempfile::TempDir, AsyncDbConnection) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.sqlite3")).unwrap();
        (dir, db.async_connection)
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let (_dir, conn) = test_db().await;

        let user = insert_user(conn.clone(), "Ada", "ada@example.com", "hash")
            .await
            .unwrap();

        let (found, hash) = find_by_email(conn, "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Ada");
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn unknown_email_finds_nothing() {
        let (_dir, conn) = test_db().await;
        assert!(find_by_email(conn, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, conn) = test_db().await;

        insert_user(conn.clone(), "Ada", "ada@example.com", "hash")
            .await
            .unwrap();
        let err = insert_user(conn, "Ada Again", "ada@example.com", "hash2").await;
        assert!(err.is_err());
    }
}
