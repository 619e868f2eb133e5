use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            email VARCHAR NOT NULL UNIQUE,
            password_hash VARCHAR NOT NULL,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create transactions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date BIGINT NOT NULL,
            amount REAL NOT NULL,
            description VARCHAR NOT NULL DEFAULT '',
            merchant VARCHAR NOT NULL DEFAULT '',
            type VARCHAR NOT NULL DEFAULT 'expense' CHECK (type IN ('income', 'expense')),
            category VARCHAR NOT NULL DEFAULT 'other',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
        [],
    )?;

    // Listing is always scoped by user and ordered by date
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, date)",
        [],
    )?;

    Ok(())
}
