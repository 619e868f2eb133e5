use crate::config::ApiConfig;
use std::path::PathBuf;

/// Returns the path to the fintrack database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/fintrack/db.sqlite3`
/// - **Linux**: `~/.local/share/fintrack/db.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\fintrack\db.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("fintrack").join("db.sqlite3"))
}

/// Initialize the database connection, honoring a configured path override
pub fn initialize_database(
    config: &ApiConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = match config.storage.as_ref().and_then(|s| s.db_path.clone()) {
        Some(path) => path,
        None => get_db_path()?,
    };

    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}
