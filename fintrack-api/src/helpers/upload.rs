use crate::errors::ApiError;
use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File types accepted for statement uploads, by declared extension
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "csv", "txt"];

/// An uploaded statement written to disk, owned by the handling request
#[derive(Debug)]
pub struct SavedStatement {
    pub path: PathBuf,
    pub extension: String,
}

/// Lower-cased extension of an uploaded filename, if it has one
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Drain the multipart payload and write the `statement` field to the
/// upload directory. Returns `None` when no statement field is present.
pub async fn save_statement(
    mut payload: Multipart,
    upload_dir: &Path,
) -> Result<Option<SavedStatement>, ApiError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != "statement" {
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("Statement file has no filename".to_string()))?;

        let extension = file_extension(&filename)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| ApiError::Validation("Unsupported file format".to_string()))?;

        let mut content = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
        {
            content.extend_from_slice(&chunk);
        }

        std::fs::create_dir_all(upload_dir)
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

        let path = upload_dir.join(format!("{}.{}", Uuid::new_v4(), extension));
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

        return Ok(Some(SavedStatement { path, extension }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(file_extension("Statement.PDF").as_deref(), Some("pdf"));
        assert_eq!(file_extension("jan-2024.csv").as_deref(), Some("csv"));
    }

    #[test]
    fn last_extension_wins() {
        assert_eq!(file_extension("archive.tar.txt").as_deref(), Some("txt"));
    }

    #[test]
    fn no_extension_is_none() {
        assert_eq!(file_extension("statement"), None);
        assert_eq!(file_extension("statement."), None);
    }

    #[test]
    fn allowed_list_matches_accepted_types() {
        for ext in ["pdf", "csv", "txt"] {
            assert!(ALLOWED_EXTENSIONS.contains(&ext));
        }
        assert!(!ALLOWED_EXTENSIONS.contains(&"xlsx"));
    }
}
