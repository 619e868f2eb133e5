use std::path::Path;

/// Failure while turning an uploaded statement into text. These are fatal
/// for the request and never retried.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read statement file: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("Failed to extract text from PDF: {0}")]
    CorruptPdf(#[from] pdf_extract::OutputError),
}

/// Extract the plain text of an uploaded statement.
///
/// Dispatch is on the declared extension only, not on file content — a
/// renamed binary will reach the PDF decoder (or be fed to the model as
/// garbage text) without being detected here.
pub fn read_statement(path: &Path, extension: &str) -> Result<String, StatementError> {
    match extension {
        "pdf" => {
            let bytes = std::fs::read(path)?;
            Ok(pdf_extract::extract_text_from_mem(&bytes)?)
        }
        "csv" | "txt" => Ok(std::fs::read_to_string(path)?),
        other => Err(StatementError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_txt_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "01/02/2024,COFFEE SHOP,-4.50").unwrap();

        let text = read_statement(file.path(), "txt").unwrap();
        assert_eq!(text, "01/02/2024,COFFEE SHOP,-4.50");
    }

    #[test]
    fn reads_csv_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "date,amount\n2024-01-01,100").unwrap();

        let text = read_statement(file.path(), "csv").unwrap();
        assert_eq!(text, "date,amount\n2024-01-01,100");
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = read_statement(file.path(), "xlsx").unwrap_err();
        assert!(matches!(err, StatementError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = read_statement(Path::new("/nonexistent/statement.txt"), "txt").unwrap_err();
        assert!(matches!(err, StatementError::Unreadable(_)));
    }
}
