use std::fs;
use std::path::Path;

use crate::{ApiError, DocumentInfo, DocumentUpload, FailureKind};

/// Reads name and size of a file the user picked. Sends nothing.
pub fn inspect_file(path: &Path) -> Result<DocumentInfo, ApiError> {
    let meta = fs::metadata(path).map_err(|e| local_error(path, e))?;
    if !meta.is_file() {
        return Err(ApiError::new(
            FailureKind::LocalFile,
            format!("{}: not a regular file", path.display()),
        ));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ApiError::new(
                FailureKind::LocalFile,
                format!("{}: path has no file name", path.display()),
            )
        })?;
    Ok(DocumentInfo {
        path: path.to_path_buf(),
        name,
        size_bytes: meta.len(),
    })
}

/// Reads the whole file for upload, refusing files above `max_bytes`.
pub async fn load_document(
    path: &Path,
    file_name: &str,
    max_bytes: Option<u64>,
) -> Result<DocumentUpload, ApiError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| local_error(path, e))?;
    if let Some(max_bytes) = max_bytes {
        if meta.len() > max_bytes {
            return Err(ApiError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: meta.len(),
                },
                format!("{file_name} is larger than {max_bytes} bytes"),
            ));
        }
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| local_error(path, e))?;
    Ok(DocumentUpload {
        file_name: file_name.to_string(),
        bytes,
    })
}

/// MIME type sent with the `file` part.
pub(crate) fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext);
    match ext {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn local_error(path: &Path, err: std::io::Error) -> ApiError {
    ApiError::new(FailureKind::LocalFile, format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::content_type_for;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert_eq!(content_type_for("report.PDF"), "application/pdf");
        assert_eq!(content_type_for("report.pdf"), "application/pdf");
    }

    #[test]
    fn unknown_or_missing_extension_is_octet_stream() {
        assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
