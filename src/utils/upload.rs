use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::{fs, io::AsyncWriteExt};

use crate::error::{Error, Result};

/// Accepts a CSV either by declared content type or by `.csv` file name.
pub fn is_csv(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("text/csv"))
        .unwrap_or(false);
    let by_name = file_name
        .map(|name| name.to_lowercase().ends_with(".csv"))
        .unwrap_or(false);
    by_type || by_name
}

/// Keeps only characters that are safe in a file name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload.csv".to_string()
    } else {
        cleaned
    }
}

/// Streams a multipart field to `<dir>/<millis>-<name>` chunk by chunk.
pub async fn stage_field(dir: &Path, mut field: Field<'_>) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;

    let file_name = sanitize_file_name(field.file_name().unwrap_or("upload.csv"));
    let path = dir.join(format!(
        "{}-{}-{}",
        crate::utils::time::now_millis(),
        &uuid::Uuid::new_v4().simple().to_string()[..8],
        file_name
    ));

    let mut file = fs::File::create(&path).await?;
    let written = async {
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok::<_, Error>(())
    }
    .await;

    if let Err(err) = written {
        discard(&path).await;
        return Err(err);
    }
    Ok(path)
}

/// Best-effort removal of a staged upload.
pub async fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove staged upload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_detected_by_type_or_extension() {
        assert!(is_csv(Some("text/csv"), Some("questions.txt")));
        assert!(is_csv(Some("text/csv; charset=utf-8"), None));
        assert!(is_csv(Some("application/octet-stream"), Some("Questions.CSV")));
        assert!(!is_csv(Some("application/json"), Some("questions.json")));
        assert!(!is_csv(None, None));
    }

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my questions.csv"), "my_questions.csv");
        assert_eq!(sanitize_file_name(".."), "upload.csv");
    }
}
