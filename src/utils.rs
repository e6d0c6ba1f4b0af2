/// Utility functions used throughout the application

use std::path::{Path, PathBuf};

use crate::model::LocalFile;

/// Get platform-specific debug log path
pub fn get_debug_log_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("tgdrive-debug.log");
    path
}

/// Identifier the server echoes back with the upload's task
///
/// A random v4 UUID; if the random source panics, a timestamp string.
pub fn generate_client_id() -> String {
    match std::panic::catch_unwind(uuid::Uuid::new_v4) {
        Ok(id) => id.to_string(),
        Err(_) => {
            let now = chrono::Utc::now();
            now.timestamp_nanos_opt()
                .unwrap_or_else(|| now.timestamp_millis())
                .to_string()
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Look up a picked path, refusing anything that is not a regular file
pub fn local_file(path: &Path) -> std::io::Result<LocalFile> {
    let path = expand_home(path);
    let metadata = std::fs::metadata(&path)?;
    if !metadata.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    Ok(LocalFile {
        path,
        size: metadata.len(),
    })
}

/// Make a server-supplied name safe to use as a single path component
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// Create a new file for `name` in `dir`: `name`, then `stem (1).ext`, ...
///
/// Each candidate is opened with `create_new`, so an existing file (or one
/// another download just claimed) is never truncated.
pub async fn create_unique_file(
    dir: &Path,
    name: &str,
) -> std::io::Result<(PathBuf, tokio::fs::File)> {
    let name = sanitize_file_name(name);
    let as_path = Path::new(&name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());
    let ext = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 0u32;
    loop {
        let candidate = if n == 0 {
            dir.join(&name)
        } else {
            dir.join(format!("{} ({}){}", stem, n, ext))
        };

        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ids_are_unique() {
        let a = generate_client_id();
        let b = generate_client_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("a\nb.txt"), "a_b.txt");
        assert_eq!(sanitize_file_name(""), "download");
        assert_eq!(sanitize_file_name("..."), "download");
    }

    #[tokio::test]
    async fn test_create_unique_file_adds_counter() {
        let dir = tempfile::tempdir().unwrap();
        let (first, _) = create_unique_file(dir.path(), "report.pdf").await.unwrap();
        assert_eq!(first, dir.path().join("report.pdf"));

        // the first file is claimed even while still empty
        let (second, _) = create_unique_file(dir.path(), "report.pdf").await.unwrap();
        assert_eq!(second, dir.path().join("report (1).pdf"));

        let (third, _) = create_unique_file(dir.path(), "report.pdf").await.unwrap();
        assert_eq!(third, dir.path().join("report (2).pdf"));
    }

    #[tokio::test]
    async fn test_create_unique_file_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), b"keep me").unwrap();

        let (path, _) = create_unique_file(dir.path(), "README").await.unwrap();
        assert_eq!(path, dir.path().join("README (1)"));
        assert_eq!(std::fs::read(dir.path().join("README")).unwrap(), b"keep me");
    }

    #[test]
    fn test_local_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(local_file(dir.path()).is_err());

        let path = dir.path().join("a.bin");
        std::fs::write(&path, b"12345").unwrap();
        let file = local_file(&path).unwrap();
        assert_eq!(file.size, 5);
    }
}
