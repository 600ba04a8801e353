//! Utility functions for file system validation, atomic writes, and log
//! truncation.

use std::error::Error;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// User-agent sent with every outbound HTTP request.
pub const USER_AGENT: &str = concat!("headline_digest/", env!("CARGO_PKG_VERSION"));

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte
/// count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Write `bytes` to `path` via a sibling temp file and an atomic rename.
///
/// A crashed or failing run leaves the prior file contents intact; the
/// final path never holds a partial write.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data");
        let target_str = target.to_str().unwrap();

        ensure_writable_dir(target_str).await.unwrap();
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(stdfs::read_to_string(&path).unwrap(), "second");
        // No temp file is left behind after a successful rename.
        assert!(!dir.path().join("out.txt.tmp").exists());
    }
}
