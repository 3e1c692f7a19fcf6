use anyhow::{Result, bail};
use std::io;
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

/// 建立資料夾與所有上層資料夾
///
/// 其他程序同時建立同一路徑時，「已存在」一律視為成功。
pub fn ensure_directory_exists(path: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("c");

        ensure_directory_exists(&nested).unwrap();
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_directory_fails_on_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_directory_exists(&file.join("child")).is_err());
    }

    #[test]
    fn test_validate_directory_rejects_missing() {
        let dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(dir.path()).is_ok());
        assert!(validate_directory_exists(&dir.path().join("missing")).is_err());
    }
}
