use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file())
}

/// 依序檢查候選位置，回傳第一個存在且可執行的檔案
#[must_use]
pub fn locate_tool(candidates: &[PathBuf]) -> Option<PathBuf> {
    let found = candidates.iter().find(|path| is_executable(path)).cloned();
    match &found {
        Some(path) => debug!("找到外部工具: {}", path.display()),
        None => debug!("候選位置皆無可用的外部工具"),
    }
    found
}

#[must_use]
pub fn is_tool_available(candidates: &[PathBuf]) -> bool {
    locate_tool(candidates).is_some()
}
