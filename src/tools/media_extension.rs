use std::path::Path;

/// 支援的影片副檔名（小寫、不含點）
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp4", "mov", "mkv", "avi", "webm", "m4v"];

/// 不分大小寫，可帶前導點，例如 `"MP4"`、`".mov"`
#[must_use]
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    !ext.is_empty()
        && SUPPORTED_EXTENSIONS
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(ext))
}

/// 沒有副檔名的路徑一律不支援
#[must_use]
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension)
}
