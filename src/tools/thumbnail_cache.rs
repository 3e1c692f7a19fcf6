use super::path_hasher::hash_path;
use super::path_validator::ensure_directory_exists;
use crate::error::{MediaError, MediaResult};
use std::fs;
use std::path::{Path, PathBuf};

/// 快取檔案的副檔名
pub const THUMBNAIL_EXTENSION: &str = "png";

/// 以路徑雜湊為檔名的磁碟縮圖快取
///
/// 有效性只看檔案是否存在且非空，來源檔案變更不會使快取失效。
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    root: PathBuf,
}

impl ThumbnailCache {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<home>/.cache/<app_name>/thumbnails`，無法取得家目錄時回傳 `None`
    #[must_use]
    pub fn for_app(app_name: &str) -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::new(
            home.join(".cache").join(app_name).join("thumbnails"),
        ))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 計算影片對應的快取檔路徑；空路徑無法快取
    #[must_use]
    pub fn resolve(&self, video_path: &Path) -> Option<PathBuf> {
        let key = hash_path(video_path.as_os_str().as_encoded_bytes())?;
        Some(self.root.join(format!("{key}.{THUMBNAIL_EXTENSION}")))
    }

    pub fn ensure_directory(&self) -> MediaResult<()> {
        ensure_directory_exists(&self.root).map_err(|e| {
            MediaError::resource(format!("無法建立快取資料夾 {}", self.root.display()), e)
        })
    }

    /// 存在且大小大於零才算有效，部分失敗留下的空檔視為無效
    #[must_use]
    pub fn is_fresh(path: &Path) -> bool {
        fs::metadata(path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }
}
