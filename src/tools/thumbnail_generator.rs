use super::process_supervisor::{ToolCommand, run_and_wait};
use super::thumbnail_cache::ThumbnailCache;
use crate::config::{Config, ThumbnailSettings};
use crate::error::{MediaError, MediaResult};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// 以 `HH:MM:SS` 表示秒數
#[must_use]
pub fn format_timestamp(seconds: u32) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// 擷取單張縮圖並寫入快取
#[derive(Debug, Clone)]
pub struct ThumbnailGenerator {
    cache: ThumbnailCache,
    encoder: PathBuf,
    settings: ThumbnailSettings,
}

impl ThumbnailGenerator {
    #[must_use]
    pub fn new(
        cache: ThumbnailCache,
        encoder: impl Into<PathBuf>,
        settings: ThumbnailSettings,
    ) -> Self {
        Self {
            cache,
            encoder: encoder.into(),
            settings,
        }
    }

    /// 快取位於 `<home>/.cache/<app_name>/thumbnails`
    pub fn from_config(config: &Config) -> MediaResult<Self> {
        let thumbnail = &config.settings.thumbnail;
        let cache = ThumbnailCache::for_app(&thumbnail.app_name)
            .ok_or_else(|| MediaError::input_invalid("無法取得家目錄，縮圖快取不可用"))?;
        Ok(Self::new(
            cache,
            config.settings.tools.encoder.clone(),
            thumbnail.clone(),
        ))
    }

    #[must_use]
    pub const fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// 縮圖寬度不超過來源寬度，高度依比例
    fn scale_filter(&self) -> String {
        format!("scale='min({},iw)':-1", self.settings.width)
    }

    fn extract_command(&self, video_path: &Path, timestamp: u32, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.encoder)
            .arg("-y")
            .arg("-i")
            .arg(video_path)
            .arg("-ss")
            .arg(format_timestamp(timestamp))
            .args(["-frames:v", "1", "-vf"])
            .arg(self.scale_filter())
            .arg(output)
    }

    fn extract_at(&self, video_path: &Path, timestamp: u32, output: &Path) -> MediaResult<()> {
        run_and_wait(&self.extract_command(video_path, timestamp, output))?;

        if !ThumbnailCache::is_fresh(output) {
            return Err(MediaError::tool_failure(format!(
                "縮圖檔案未建立或為空: {}",
                output.display()
            )));
        }
        Ok(())
    }

    /// 取得影片縮圖路徑，快取命中時不啟動任何程序
    ///
    /// 先擷取第 1 秒的畫面，失敗時（例如影片不足 1 秒）改擷取第 0 秒。
    pub fn generate(&self, video_path: &Path) -> MediaResult<PathBuf> {
        let output = self
            .cache
            .resolve(video_path)
            .ok_or_else(|| MediaError::input_invalid("無法計算快取路徑"))?;

        if ThumbnailCache::is_fresh(&output) {
            debug!("縮圖快取命中: {}", output.display());
            return Ok(output);
        }

        self.cache.ensure_directory()?;

        if let Err(e) = self.extract_at(video_path, self.settings.primary_timestamp, &output) {
            warn!(
                "縮圖擷取失敗，改用 {}: {} ({e})",
                format_timestamp(self.settings.fallback_timestamp),
                video_path.display()
            );
            self.extract_at(video_path, self.settings.fallback_timestamp, &output)?;
        }

        info!("已產生縮圖: {} -> {}", video_path.display(), output.display());
        Ok(output)
    }
}
