use crate::config::Config;
use crate::tools::{MediaMetadata, MediaProbe, ThumbnailGenerator, is_supported_path};
use anyhow::{Result, bail};
use console::style;
use dialoguer::Input;
use log::warn;
use std::path::{Path, PathBuf};

/// 以 `HH:MM:SS` 顯示長度，未知時顯示 `--:--:--`
#[must_use]
pub fn format_duration(duration: Option<f64>) -> String {
    match duration {
        Some(secs) if secs > 0.0 => {
            let total = secs.round() as u64;
            format!(
                "{:02}:{:02}:{:02}",
                total / 3600,
                (total % 3600) / 60,
                total % 60
            )
        }
        _ => "--:--:--".to_string(),
    }
}

pub struct MediaInspector {
    config: Config,
}

impl MediaInspector {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 媒體資訊 ===").cyan().bold());

        let path = self.prompt_video_path()?;
        let metadata = self.inspect(&path)?;
        Self::print_metadata(&path, &metadata);

        match ThumbnailGenerator::from_config(&self.config).and_then(|g| g.generate(&path)) {
            Ok(thumbnail) => println!("  縮圖: {}", style(thumbnail.display()).green()),
            Err(e) => {
                warn!("縮圖產生失敗: {e}");
                println!("  縮圖: {}", style(format!("無法產生 ({e})")).yellow());
            }
        }

        Ok(())
    }

    fn prompt_video_path(&self) -> Result<PathBuf> {
        let path: String = Input::new()
            .with_prompt("請輸入影片檔案路徑")
            .interact_text()?;
        let path = PathBuf::from(path.trim());

        if !path.is_file() {
            bail!("檔案不存在: {}", path.display());
        }
        if !is_supported_path(&path) {
            bail!("不支援的影片格式: {}", path.display());
        }
        Ok(path)
    }

    pub fn inspect(&self, path: &Path) -> Result<MediaMetadata> {
        let probe = MediaProbe::new(self.config.settings.tools.probe.clone());
        Ok(probe.metadata(path)?)
    }

    fn print_metadata(path: &Path, metadata: &MediaMetadata) {
        println!();
        println!(
            "{}",
            style(path.file_name().unwrap_or_default().to_string_lossy()).bold()
        );
        println!("  解析度: {}x{}", metadata.width, metadata.height);
        println!("  長度: {}", format_duration(metadata.duration));
        println!(
            "  編碼: {} ({}-bit)",
            metadata.codec_name.as_deref().unwrap_or("未知"),
            metadata.bit_depth
        );
        println!("  幀率: {:.2} fps", metadata.frame_rate);
    }
}
