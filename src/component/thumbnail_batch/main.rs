use crate::config::Config;
use crate::signal::reset_shutdown_signal;
use crate::tools::{ThumbnailGenerator, VideoFileInfo, scan_video_files, validate_directory_exists};
use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// 批次產生結果
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub total_videos: usize,
    pub successful: usize,
    pub failed: usize,
    /// 因中斷而未處理
    pub skipped: usize,
}

pub struct ThumbnailBatch {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ThumbnailBatch {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 批次產生縮圖 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let directory = PathBuf::from(&input_path);
        validate_directory_exists(&directory)?;

        println!("{}", style("掃描影片檔案中...").dim());
        let video_files = scan_video_files(&directory)?;

        if video_files.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("找到 {} 個影片檔案", video_files.len())).green()
        );

        let generator =
            ThumbnailGenerator::from_config(&self.config).context("無法建立縮圖產生器")?;
        println!(
            "{}",
            style(format!("快取位置: {}", generator.cache().root().display())).dim()
        );

        reset_shutdown_signal(&self.shutdown_signal);
        let result = Self::generate_all(&generator, &video_files, &self.shutdown_signal);
        self.print_summary(&result);

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入影片資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    /// 平行產生縮圖，每部影片各自啟動一個擷取程序
    pub fn generate_all(
        generator: &ThumbnailGenerator,
        videos: &[VideoFileInfo],
        shutdown_signal: &AtomicBool,
    ) -> BatchResult {
        let progress_bar = ProgressBar::new(videos.len() as u64);
        progress_bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        progress_bar.set_message("產生縮圖中...");

        let successful = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);

        videos.par_iter().for_each(|video| {
            if shutdown_signal.load(Ordering::SeqCst) {
                skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }

            match generator.generate(&video.path) {
                Ok(_) => {
                    successful.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    error!("縮圖產生失敗 {}: {e}", video.path.display());
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }

            progress_bar.inc(1);
        });

        progress_bar.finish_with_message("完成");

        BatchResult {
            total_videos: videos.len(),
            successful: successful.into_inner(),
            failed: failed.into_inner(),
            skipped: skipped.into_inner(),
        }
    }

    fn print_summary(&self, result: &BatchResult) {
        println!();
        println!("{}", style("=== 縮圖產生摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", result.total_videos);
        println!("  成功: {} 個", style(result.successful).green());
        if result.failed > 0 {
            println!("  失敗: {} 個", style(result.failed).red());
        }
        if result.skipped > 0 {
            println!("  略過: {} 個", style(result.skipped).yellow());
        }

        info!(
            "縮圖產生完成 - 成功: {}, 失敗: {}, 略過: {}",
            result.successful, result.failed, result.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThumbnailSettings;
    use crate::tools::ThumbnailCache;
    use tempfile::TempDir;

    #[test]
    fn test_shutdown_skips_everything() {
        let dir = TempDir::new().unwrap();
        let generator = ThumbnailGenerator::new(
            ThumbnailCache::new(dir.path().join("thumbnails")),
            "/nonexistent/ffmpeg",
            ThumbnailSettings::default(),
        );
        let videos = vec![
            VideoFileInfo {
                path: PathBuf::from("/v/a.mp4"),
                size: 1,
            },
            VideoFileInfo {
                path: PathBuf::from("/v/b.mp4"),
                size: 2,
            },
        ];

        let result = ThumbnailBatch::generate_all(&generator, &videos, &AtomicBool::new(true));
        assert_eq!(
            result,
            BatchResult {
                total_videos: 2,
                successful: 0,
                failed: 0,
                skipped: 2,
            }
        );
    }

    #[test]
    fn test_missing_tool_counts_failures() {
        let dir = TempDir::new().unwrap();
        let generator = ThumbnailGenerator::new(
            ThumbnailCache::new(dir.path().join("thumbnails")),
            "/nonexistent/ffmpeg",
            ThumbnailSettings::default(),
        );
        let videos = vec![VideoFileInfo {
            path: PathBuf::from("/v/a.mp4"),
            size: 1,
        }];

        let result = ThumbnailBatch::generate_all(&generator, &videos, &AtomicBool::new(false));
        assert_eq!(result.failed, 1);
        assert_eq!(result.successful, 0);
    }
}
