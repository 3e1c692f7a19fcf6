use crate::config::Config;
use crate::tools::{PlaybackController, StopOutcome, is_supported_path};
use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::Input;
use std::path::PathBuf;

/// 以獨立播放器視窗播放影片
pub struct FullWindowPlayer {
    config: Config,
}

impl FullWindowPlayer {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self, term: &Term) -> Result<()> {
        println!("{}", style("=== 全視窗播放 ===").cyan().bold());

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

        let mut controller = PlaybackController::from(&self.config);
        let process = controller.start_full_window(&path)?;

        println!("{}", style("按 Enter 停止播放").dim());
        term.read_line()?;

        let message = match controller.stop(process, None) {
            StopOutcome::AlreadyExited => "播放器已自行結束",
            StopOutcome::Graceful => "播放器已關閉",
            StopOutcome::Killed => "播放器未回應，已強制結束",
        };
        println!("{}", style(message).green());
        Ok(())
    }
}
