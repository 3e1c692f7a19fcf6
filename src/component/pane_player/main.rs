use crate::config::Config;
use crate::signal::reset_shutdown_signal;
use crate::tools::{InPaneSession, PlaybackController, StopOutcome, is_supported_path};
use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::Input;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// 讀取端預先準備的畫面緩衝區數量
const FRAME_QUEUE: usize = 2;

/// 等待下一格畫面時檢查中斷旗標的間隔
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct PlaybackStats {
    pub frames: u64,
    pub elapsed: Duration,
    pub fps: f64,
    /// 使用者中斷，而非串流自然結束
    pub cancelled: bool,
    pub stop_outcome: StopOutcome,
}

pub struct PanePlayer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl PanePlayer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 內嵌播放 ===").cyan().bold());

        let path = self.prompt_video_path()?;
        let playback = &self.config.settings.playback;
        let width: u32 = Input::new()
            .with_prompt("畫面寬度")
            .default(playback.pane_width)
            .interact_text()?;
        let height: u32 = Input::new()
            .with_prompt("畫面高度")
            .default(playback.pane_height)
            .interact_text()?;

        reset_shutdown_signal(&self.shutdown_signal);
        let mut controller = PlaybackController::from(&self.config);
        let session = controller.start_in_pane(&path, width, height)?;

        println!(
            "{}",
            style(format!(
                "播放中 {width}x{height} @ {:.2} fps，按 Ctrl-C 停止",
                session.fps
            ))
            .dim()
        );

        let term = Term::stdout();
        let stats = Self::stream(
            &mut controller,
            session,
            &self.shutdown_signal,
            |_, index| {
                if index % 30 == 0 {
                    let _ = term.clear_line();
                    let _ = term.write_str(&format!("  已顯示 {index} 格"));
                }
            },
        );
        println!();

        Self::print_summary(&stats);
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

    /// 播放直到串流結束或收到中斷
    ///
    /// 讀取在背景執行緒進行，緩衝區透過通道循環使用。停止時先終止程序，
    /// 生產端關閉後讀取端自然觀察到 EOF。
    pub fn stream<F>(
        controller: &mut PlaybackController,
        session: InPaneSession,
        shutdown_signal: &AtomicBool,
        mut on_frame: F,
    ) -> PlaybackStats
    where
        F: FnMut(&[u8], u64),
    {
        let InPaneSession {
            mut pipe,
            process,
            fps,
        } = session;
        let frame_len = pipe.frame_len();

        let (filled_tx, filled_rx) = mpsc::sync_channel::<Vec<u8>>(FRAME_QUEUE);
        let (empty_tx, empty_rx) = mpsc::channel::<Vec<u8>>();
        for _ in 0..=FRAME_QUEUE {
            let _ = empty_tx.send(vec![0u8; frame_len]);
        }

        let reader = thread::spawn(move || {
            while let Ok(mut buffer) = empty_rx.recv() {
                if !pipe.read_frame(&mut buffer) {
                    debug!("畫面串流結束");
                    break;
                }
                if filled_tx.send(buffer).is_err() {
                    break;
                }
            }
        });

        let started = Instant::now();
        let mut frames = 0u64;
        let mut cancelled = false;

        loop {
            if shutdown_signal.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }

            match filled_rx.recv_timeout(RECV_TIMEOUT) {
                Ok(buffer) => {
                    let due = started + Duration::from_secs_f64(frames as f64 / fps);
                    if let Some(wait) = due.checked_duration_since(Instant::now()) {
                        thread::sleep(wait);
                    }
                    on_frame(&buffer, frames);
                    frames += 1;
                    let _ = empty_tx.send(buffer);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // 管線由讀取執行緒持有，先終止程序，讀取端隨後觀察到 EOF
        let stop_outcome = controller.stop(process, None);
        drop(filled_rx);
        drop(empty_tx);
        let _ = reader.join();

        let stats = PlaybackStats {
            frames,
            elapsed: started.elapsed(),
            fps,
            cancelled,
            stop_outcome,
        };
        info!(
            "內嵌播放結束: {} 格, {:.1}s, 中斷: {}",
            stats.frames,
            stats.elapsed.as_secs_f64(),
            stats.cancelled
        );
        stats
    }

    fn print_summary(stats: &PlaybackStats) {
        println!("{}", style("=== 播放摘要 ===").cyan().bold());
        println!("  畫面數: {}", stats.frames);
        println!("  時間: {:.1}s (來源 {:.2} fps)", stats.elapsed.as_secs_f64(), stats.fps);
        if stats.cancelled {
            println!("  {}", style("已由使用者中斷").yellow());
        }
    }
}
