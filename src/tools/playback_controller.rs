//! 播放控制
//!
//! 兩種模式：
//! - 全視窗：啟動獨立播放器，不建立管線
//! - 內嵌（in-pane）：ffmpeg 解碼為 RGB24 原始畫面寫入標準輸出，呼叫端逐格讀取
//!
//! 內嵌模式不做節流，畫面解碼後立即輸出，播放節奏由呼叫端控制。
//! 管線本身提供背壓：呼叫端未讀取前，生產端會被阻塞。

use super::media_probe::MediaProbe;
use super::process_supervisor::{
    ChildProcess, StopOutcome, StopPolicy, ToolCommand, spawn_detached, spawn_piped,
};
use crate::config::{Config, PlaybackSettings, ToolPaths};
use crate::error::{MediaError, MediaResult};
use log::{debug, info};
use std::io::{self, Read};
use std::path::Path;
use std::process::ChildStdout;

/// RGB24 每個像素的位元組數
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Spawned,
    Streaming,
    Stopped,
}

#[must_use]
pub fn frame_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

/// 將剛好一格畫面讀入緩衝區
///
/// 短讀會持續累積；在畫面完整前遇到 EOF 或錯誤即回傳 [`MediaError::StreamEnded`]，
/// 不完整的尾端資料直接捨棄。
pub fn fill_frame<R: Read>(reader: &mut R, buffer: &mut [u8]) -> MediaResult<()> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => return Err(MediaError::StreamEnded),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                debug!("畫面讀取錯誤: {e}");
                return Err(MediaError::StreamEnded);
            }
        }
    }
    Ok(())
}

/// 讀取一格 `width * height * 3` 位元組的畫面，串流結束或尺寸不符時回傳 `false`
pub fn read_frame_from<R: Read>(
    reader: &mut R,
    buffer: &mut [u8],
    width: u32,
    height: u32,
) -> bool {
    let expected = frame_len(width, height);
    if expected == 0 || buffer.len() != expected {
        return false;
    }
    fill_frame(reader, buffer).is_ok()
}

/// 內嵌播放的管線讀取端
#[derive(Debug)]
pub struct FrameReader<R = ChildStdout> {
    pipe: R,
    width: u32,
    height: u32,
}

impl<R: Read> FrameReader<R> {
    pub const fn new(pipe: R, width: u32, height: u32) -> Self {
        Self {
            pipe,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn frame_len(&self) -> usize {
        frame_len(self.width, self.height)
    }

    /// 阻塞讀取下一格畫面；回傳 `false` 表示播放結束
    pub fn read_frame(&mut self, buffer: &mut [u8]) -> bool {
        read_frame_from(&mut self.pipe, buffer, self.width, self.height)
    }
}

/// 內嵌播放工作階段
#[derive(Debug)]
pub struct InPaneSession {
    pub pipe: FrameReader,
    pub process: ChildProcess,
    /// 來源幀率，探測失敗時為預設值
    pub fps: f64,
}

pub struct PlaybackController {
    tools: ToolPaths,
    settings: PlaybackSettings,
    probe: MediaProbe,
    state: PlaybackState,
}

impl PlaybackController {
    #[must_use]
    pub fn new(tools: ToolPaths, settings: PlaybackSettings) -> Self {
        let probe = MediaProbe::new(tools.probe.clone());
        Self {
            tools,
            settings,
            probe,
            state: PlaybackState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    fn stop_policy(&self) -> StopPolicy {
        StopPolicy::from(&self.settings)
    }

    fn player_command(&self, path: &Path) -> ToolCommand {
        ToolCommand::new(&self.tools.player)
            .args(["-autoexit", "-window_title"])
            .arg(&self.settings.window_title)
            .arg("-x")
            .arg(self.settings.window_width.to_string())
            .arg("-y")
            .arg(self.settings.window_height.to_string())
            .arg(path)
    }

    fn stream_command(&self, path: &Path, width: u32, height: u32) -> ToolCommand {
        ToolCommand::new(&self.tools.encoder)
            .arg("-i")
            .arg(path)
            .args(["-an", "-vf"])
            .arg(format!("scale={width}:{height}"))
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-vsync", "0", "-"])
    }

    /// 以獨立視窗播放，呼叫端稍後需呼叫 [`Self::stop`]
    pub fn start_full_window(&mut self, path: &Path) -> MediaResult<ChildProcess> {
        if path.as_os_str().is_empty() {
            return Err(MediaError::input_invalid("影片路徑為空"));
        }

        let process = spawn_detached(&self.player_command(path), self.stop_policy())?;
        info!("全視窗播放 [{}]: {}", process.id(), path.display());
        self.state = PlaybackState::Spawned;
        Ok(process)
    }

    /// 啟動內嵌播放，輸出為指定尺寸的 RGB24 原始畫面
    ///
    /// 幀率查詢失敗不影響播放，`fps` 會是預設值。
    pub fn start_in_pane(
        &mut self,
        path: &Path,
        width: u32,
        height: u32,
    ) -> MediaResult<InPaneSession> {
        if path.as_os_str().is_empty() {
            return Err(MediaError::input_invalid("影片路徑為空"));
        }
        if width == 0 || height == 0 {
            return Err(MediaError::input_invalid(format!(
                "畫面尺寸無效: {width}x{height}"
            )));
        }

        let fps = self.probe.frame_rate_or_default(path);
        let (process, stdout) =
            spawn_piped(&self.stream_command(path, width, height), self.stop_policy())?;

        info!(
            "內嵌播放 [{}]: {} ({width}x{height}, {fps:.2} fps)",
            process.id(),
            path.display()
        );
        self.state = PlaybackState::Streaming;

        Ok(InPaneSession {
            pipe: FrameReader::new(stdout, width, height),
            process,
            fps,
        })
    }

    /// 停止播放：先關閉管線，再以兩階段方式終止程序
    pub fn stop(&mut self, process: ChildProcess, pipe: Option<FrameReader>) -> StopOutcome {
        drop(pipe);
        let pid = process.id();
        let outcome = process.stop();
        info!("播放已停止 [{pid}]: {outcome:?}");
        self.state = PlaybackState::Stopped;
        outcome
    }
}

impl From<&Config> for PlaybackController {
    fn from(config: &Config) -> Self {
        Self::new(
            config.settings.tools.clone(),
            config.settings.playback.clone(),
        )
    }
}
