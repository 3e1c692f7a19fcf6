use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const APP_NAME: &str = "clip_preview";

/// 外部工具的執行檔路徑，可為 PATH 上的名稱或絕對路徑
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// 畫面擷取工具（ffmpeg）
    pub encoder: PathBuf,
    /// 媒體探測工具（ffprobe）
    pub probe: PathBuf,
    /// 獨立播放器（ffplay）
    pub player: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            encoder: PathBuf::from("ffmpeg"),
            probe: PathBuf::from("ffprobe"),
            player: PathBuf::from("ffplay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// 快取資料夾使用的應用程式名稱
    pub app_name: String,
    /// 縮圖寬度上限（高度依比例）
    pub width: u32,
    /// 首選擷取時間點（秒），避開開頭的全黑畫面
    pub primary_timestamp: u32,
    /// 短片的備援時間點（秒）
    pub fallback_timestamp: u32,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            width: 400,
            primary_timestamp: 1,
            fallback_timestamp: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub pane_width: u32,
    pub pane_height: u32,
    /// 送出終止信號後輪詢程序狀態的間隔
    pub stop_poll_interval_ms: u64,
    /// 輪詢次數上限，超過後強制結束
    pub stop_poll_attempts: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            window_title: "Clip Preview".to_string(),
            window_width: 1280,
            window_height: 720,
            pane_width: 640,
            pane_height: 360,
            stop_poll_interval_ms: 20,
            stop_poll_attempts: 25,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub tools: ToolPaths,
    pub thumbnail: ThumbnailSettings,
    pub playback: PlaybackSettings,
    /// 擷取工具的候選安裝位置，空白時使用內建清單
    pub tool_locations: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
    /// 內建的擷取工具候選位置
    pub default_tool_locations: Vec<PathBuf>,
}

impl Config {
    /// 使用者設定優先，否則回到內建清單
    #[must_use]
    pub fn tool_locations(&self) -> &[PathBuf] {
        if self.settings.tool_locations.is_empty() {
            &self.default_tool_locations
        } else {
            &self.settings.tool_locations
        }
    }
}
