use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// 編譯時嵌入的擷取工具候選位置（不需要外部檔案）
const TOOL_LOCATIONS_JSON: &str = include_str!("../data/tool_locations.json");

pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_path(Path::new(SETTINGS_FILE))
    }

    /// 讀取指定的設定檔；檔案不存在或格式錯誤時使用預設值
    pub fn from_path(path: &Path) -> Result<Self> {
        let default_tool_locations = Self::load_embedded_tool_locations()?;
        let settings = Self::load_settings(path).unwrap_or_else(|e| {
            warn!("設定檔無法使用，改用預設值: {e:#}");
            UserSettings::default()
        });

        Ok(Self {
            settings,
            default_tool_locations,
        })
    }

    fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    fn load_embedded_tool_locations() -> Result<Vec<PathBuf>> {
        serde_json::from_str(TOOL_LOCATIONS_JSON).context("無法解析嵌入的工具位置清單")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_path(&dir.path().join("settings.json")).unwrap();

        assert_eq!(config.settings.tools.encoder, PathBuf::from("ffmpeg"));
        assert_eq!(config.settings.thumbnail.width, 400);
        assert_eq!(config.settings.playback.stop_poll_interval_ms, 20);
        assert!(!config.tool_locations().is_empty());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "tools": { "encoder": "/opt/ffmpeg/bin/ffmpeg" }, "tool_locations": ["/x/ffmpeg"] }"#,
        )
        .unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(
            config.settings.tools.encoder,
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg")
        );
        assert_eq!(config.settings.tools.probe, PathBuf::from("ffprobe"));
        assert_eq!(config.tool_locations(), &[PathBuf::from("/x/ffmpeg")]);
    }

    #[test]
    fn test_broken_settings_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.settings.playback.stop_poll_attempts, 25);
    }
}
