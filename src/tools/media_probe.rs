use super::probe_parser::{
    DEFAULT_BIT_DEPTH, DEFAULT_FRAME_RATE, parse_codec_line, parse_duration, parse_frame_rate,
    parse_stream_line,
};
use super::process_supervisor::{ToolCommand, run_and_capture};
use crate::error::{MediaError, MediaResult};
use log::{debug, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMetadata {
    /// 影片長度（秒），0 表示未知
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedMetadata {
    pub codec_name: String,
    pub bit_depth: u32,
}

/// 完整媒體資訊，每次請求重新探測，不快取
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    pub duration: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub codec_name: Option<String>,
    pub bit_depth: u32,
    pub frame_rate: f64,
}

/// 使用 ffprobe 取得影片資訊
#[derive(Debug, Clone)]
pub struct MediaProbe {
    program: PathBuf,
}

impl MediaProbe {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn probe_command(&self, entries: &str, path: &Path) -> ToolCommand {
        ToolCommand::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-select_streams",
                "v:0",
                "-show_entries",
                entries,
                "-of",
                "csv=p=0",
            ])
            .arg(path)
    }

    fn probe(&self, entries: &str, path: &Path) -> MediaResult<String> {
        if path.as_os_str().is_empty() {
            return Err(MediaError::input_invalid("影片路徑為空"));
        }
        let output = run_and_capture(&self.probe_command(entries, path))?;
        debug!("ffprobe {entries}: {}", output.trim());
        Ok(output)
    }

    /// 寬、高與長度；串流層級沒有長度時改查容器層級
    pub fn basic_metadata(&self, path: &Path) -> MediaResult<BasicMetadata> {
        let output = self.probe("stream=width,height,duration", path)?;
        let line = parse_stream_line(&output).ok_or_else(|| {
            MediaError::tool_failure(format!("無法解析影片尺寸: {}", output.trim()))
        })?;

        let mut duration = line.duration.filter(|d| *d > 0.0).unwrap_or(0.0);
        if duration <= 0.0 {
            match self
                .probe("format=duration", path)
                .map(|out| parse_duration(&out))
            {
                Ok(Some(d)) => duration = d,
                Ok(None) => debug!("容器層級長度無法解析: {}", path.display()),
                Err(e) => debug!("容器層級長度查詢失敗: {e}"),
            }
        }

        Ok(BasicMetadata {
            duration,
            width: line.width,
            height: line.height,
        })
    }

    /// 編碼名稱（大寫）與位元深度
    pub fn extended_metadata(&self, path: &Path) -> MediaResult<ExtendedMetadata> {
        let output = self.probe("stream=codec_name,bits_per_raw_sample", path)?;
        let line = parse_codec_line(&output)
            .ok_or_else(|| MediaError::tool_failure("ffprobe 未回報編碼名稱"))?;

        Ok(ExtendedMetadata {
            codec_name: line.codec_name,
            bit_depth: line.bit_depth,
        })
    }

    pub fn frame_rate(&self, path: &Path) -> MediaResult<f64> {
        let output = self.probe("stream=r_frame_rate", path)?;
        parse_frame_rate(&output).ok_or_else(|| {
            MediaError::tool_failure(format!("無法解析幀率: {}", output.trim()))
        })
    }

    /// 失敗時回傳 [`DEFAULT_FRAME_RATE`]，顯示端永遠拿到合理的數值
    pub fn frame_rate_or_default(&self, path: &Path) -> f64 {
        self.frame_rate(path).unwrap_or_else(|e| {
            warn!("無法取得幀率，使用預設 {DEFAULT_FRAME_RATE}: {e}");
            DEFAULT_FRAME_RATE
        })
    }

    /// 合併三次探測；尺寸為必要，其餘失敗時使用預設值
    pub fn metadata(&self, path: &Path) -> MediaResult<MediaMetadata> {
        let basic = self.basic_metadata(path)?;
        let extended = self
            .extended_metadata(path)
            .map_err(|e| warn!("無法取得編碼資訊: {e}"))
            .ok();

        Ok(MediaMetadata {
            duration: (basic.duration > 0.0).then_some(basic.duration),
            width: basic.width,
            height: basic.height,
            bit_depth: extended
                .as_ref()
                .map_or(DEFAULT_BIT_DEPTH, |ext| ext.bit_depth),
            codec_name: extended.map(|ext| ext.codec_name),
            frame_rate: self.frame_rate_or_default(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_command_shape() {
        let probe = MediaProbe::new("ffprobe");
        let cmd = probe.probe_command("stream=r_frame_rate", Path::new("/v/a.mp4"));
        assert_eq!(
            cmd.to_string(),
            "ffprobe -v quiet -select_streams v:0 -show_entries stream=r_frame_rate -of csv=p=0 /v/a.mp4"
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let probe = MediaProbe::new("/nonexistent/ffprobe");
        assert!(matches!(
            probe.basic_metadata(Path::new("")),
            Err(MediaError::InputInvalid(_))
        ));
    }

    #[test]
    fn test_frame_rate_default_on_failure() {
        let probe = MediaProbe::new("/nonexistent/ffprobe");
        let path = Path::new("/videos/a.mp4");
        assert!(probe.frame_rate(path).is_err());
        assert!((probe.frame_rate_or_default(path) - DEFAULT_FRAME_RATE).abs() < f64::EPSILON);
    }
}
