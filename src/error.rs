//! 媒體處理核心的錯誤分類
//!
//! 所有錯誤皆可復原：核心不會因任何外部工具或 I/O 失敗而中止宿主程序。

use std::io;
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    /// 缺少必要的路徑、尺寸或緩衝區，在任何 I/O 之前檢查
    #[error("輸入無效: {0}")]
    InputInvalid(String),

    /// 無法建立管線、啟動程序或建立資料夾
    #[error("{context}: {source}")]
    ResourceUnavailable {
        context: String,
        #[source]
        source: io::Error,
    },

    /// 外部工具已執行但以非零狀態結束，或輸出不足
    #[error("外部工具失敗: {0}")]
    ExternalToolFailure(String),

    /// 管線已關閉，畫面串流結束
    #[error("畫面串流已結束")]
    StreamEnded,

    #[error("參數數量 {count} 超過上限 {max}")]
    TooManyArguments { count: usize, max: usize },
}

impl MediaError {
    pub fn input_invalid(message: impl Into<String>) -> Self {
        Self::InputInvalid(message.into())
    }

    pub fn resource(context: impl Into<String>, source: io::Error) -> Self {
        Self::ResourceUnavailable {
            context: context.into(),
            source,
        }
    }

    pub fn tool_failure(message: impl Into<String>) -> Self {
        Self::ExternalToolFailure(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_error_keeps_source() {
        let err = MediaError::resource(
            "無法建立快取資料夾",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "denied");
        assert!(err.to_string().starts_with("無法建立快取資料夾"));
    }

    #[test]
    fn test_too_many_arguments_message() {
        let err = MediaError::TooManyArguments { count: 40, max: 32 };
        assert_eq!(err.to_string(), "參數數量 40 超過上限 32");
    }
}
