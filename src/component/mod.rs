//! 功能元件模組
//!
//! 每個子模組實現一個選單功能，核心邏輯位於 `tools`

pub mod full_window_player;
pub mod media_inspector;
pub mod pane_player;
pub mod thumbnail_batch;

pub use full_window_player::FullWindowPlayer;
pub use media_inspector::MediaInspector;
pub use pane_player::{PanePlayer, PlaybackStats};
pub use thumbnail_batch::{BatchResult, ThumbnailBatch};
