//! 內嵌播放元件
//!
//! 背景執行緒讀取原始畫面，主執行緒依幀率控制節奏並回報進度

mod main;

pub use main::{PanePlayer, PlaybackStats};
