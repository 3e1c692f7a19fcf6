//! 批次縮圖元件
//!
//! 掃描資料夾中支援的影片，平行產生縮圖並寫入快取

mod main;

pub use main::{BatchResult, ThumbnailBatch};
