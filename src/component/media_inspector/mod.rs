//! 媒體資訊元件
//!
//! 探測單一影片的尺寸、長度、編碼與幀率，並產生（或取用快取的）縮圖

mod main;

pub use main::{MediaInspector, format_duration};
