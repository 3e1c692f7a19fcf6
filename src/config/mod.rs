pub mod load;
pub mod save;
pub mod types;

pub use load::SETTINGS_FILE;
pub use save::save_settings;
pub use types::{APP_NAME, Config, PlaybackSettings, ThumbnailSettings, ToolPaths, UserSettings};
