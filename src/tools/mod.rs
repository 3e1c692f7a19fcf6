mod media_extension;
mod media_probe;
mod path_hasher;
mod path_validator;
mod playback_controller;
mod probe_parser;
mod process_supervisor;
mod thumbnail_cache;
mod thumbnail_generator;
mod tool_locator;
mod video_scanner;

pub use media_extension::{SUPPORTED_EXTENSIONS, is_supported_extension, is_supported_path};
pub use media_probe::{BasicMetadata, ExtendedMetadata, MediaMetadata, MediaProbe};
pub use path_hasher::hash_path;
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use playback_controller::{
    BYTES_PER_PIXEL, FrameReader, InPaneSession, PlaybackController, PlaybackState, fill_frame,
    frame_len, read_frame_from,
};
pub use probe_parser::{
    CodecLine, DEFAULT_BIT_DEPTH, DEFAULT_FRAME_RATE, StreamLine, parse_codec_line,
    parse_duration, parse_frame_rate, parse_stream_line,
};
pub use process_supervisor::{
    CAPTURE_CAPACITY, ChildProcess, MAX_TOOL_ARGS, ProcessState, StopOutcome, StopPolicy,
    ToolCommand, run_and_capture, run_and_wait, spawn_detached, spawn_piped,
};
pub use thumbnail_cache::{THUMBNAIL_EXTENSION, ThumbnailCache};
pub use thumbnail_generator::{ThumbnailGenerator, format_timestamp};
pub use tool_locator::{is_tool_available, locate_tool};
pub use video_scanner::{VideoFileInfo, scan_video_files};
