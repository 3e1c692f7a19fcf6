use super::media_extension::is_supported_path;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 遞迴掃描資料夾中支援的影片，依檔案大小排序（由小到大）
pub fn scan_video_files(directory: &Path) -> Result<Vec<VideoFileInfo>> {
    let mut video_files: Vec<VideoFileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_supported_path(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    video_files.sort_by_key(|file| file.size);
    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();

        fs::write(dir.path().join("big.MP4"), vec![0u8; 300]).unwrap();
        fs::write(nested.join("small.mkv"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("mid.webm"), vec![0u8; 100]).unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let files = scan_video_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["small.mkv", "mid.webm", "big.MP4"]);
        assert_eq!(files[0].size, 10);
    }
}
