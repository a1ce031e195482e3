use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions eligible for the playlist
const PLAYLIST_EXTENSIONS: &[&str] = &["mp4", "flv"];

/// Check if a path has a playable container extension
pub fn is_playlist_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return PLAYLIST_EXTENSIONS.contains(&ext_str.to_lowercase().as_str());
        }
    }
    false
}

/// List the playable files directly inside `dir`, sorted ascending by file
/// name so every pass visits them in the same order. A missing or empty
/// directory yields an empty playlist, not an error; the supervisor treats
/// that as a normal wait-for-content state.
pub fn scan_playlist(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_playlist_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}
