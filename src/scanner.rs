//! Scanner module - recursive discovery of allow-listed media files

use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

use crate::config::GalleryConfig;
use crate::error::ScanError;
use crate::models::{MediaFile, MediaKind, ScanStats};
use crate::progress::ProgressReporter;

/// Scan progress information
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// Total files scanned so far
    pub scanned_files: u64,
    /// Total directories scanned so far
    pub scanned_dirs: u64,
    /// Video files count
    pub video_count: u64,
    /// Image files count
    pub image_count: u64,
    /// Current directory being scanned
    pub current_dir: String,
    /// Elapsed time in milliseconds
    pub elapsed_ms: u64,
}

impl ScanProgress {
    /// Snapshot the running counters
    pub fn from_stats(stats: &ScanStats, current_dir: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            scanned_files: stats.total_files,
            scanned_dirs: stats.total_dirs,
            video_count: stats.video_count,
            image_count: stats.image_count,
            current_dir: current_dir.into(),
            elapsed_ms,
        }
    }
}

/// Walk the gallery root and collect every allow-listed media file.
///
/// Entries are visited in file-name order so the result is stable for an
/// unchanged tree. Directories and files outside the allow-list are
/// skipped. The first I/O error aborts the walk.
pub fn walk_media_files(
    config: &GalleryConfig,
    reporter: &ProgressReporter,
    stats: &mut ScanStats,
) -> Result<Vec<MediaFile>, ScanError> {
    let start = Instant::now();
    let root = config.root.as_path();
    let mut files = Vec::new();
    let mut current_dir = String::new();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = entry.map_err(ScanError::from)?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            stats.total_dirs += 1;
            current_dir = path.to_string_lossy().to_string();
            continue;
        }

        if !entry.file_type().is_file() {
            log::debug!("Skipping non-regular entry {:?}", path);
            continue;
        }

        stats.total_files += 1;

        let Some(media) = to_media_file(root, path)? else {
            continue;
        };

        match media.kind() {
            MediaKind::Image => stats.image_count += 1,
            MediaKind::Video => stats.video_count += 1,
        }
        files.push(media);

        if reporter.should_report() {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            let progress = ScanProgress::from_stats(stats, current_dir.as_str(), elapsed_ms);
            reporter.report_progress(&progress);
        }
    }

    log::debug!(
        "Walked {} dirs, {} files, {} media files under {:?}",
        stats.total_dirs,
        stats.total_files,
        files.len(),
        root
    );

    Ok(files)
}

/// Build a MediaFile if the path carries an allow-listed extension
fn to_media_file(root: &Path, path: &Path) -> Result<Option<MediaFile>, ScanError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !GalleryConfig::is_allowed_extension(&extension) {
        return Ok(None);
    }

    let relative_path = path
        .strip_prefix(root)
        .map_err(|e| {
            ScanError::scan_failed(
                Some(path.to_path_buf()),
                format!("path escapes gallery root: {}", e),
            )
        })?
        .to_path_buf();

    let parent_name = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Some(MediaFile {
        path: path.to_path_buf(),
        relative_path,
        extension,
        parent_name,
    }))
}
