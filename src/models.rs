//! Core data models for the gallery indexer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::VIDEO_EXTENSIONS;

/// Media kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Image files (jpg, jpeg, png, webp, gif)
    Image,
    /// Video files (mp4, mkv)
    Video,
}

impl MediaKind {
    /// Classify an allow-listed extension. Anything that is not a video is an image.
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext_lower.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Capitalized label used in generated descriptions
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A media file found under the gallery root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Path relative to the gallery root
    pub relative_path: PathBuf,
    /// File extension (lowercase, without dot)
    pub extension: String,
    /// Name of the immediate parent directory
    pub parent_name: String,
}

impl MediaFile {
    /// File name including extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// First component of the relative path, if the file sits inside a folder
    pub fn top_level_folder(&self) -> Option<String> {
        let mut components = self.relative_path.components();
        let first = components.next()?;
        // A lone component is the file itself, directly under the root
        components.next()?;
        Some(first.as_os_str().to_string_lossy().into_owned())
    }

    /// Relative path with forward slashes
    pub fn relative_slash_path(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Media kind inferred from the extension
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_extension(&self.extension)
    }
}

/// A single presentable gallery entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Identifier derived from the file name
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Generated description
    pub description: String,
    /// Root-relative retrieval path
    #[serde(rename = "image")]
    pub media_path: String,
    /// Image or video
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Same as `media_path`, only for videos
    #[serde(rename = "videoUrl", skip_serializing_if = "Option::is_none", default)]
    pub video_reference: Option<String>,
    /// Display grouping label
    pub category: String,
}

/// Items sharing one top-level folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySection {
    /// Title-cased folder name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Raw top-level folder name
    #[serde(rename = "path")]
    pub folder_key: String,
    /// Ordered items
    pub items: Vec<GalleryItem>,
}

/// The complete, ordered manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub sections: Vec<GallerySection>,
}

impl GalleryManifest {
    /// Total number of items across all sections
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Check if the manifest has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Counters collected while building a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Directories traversed (root included)
    pub total_dirs: u64,
    /// Regular files seen, allow-listed or not
    pub total_files: u64,
    /// Allow-listed image files
    pub image_count: u64,
    /// Allow-listed video files
    pub video_count: u64,
    /// Media files sitting directly under the root
    pub skipped_root_files: u64,
    /// Number of sections in the manifest
    pub sections: u64,
    /// Number of items in the manifest
    pub items: u64,
    /// Total build duration in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Total allow-listed media files
    pub fn media_files(&self) -> u64 {
        self.image_count + self.video_count
    }
}
