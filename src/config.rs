//! Configuration for the gallery indexer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default interval between progress messages (milliseconds)
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;

/// Extensions (lowercase, without dot) classified as images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Extensions (lowercase, without dot) classified as videos
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv"];

/// Configuration for a manifest build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Gallery root directory
    pub root: PathBuf,

    /// Whether symbolic links are resolved to what they point at
    pub follow_links: bool,

    /// Optional prefix joined in front of every media path
    /// (e.g. `/gallery` turns `Events/2024.jpg` into `/gallery/Events/2024.jpg`)
    pub media_prefix: Option<String>,

    /// Whether to report progress as JSON lines on stderr
    pub show_progress: bool,

    /// Minimum interval between progress messages
    pub progress_interval_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            follow_links: true,
            media_prefix: None,
            show_progress: false,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }
}

impl GalleryConfig {
    /// Create a new config for the given gallery root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Create a config builder
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::new()
    }

    /// Check if an extension is on the media allow-list (case-insensitive)
    pub fn is_allowed_extension(ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
    }

    /// Join the configured media prefix with a root-relative path
    pub fn media_path(&self, relative: &str) -> String {
        match self.media_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix.trim_end_matches('/'), relative)
            }
            _ => relative.to_string(),
        }
    }
}

/// Builder for GalleryConfig
#[derive(Debug, Default)]
pub struct GalleryConfigBuilder {
    config: GalleryConfig,
}

impl GalleryConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gallery root
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Enable or disable following symbolic links
    pub fn follow_links(mut self, enabled: bool) -> Self {
        self.config.follow_links = enabled;
        self
    }

    /// Set the media path prefix
    pub fn media_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.media_prefix = Some(prefix.into());
        self
    }

    /// Enable or disable progress reporting
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.config.show_progress = enabled;
        self
    }

    /// Set the progress interval
    pub fn progress_interval_ms(mut self, interval: u64) -> Self {
        self.config.progress_interval_ms = interval;
        self
    }

    /// Build the config
    pub fn build(self) -> GalleryConfig {
        self.config
    }
}
