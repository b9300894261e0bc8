//! Deterministic gallery manifests from curated media directory trees
//!
//! This library walks a gallery root, classifies allow-listed images and
//! videos, derives titles and categories from file and folder names, and
//! returns sections ordered with a numeric-aware sort.

pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod naming;
pub mod progress;
pub mod scanner;
pub mod sort;

pub use config::GalleryConfig;
pub use error::{ErrorResponse, ScanError, ScanErrorKind};
pub use manifest::{
    build_manifest, build_manifest_with_reporter, build_manifest_with_stats, group_sections,
};
pub use models::{GalleryItem, GalleryManifest, GallerySection, MediaFile, MediaKind, ScanStats};
pub use naming::{display_name, format_title, resolve_category};
pub use progress::{
    DoneMessage, ErrorProgressMessage, ProgressEvent, ProgressMessage, ProgressReporter, ScanPhase,
    StartMessage,
};
pub use scanner::walk_media_files;
pub use sort::{compare_items, locale_cmp, sort_items, sort_sections};
