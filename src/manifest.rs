//! Manifest assembly - grouping media files into ordered sections

use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::GalleryConfig;
use crate::error::ScanError;
use crate::models::{GalleryItem, GalleryManifest, GallerySection, MediaFile, MediaKind, ScanStats};
use crate::naming::{describe, display_name, format_title, item_id, resolve_category};
use crate::progress::{ProgressReporter, ScanPhase};
use crate::scanner::{walk_media_files, ScanProgress};
use crate::sort::{sort_items, sort_sections};

/// Turn a media file into a presentable gallery item
pub fn build_item(config: &GalleryConfig, file: &MediaFile, top_level: &str) -> GalleryItem {
    let kind = file.kind();
    let category = resolve_category(&file.relative_path, top_level);
    let media_path = config.media_path(&file.relative_slash_path());
    let video_reference = match kind {
        MediaKind::Video => Some(media_path.clone()),
        MediaKind::Image => None,
    };

    GalleryItem {
        id: item_id(&file.file_name()),
        title: format_title(&file.stem()),
        description: describe(kind, &category),
        media_path,
        kind,
        video_reference,
        category,
    }
}

/// Bucket media files by top-level folder.
///
/// Each section's items are sorted before it is returned; sections
/// themselves come back in folder-key order, unsorted by display name.
/// Files directly under the root belong to no folder and are skipped.
pub fn group_sections(
    config: &GalleryConfig,
    files: &[MediaFile],
    stats: &mut ScanStats,
) -> Vec<GallerySection> {
    let mut buckets: BTreeMap<String, Vec<GalleryItem>> = BTreeMap::new();

    for file in files {
        let Some(top_level) = file.top_level_folder() else {
            log::debug!("Skipping {:?}: not inside a top-level folder", file.path);
            stats.skipped_root_files += 1;
            continue;
        };
        let item = build_item(config, file, &top_level);
        buckets.entry(top_level).or_default().push(item);
    }

    buckets
        .into_iter()
        .map(|(folder_key, mut items)| {
            sort_items(&mut items);
            log::debug!("Section {:?}: {} items", folder_key, items.len());
            GallerySection {
                display_name: display_name(&folder_key),
                folder_key,
                items,
            }
        })
        .collect()
}

/// Build the gallery manifest for the configured root
pub fn build_manifest(config: &GalleryConfig) -> Result<GalleryManifest, ScanError> {
    build_manifest_with_stats(config).map(|(manifest, _)| manifest)
}

/// Build the gallery manifest and return the counters collected on the way.
///
/// Fails with `NotFound` when the root is missing and `ScanFailed` on any
/// I/O error. Nothing partial is returned on failure.
pub fn build_manifest_with_stats(
    config: &GalleryConfig,
) -> Result<(GalleryManifest, ScanStats), ScanError> {
    build_manifest_with_reporter(config, &ProgressReporter::from_config(config))
}

/// Build the gallery manifest, sending progress events to `reporter`
pub fn build_manifest_with_reporter(
    config: &GalleryConfig,
    reporter: &ProgressReporter,
) -> Result<(GalleryManifest, ScanStats), ScanError> {
    let start = Instant::now();
    reporter.report_start(config);

    let result = assemble(config, reporter, start);
    match &result {
        Ok((_, stats)) => reporter.report_done(stats),
        Err(e) => reporter.report_error(e),
    }
    result
}

fn assemble(
    config: &GalleryConfig,
    reporter: &ProgressReporter,
    start: Instant,
) -> Result<(GalleryManifest, ScanStats), ScanError> {
    let root = &config.root;
    if !root.exists() {
        return Err(ScanError::not_found(root.clone()));
    }

    let metadata = std::fs::metadata(root)
        .map_err(|e| ScanError::scan_failed(Some(root.clone()), e.to_string()).with_source(e))?;
    if !metadata.is_dir() {
        return Err(ScanError::scan_failed(
            Some(root.clone()),
            format!("Not a directory: {:?}", root),
        ));
    }

    let mut stats = ScanStats::default();
    let files = walk_media_files(config, reporter, &mut stats)?;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let snapshot = ScanProgress::from_stats(&stats, root.to_string_lossy(), elapsed_ms);
    reporter.report_phase(ScanPhase::Build, &snapshot);

    let mut sections = group_sections(config, &files, &mut stats);
    sort_sections(&mut sections);

    let manifest = GalleryManifest { sections };
    stats.sections = manifest.sections.len() as u64;
    stats.items = manifest.item_count() as u64;
    stats.duration_ms = start.elapsed().as_millis() as u64;

    log::info!(
        "Built manifest for {:?}: {} sections, {} items in {}ms",
        root,
        stats.sections,
        stats.items,
        stats.duration_ms
    );

    Ok((manifest, stats))
}
