//! Filename and folder naming conventions.
//!
//! Editors name files freely, so titles, categories and section names are
//! all derived from the file system:
//!
//! - `2024.jpg` → "Frame 2024" (four-digit frame number)
//! - `2023-2024.mp4` → "Sequence 2023-2024" (two four-digit groups)
//! - `my-cool_shot.png` → "my cool shot" (separators become spaces)
//! - `wedding_photos/` → section "Wedding Photos"

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::models::MediaKind;

fn frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("valid frame pattern"))
}

fn sequence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{4}$").expect("valid sequence pattern"))
}

/// Derive a display title from a file name without its extension.
///
/// The first matching rule wins:
/// 1. exactly four ASCII digits → `"Frame NNNN"`
/// 2. `NNNN-NNNN` → `"Sequence NNNN-NNNN"`
/// 3. otherwise every `-` and `_` becomes a space; nothing else changes
pub fn format_title(stem: &str) -> String {
    if frame_pattern().is_match(stem) {
        format!("Frame {}", stem)
    } else if sequence_pattern().is_match(stem) {
        format!("Sequence {}", stem)
    } else {
        stem.replace(['-', '_'], " ")
    }
}

/// Resolve the category of a file from its root-relative path.
///
/// Files directly inside their top-level folder take the folder name.
/// Deeper files take their containing directory relative to the root,
/// joined with `/` (e.g. `Events/Opening`).
pub fn resolve_category(relative_path: &Path, top_level: &str) -> String {
    let containing = relative_path
        .parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    if containing.is_empty() || containing == top_level {
        top_level.to_string()
    } else {
        containing
    }
}

/// Turn a raw folder name into a section display name.
///
/// Splits on `_`, uppercases the first character of each word and joins
/// with single spaces. The rest of each word is left untouched.
pub fn display_name(folder: &str) -> String {
    folder
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Item identifier: the file name, extension included.
///
/// Not unique when the same file name appears in several folders.
pub fn item_id(file_name: &str) -> String {
    file_name.to_string()
}

/// Generated one-line description for an item
pub fn describe(kind: MediaKind, category: &str) -> String {
    format!("{} from {}", kind.label(), category)
}
