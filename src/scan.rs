// -- external imports
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString, VariantNames};
use walkdir::WalkDir;

use crate::error::{AppError, Result};

/// Extension allow-list used when a config does not override it (lowercase,
/// without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Path substrings skipped by default: preview/sample folders and files that
/// accompany downloaded model assets.
pub const DEFAULT_SKIP_PATTERNS: &str =
    "preview, previews, sample, samples, example, linart, lineart";

/// Split a comma/newline separated pattern string into trimmed lowercase
/// patterns, dropping empties.
pub fn parse_skip_patterns(raw: &str) -> Vec<String> {
    raw.replace('\n', ",")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether the path's lowercased, separator-normalized string contains any of
/// the skip patterns as a substring. Matches anywhere in the path, not just on
/// whole segments.
pub fn is_excluded(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let normalized = path.to_string_lossy().to_lowercase().replace('\\', "/");
    patterns.iter().any(|p| normalized.contains(p.as_str()))
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        extensions.iter().any(|allowed| *allowed == ext)
    })
}

/// Collect candidate image paths under `root`.
///
/// Files survive when their extension is on the allow-list
/// (case-insensitive) and no skip pattern matches their path. An empty result
/// is not an error; callers decide whether that is fatal. No ordering is
/// promised, the sampler imposes its own.
///
/// # Errors
///
/// Returns `AppError::DirectoryNotFound` when `root` does not exist or is not
/// a directory.
pub fn scan_images(
    root: &Path,
    recursive: bool,
    extensions: &[String],
    skip_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(AppError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    if recursive {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else {
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.retain(|p| has_allowed_extension(p, extensions) && !is_excluded(p, skip_patterns));
    Ok(files)
}

// -- ordered listing

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, VariantNames)]
pub enum SortOrder {
    /// Lexicographic path order
    #[strum(serialize = "sequential")]
    Sequential,

    /// Reverse lexicographic path order
    #[strum(serialize = "reverse")]
    Reverse,

    /// Seeded shuffle of the lexicographic order
    #[strum(serialize = "shuffled")]
    Shuffled,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Sequential
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListingOptions {
    pub order: SortOrder,
    /// 1-based index of the first returned path; clamped into range.
    pub start_from: usize,
    /// Maximum number of returned paths; 0 means all.
    pub limit: usize,
    /// Shuffle seed, used only by [`SortOrder::Shuffled`].
    pub seed: u64,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            order: SortOrder::default(),
            start_from: 1,
            limit: 0,
            seed: 0,
        }
    }
}

/// Scan and return candidate paths in a caller-chosen order, with optional
/// slicing.
///
/// Paths are sorted before any shuffle so the result depends only on the
/// filesystem contents and the seed, never on directory iteration order.
pub fn list_images(
    root: &Path,
    recursive: bool,
    extensions: &[String],
    skip_patterns: &[String],
    opts: &ListingOptions,
) -> Result<Vec<PathBuf>> {
    let mut files = scan_images(root, recursive, extensions, skip_patterns)?;
    if files.is_empty() {
        return Ok(files);
    }

    files.sort();
    match opts.order {
        SortOrder::Sequential => {}
        SortOrder::Reverse => files.reverse(),
        SortOrder::Shuffled => {
            let mut rng = StdRng::seed_from_u64(opts.seed);
            files.shuffle(&mut rng);
        }
    }

    let start = opts.start_from.saturating_sub(1).min(files.len() - 1);
    let mut files = files.split_off(start);
    if opts.limit > 0 {
        files.truncate(opts.limit);
    }
    Ok(files)
}

// -- tests
