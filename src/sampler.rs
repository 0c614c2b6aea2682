//! Seeded, content-filtered batch sampling over a candidate path set.
//!
//! One `sample` call is fully deterministic for a fixed candidate set and
//! seed: a single seeded RNG drives the initial shuffle and every later
//! replacement draw, and nothing touches process-wide random state. Decoding
//! happens lazily per candidate and only when a content check or eager
//! loading requires it.

// -- external imports
use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use crate::classify::ContentChecks;
use crate::decode::decode_rgb;
use crate::scan::is_excluded;

/// One emitted batch slot.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub path: PathBuf,
    /// Decoded pixels, attached when the sampler was asked to load images.
    pub image: Option<RgbImage>,
}

/// Result of one sampling call.
#[derive(Debug, Default)]
pub struct Batch {
    pub entries: Vec<BatchEntry>,
    /// Candidates dropped because their file failed to decode. Decode
    /// failures never abort the call; they only show up here and in the log.
    pub decode_failures: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }
}

/// Fate of a single candidate in the primary fill pass.
enum CandidateOutcome {
    Accepted(Option<RgbImage>),
    Rejected,
    DecodeFailed,
}

/// Deterministic batch sampler over an already-scanned candidate set.
#[derive(Debug, Clone, Copy)]
pub struct BatchSampler {
    /// Sole source of randomness for the whole call.
    pub seed: u64,
    /// Upper bound on the output length; met exactly whenever at least one
    /// candidate validates.
    pub batch_size: usize,
    /// Attach decoded pixels to every emitted entry.
    pub load_images: bool,
    /// Content checks a candidate must pass; empty means scan-time filters
    /// only.
    pub checks: ContentChecks,
}

impl BatchSampler {
    pub fn new(seed: u64, batch_size: usize) -> Self {
        Self {
            seed,
            batch_size,
            load_images: false,
            checks: ContentChecks::default(),
        }
    }

    /// Assemble a batch from `candidates`.
    ///
    /// The candidates are shuffled with the seeded RNG and consumed
    /// front-to-back without replacement until the batch is full. When the
    /// validated pool runs out first, the batch is topped up by drawing from
    /// the accepted paths *with replacement* using the same RNG, so the
    /// output may contain duplicate paths. That duplication is deliberate
    /// policy: the caller always receives exactly `batch_size` entries as
    /// long as a single candidate validates. An empty batch means nothing
    /// validated; the sampler does not treat that as an error.
    pub fn sample(&self, candidates: &[PathBuf]) -> Batch {
        let mut batch = Batch::default();
        if candidates.is_empty() || self.batch_size == 0 {
            return batch;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut pool: Vec<PathBuf> = candidates.to_vec();
        pool.shuffle(&mut rng);

        let mut accepted: Vec<PathBuf> = Vec::new();
        for path in pool {
            if batch.entries.len() >= self.batch_size {
                break;
            }
            match self.inspect(&path) {
                CandidateOutcome::Accepted(image) => {
                    accepted.push(path.clone());
                    batch.entries.push(BatchEntry { path, image });
                }
                CandidateOutcome::Rejected => {}
                CandidateOutcome::DecodeFailed => batch.decode_failures += 1,
            }
        }

        self.fill_with_replacement(&mut rng, accepted, &mut batch);
        batch
    }

    /// Decide one candidate's fate, decoding only when required.
    fn inspect(&self, path: &Path) -> CandidateOutcome {
        if !self.checks.any() && !self.load_images {
            return CandidateOutcome::Accepted(None);
        }

        let image = match decode_rgb(path) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Failed to decode candidate {:?}, skipping. Error: {}", path, e);
                return CandidateOutcome::DecodeFailed;
            }
        };

        if self.checks.any() && !self.checks.matches(&image) {
            return CandidateOutcome::Rejected;
        }

        let image = if self.load_images { Some(image) } else { None };
        CandidateOutcome::Accepted(image)
    }

    /// Top the batch up by drawing from the accepted pool with replacement.
    ///
    /// Each duplicate re-decodes its file independently rather than aliasing
    /// the earlier pixels. A path whose re-decode fails is evicted from the
    /// pool, so the loop terminates even if the filesystem changed under us.
    fn fill_with_replacement(&self, rng: &mut StdRng, mut pool: Vec<PathBuf>, batch: &mut Batch) {
        while batch.entries.len() < self.batch_size && !pool.is_empty() {
            let idx = rng.gen_range(0..pool.len());
            let image = if self.load_images {
                match decode_rgb(&pool[idx]) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to re-decode {:?} in replacement pass: {}",
                            pool[idx],
                            e
                        );
                        batch.decode_failures += 1;
                        pool.swap_remove(idx);
                        continue;
                    }
                }
            } else {
                None
            };
            batch.entries.push(BatchEntry {
                path: pool[idx].clone(),
                image,
            });
        }
    }
}

/// Pick a single candidate with a seeded uniform draw.
///
/// Candidates are deduplicated in first-seen order and filtered by the skip
/// patterns before the draw, keeping the pick deterministic for a fixed input
/// order and seed. A non-empty `forced` value bypasses randomness entirely.
/// Returns `None` when the filtered pool is empty; the caller decides whether
/// that is fatal.
pub fn pick_one(
    candidates: &[PathBuf],
    seed: u64,
    skip_patterns: &[String],
    forced: Option<&str>,
) -> Option<PathBuf> {
    if let Some(forced) = forced {
        let forced = forced.trim();
        if !forced.is_empty() {
            return Some(PathBuf::from(forced));
        }
    }

    let mut pool: Vec<&PathBuf> = Vec::new();
    for path in candidates {
        if !pool.contains(&path) && !is_excluded(path, skip_patterns) {
            pool.push(path);
        }
    }
    if pool.is_empty() {
        tracing::warn!("No candidates left to pick from after exclusion");
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    pool.choose(&mut rng).map(|p| (*p).clone())
}

// -- tests
