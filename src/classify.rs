//! Pixel heuristics for sorting control images by visual archetype.
//!
//! Both checks are coarse background-dominance tests over RGB8 pixels, not
//! real detectors: a pose skeleton render and an edge map share the trait of
//! thin bright strokes over a near-black background, so a high dark-pixel
//! ratio is enough of a signal for batch filtering. False positives and
//! negatives are expected.

use image::RgbImage;

/// Channel value below which a pixel counts as background-dark.
pub const DARK_THRESHOLD: u8 = 30;

/// Fraction of dark pixels required for the background to count as dominant.
pub const DARK_RATIO: f64 = 0.8;

/// Maximum per-channel difference for the near-grayscale test.
pub const GRAY_TOLERANCE: u8 = 10;

fn dark_pixel_ratio(image: &RgbImage) -> f64 {
    let total = u64::from(image.width()) * u64::from(image.height());
    if total == 0 {
        return 0.0;
    }
    let dark = image
        .pixels()
        .filter(|p| p.0.iter().all(|&c| c < DARK_THRESHOLD))
        .count();
    dark as f64 / total as f64
}

fn is_near_grayscale(image: &RgbImage) -> bool {
    image.pixels().all(|p| {
        let [r, g, b] = p.0;
        r.abs_diff(g) < GRAY_TOLERANCE && g.abs_diff(b) < GRAY_TOLERANCE
    })
}

/// Whether the image looks like a pose skeleton render: colored limbs over a
/// dominant (> 0.8) near-black background. Hue plays no part; only the dark
/// ratio is tested.
pub fn is_pose_map(image: &RgbImage) -> bool {
    dark_pixel_ratio(image) > DARK_RATIO
}

/// Whether the image looks like an edge map: near-grayscale everywhere, with
/// the same dominant near-black background as [`is_pose_map`].
pub fn is_edge_map(image: &RgbImage) -> bool {
    if !is_near_grayscale(image) {
        return false;
    }
    dark_pixel_ratio(image) > DARK_RATIO
}

/// Content checks the sampler applies to decoded candidates.
///
/// Enabled checks are ANDed: a candidate must pass every one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentChecks {
    pub pose_map: bool,
    pub edge_map: bool,
}

impl ContentChecks {
    /// True when at least one check is enabled (candidates must be decoded).
    pub const fn any(&self) -> bool {
        self.pose_map || self.edge_map
    }

    pub fn matches(&self, image: &RgbImage) -> bool {
        if self.pose_map && !is_pose_map(image) {
            return false;
        }
        if self.edge_map && !is_edge_map(image) {
            return false;
        }
        true
    }
}

// -- tests
