mod classify;
mod config;
mod decode;
mod error;
mod logging;
mod progress_bar;
mod sampler;
mod scan;

pub use classify::{
    ContentChecks, DARK_RATIO, DARK_THRESHOLD, GRAY_TOLERANCE, is_edge_map, is_pose_map,
};
pub use config::{SampleArgs, parse_toml};
pub use decode::{decode_rgb, encode_png};
pub use error::{AppError, Result};
pub use logging::init_logger;
pub use progress_bar::progress_bar_style;
pub use scan::{
    DEFAULT_SKIP_PATTERNS, IMAGE_EXTENSIONS, ListingOptions, SortOrder, is_excluded, list_images,
    parse_skip_patterns, scan_images,
};

// Core sampling API
pub use sampler::{Batch, BatchEntry, BatchSampler, pick_one};
