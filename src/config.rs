// -- imports
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::VariantNames;

use crate::classify::ContentChecks;
use crate::error::{AppError, Result};
use crate::sampler::BatchSampler;
use crate::scan::{
    DEFAULT_SKIP_PATTERNS, IMAGE_EXTENSIONS, ListingOptions, SortOrder, parse_skip_patterns,
};

// -- args

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleArgs {
    /// Directory to scan for candidate images
    pub image_dir: PathBuf,

    /// Search recursively in subfolders
    pub subfolders: bool,

    /// Seed driving every random decision of one sampling call
    pub seed: u64,

    /// Number of entries in the output batch
    pub batch_size: usize,

    /// Attach decoded pixels to the batch entries
    pub load_images: bool,

    /// Require candidates to look like a pose skeleton render
    pub check_pose_map: bool,

    /// Require candidates to look like an edge map
    pub check_edge_map: bool,

    /// Comma/newline separated path substrings to skip
    pub names_to_skip: String,

    /// Extension allow-list (lowercase, without the dot)
    pub extensions: Vec<String>,

    /// Order for plain listings (sequential, reverse, shuffled)
    #[serde(deserialize_with = "deserialize_sort_order")]
    pub sort_method: SortOrder,

    /// 1-based index of the first listed image
    pub start_from: usize,

    /// Maximum number of listed images (0 = all)
    pub limit: usize,

    /// Directory to save loaded batch images into
    pub save_dir: Option<PathBuf>,
}

impl Default for SampleArgs {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::new(),
            subfolders: false,
            seed: 0,
            batch_size: 1,
            load_images: true,
            check_pose_map: false,
            check_edge_map: false,
            names_to_skip: DEFAULT_SKIP_PATTERNS.to_string(),
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            sort_method: SortOrder::default(),
            start_from: 1,
            limit: 0,
            save_dir: None,
        }
    }
}

impl SampleArgs {
    pub fn skip_patterns(&self) -> Vec<String> {
        parse_skip_patterns(&self.names_to_skip)
    }

    pub fn checks(&self) -> ContentChecks {
        ContentChecks {
            pose_map: self.check_pose_map,
            edge_map: self.check_edge_map,
        }
    }

    pub fn sampler(&self) -> BatchSampler {
        BatchSampler {
            seed: self.seed,
            batch_size: self.batch_size,
            load_images: self.load_images,
            checks: self.checks(),
        }
    }

    pub fn listing(&self) -> ListingOptions {
        ListingOptions {
            order: self.sort_method,
            start_from: self.start_from,
            limit: self.limit,
            seed: self.seed,
        }
    }
}

/// Custom deserializer with helpful error message
fn deserialize_sort_order<'de, D>(deserializer: D) -> Result<SortOrder, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    SortOrder::from_str(&value).map_err(|_| {
        let variants = SortOrder::VARIANTS;
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", variants.join(", ")).as_str(),
        )
    })
}

// -- config file

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    sample: SampleArgs,
}

impl TomlConfig {
    /// Parse a TOML config file with explicit project root for path
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - The path is not a valid toml file
    /// - File read fails
    /// - TOML parsing fails
    fn from_toml(toml_path: &Path, project_root: &Path) -> Result<Self> {
        if !toml_path.is_file() || toml_path.extension().is_none_or(|ext| ext != "toml") {
            return Err(AppError::Config(format!(
                "TOML config path is not a valid .toml file: {:?}",
                toml_path
            )));
        }

        let content = std::fs::read_to_string(toml_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.resolve_paths(project_root);
        Ok(config)
    }

    /// Resolve relative paths against project root
    fn resolve_paths(&mut self, project_root: &Path) {
        if !self.sample.image_dir.as_os_str().is_empty() && !self.sample.image_dir.is_absolute() {
            self.sample.image_dir = project_root.join(&self.sample.image_dir);
        }
        if let Some(ref mut save_dir) = self.sample.save_dir {
            if !save_dir.is_absolute() {
                *save_dir = project_root.join(save_dir.as_path());
            }
        }
    }
}

// -- public API

/// Parse a TOML config file and return SampleArgs.
///
/// # Arguments
///
/// * `toml_path` - Path to the TOML config file
/// * `project_root` - Base directory for resolving relative paths
///
/// # Errors
///
/// Returns `AppError` if TOML parsing or path resolution fails.
pub fn parse_toml(toml_path: &Path, project_root: &Path) -> Result<SampleArgs> {
    TomlConfig::from_toml(toml_path, project_root).map(|c| c.sample)
}

// -- tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml_with_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        let toml_content = r#"
[sample]
image_dir = "renders"
subfolders = true
seed = 42
batch_size = 8
load_images = false
check_pose_map = true
names_to_skip = "preview, wip"
sort_method = "shuffled"
start_from = 3
limit = 20
save_dir = "out"
"#;
        fs::write(&toml_path, toml_content).unwrap();

        let args = parse_toml(&toml_path, temp_dir.path()).unwrap();

        assert_eq!(args.image_dir, temp_dir.path().join("renders"));
        assert!(args.subfolders);
        assert_eq!(args.seed, 42);
        assert_eq!(args.batch_size, 8);
        assert!(!args.load_images);
        assert!(args.check_pose_map);
        assert!(!args.check_edge_map);
        assert_eq!(args.skip_patterns(), vec!["preview", "wip"]);
        assert_eq!(args.sort_method, SortOrder::Shuffled);
        assert_eq!(args.start_from, 3);
        assert_eq!(args.limit, 20);
        assert_eq!(args.save_dir, Some(temp_dir.path().join("out")));
    }

    #[test]
    fn test_parse_toml_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[sample]\nseed = 7\n").unwrap();

        let args = parse_toml(&toml_path, temp_dir.path()).unwrap();

        assert_eq!(args.seed, 7);
        assert_eq!(args.batch_size, 1);
        assert!(args.load_images);
        assert_eq!(args.extensions, vec!["jpg", "jpeg", "png", "webp"]);
        assert_eq!(args.sort_method, SortOrder::Sequential);
        assert!(args.skip_patterns().contains(&"preview".to_string()));
        assert!(args.save_dir.is_none());
    }

    #[test]
    fn test_sampler_from_args() {
        let args = SampleArgs {
            seed: 3,
            batch_size: 5,
            check_edge_map: true,
            ..Default::default()
        };
        let sampler = args.sampler();
        assert_eq!(sampler.seed, 3);
        assert_eq!(sampler.batch_size, 5);
        assert!(sampler.checks.edge_map);
        assert!(sampler.checks.any());
    }

    #[test]
    fn test_absolute_paths_stay_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[sample]\nimage_dir = \"/data/images\"\n").unwrap();

        let args = parse_toml(&toml_path, temp_dir.path()).unwrap();
        assert_eq!(args.image_dir, PathBuf::from("/data/images"));
    }

    #[test]
    fn test_parse_toml_invalid_path() {
        let invalid_path = PathBuf::from("/nonexistent/config.toml");
        assert!(parse_toml(&invalid_path, Path::new("/tmp")).is_err());
    }

    #[test]
    fn test_parse_toml_invalid_extension() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_path = temp_dir.path().join("config.txt");
        fs::write(&invalid_path, "[sample]\nseed = 1\n").unwrap();
        assert!(parse_toml(&invalid_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_invalid_sort_method() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("config.toml");
        fs::write(&toml_path, "[sample]\nsort_method = \"sideways\"\n").unwrap();
        assert!(parse_toml(&toml_path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_toml_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let toml_path = temp_dir.path().join("invalid.toml");
        fs::write(&toml_path, "invalid toml [[[").unwrap();
        assert!(parse_toml(&toml_path, temp_dir.path()).is_err());
    }
}
