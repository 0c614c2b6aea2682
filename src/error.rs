use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum AppError {
    #[error("TOML config file error: {0}")]
    TomlConfig(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found or not a directory: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Image encode failed: {0}")]
    ImageEncode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type with default AppError
pub type Result<T, E = AppError> = std::result::Result<T, E>;
