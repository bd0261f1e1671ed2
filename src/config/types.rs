use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite catalog file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Directory uploads are written under (one subdirectory per month)
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from("mediavault.db")
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            root_dir: default_root_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    /// Template for generated names, e.g. `{pick adjectives.txt}-{chars 4}`
    #[serde(default = "default_template")]
    pub template: String,

    /// Candidates tried before giving up (default: 20)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base directory for relative `{pick FILE}` paths
    #[serde(default)]
    pub word_list_dir: Option<PathBuf>,
}

fn default_template() -> String {
    "{chars 6}".to_string()
}

fn default_max_attempts() -> u32 {
    crate::naming::DEFAULT_MAX_ATTEMPTS
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            max_attempts: default_max_attempts(),
            word_list_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Rendered payloads kept in memory (default: 50)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Largest thumbnail side a request may ask for (default: 4096)
    #[serde(default = "default_max_thumbnail_size")]
    pub max_thumbnail_size: u32,

    /// ffmpeg executable; `ffmpeg` on PATH when unset
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

fn default_cache_capacity() -> usize {
    crate::delivery::DEFAULT_CACHE_CAPACITY
}

fn default_max_thumbnail_size() -> u32 {
    crate::delivery::DEFAULT_MAX_THUMBNAIL_SIZE
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            max_thumbnail_size: default_max_thumbnail_size(),
            ffmpeg_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_limit() -> u32 {
    crate::listing::DEFAULT_PAGE_LIMIT
}

fn default_max_limit() -> u32 {
    crate::listing::MAX_PAGE_LIMIT
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}
