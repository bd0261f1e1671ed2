mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::naming::NameTemplate;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;
    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./mediavault.toml",
        "~/.config/mediavault/config.toml",
        "/etc/mediavault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand_paths(config: &mut Config) {
    fn expand(path: &Path) -> std::path::PathBuf {
        let raw = path.to_string_lossy();
        std::path::PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }

    config.storage.database = expand(&config.storage.database);
    config.storage.root_dir = expand(&config.storage.root_dir);
    if let Some(dir) = &config.naming.word_list_dir {
        config.naming.word_list_dir = Some(expand(dir));
    }
    if let Some(ffmpeg) = &config.delivery.ffmpeg_path {
        config.delivery.ffmpeg_path = Some(expand(ffmpeg));
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.naming.template.is_empty() {
        anyhow::bail!("Naming template cannot be empty");
    }
    let template = NameTemplate::parse(&config.naming.template)
        .with_context(|| format!("Invalid naming template: {}", config.naming.template))?;
    if template.placeholder_count() == 0 {
        tracing::warn!(
            "Naming template {:?} has no placeholders; only one upload per extension can use it",
            config.naming.template
        );
    }

    if config.naming.max_attempts == 0 {
        anyhow::bail!("naming.max_attempts must be at least 1");
    }

    if let Some(dir) = &config.naming.word_list_dir {
        if !dir.exists() {
            tracing::warn!("Word list directory does not exist: {:?}", dir);
        }
    }

    if config.delivery.cache_capacity == 0 {
        anyhow::bail!("delivery.cache_capacity must be at least 1");
    }
    if config.delivery.max_thumbnail_size == 0 {
        anyhow::bail!("delivery.max_thumbnail_size must be at least 1");
    }

    if config.listing.default_limit == 0 {
        anyhow::bail!("listing.default_limit must be at least 1");
    }
    if config.listing.default_limit > config.listing.max_limit {
        anyhow::bail!(
            "listing.default_limit ({}) exceeds listing.max_limit ({})",
            config.listing.default_limit,
            config.listing.max_limit
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.database, Path::new("mediavault.db"));
        assert_eq!(config.storage.root_dir, Path::new("./uploads"));
        assert_eq!(config.naming.template, "{chars 6}");
        assert_eq!(config.naming.max_attempts, 20);
        assert_eq!(config.delivery.cache_capacity, 50);
        assert_eq!(config.delivery.max_thumbnail_size, 4096);
        assert_eq!(config.listing.default_limit, 30);
        assert_eq!(config.listing.max_limit, 200);
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[naming]
template = "{chars 4}-{chars 4}"

[listing]
default_limit = 10
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.naming.template, "{chars 4}-{chars 4}");
        assert_eq!(config.naming.max_attempts, 20);
        assert_eq!(config.listing.default_limit, 10);
        assert_eq!(config.listing.max_limit, 200);
        assert_eq!(config.delivery.cache_capacity, 50);
    }

    #[test]
    fn test_rejects_bad_template() {
        let file = write_config("[naming]\ntemplate = \"{chars zero}\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_zero_values() {
        let mut config = Config::default();
        config.delivery.cache_capacity = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.naming.max_attempts = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.delivery.max_thumbnail_size = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.listing.default_limit = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_default_above_max() {
        let mut config = Config::default();
        config.listing.default_limit = 50;
        config.listing.max_limit = 20;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_tilde_is_expanded() {
        let file = write_config("[storage]\nroot_dir = \"~/vault\"\n");
        let config = load_config(file.path()).unwrap();
        assert!(!config.storage.root_dir.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/mediavault.toml")).is_err());
    }
}
