use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sigma_aggregator::AggregatorConfig;
use sigma_protocol::DEFAULT_PAGE_SIZE;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SIGMA_ARCHIVE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sigma-archive.toml";

/// File-level settings; every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub aggregate: AggregatorConfig,
    pub browse: BrowseSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowseSettings {
    /// Directory holding the aggregated outputs (defaults to `aggregate.output_dir`)
    pub data_dir: Option<PathBuf>,
    pub page_size: usize,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Path keys a config file actually sets; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PathKeys {
    aggregate: AggregatePathKeys,
    browse: BrowsePathKeys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AggregatePathKeys {
    data_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrowsePathKeys {
    data_dir: Option<PathBuf>,
}

impl ArchiveConfig {
    /// Resolve the config source: explicit path, then `$SIGMA_ARCHIVE_CONFIG`,
    /// then `./sigma-archive.toml` if it exists. Without any, built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => env::var_os(CONFIG_ENV)
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from)
                .or_else(|| {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.is_file().then_some(local)
                }),
        };

        match path {
            Some(path) => {
                let config = Self::from_file(&path)?;
                log::debug!("Loaded config {}", path.display());
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Parse a JSON or TOML file; relative paths set inside it are taken
    /// from the file's directory. Built-in defaults stay as they are.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_bytes(&bytes)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let keys: PathKeys = parse_json_or_toml(&bytes)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            config.rebase(base, &keys);
        }
        config
            .aggregate
            .validate()
            .map_err(|err| anyhow!("{err} (in {})", path.display()))?;
        Ok(config)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        parse_json_or_toml(bytes)
    }

    /// Directory the browsing commands read from.
    pub fn browse_dir(&self) -> PathBuf {
        self.browse
            .data_dir
            .clone()
            .unwrap_or_else(|| self.aggregate.output_dir.clone())
    }

    fn rebase(&mut self, base: &Path, keys: &PathKeys) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if keys.aggregate.data_dir.is_some() {
            rebase(&mut self.aggregate.data_dir);
        }
        if keys.aggregate.output_dir.is_some() {
            rebase(&mut self.aggregate.output_dir);
        }
        if keys.browse.data_dir.is_some() {
            if let Some(dir) = self.browse.data_dir.as_mut() {
                rebase(dir);
            }
        }
    }
}

fn parse_json_or_toml<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let utf8 = std::str::from_utf8(bytes).context("Config is not valid UTF-8")?;
    match serde_json::from_str(utf8) {
        Ok(value) => Ok(value),
        Err(json_err) => toml::from_str(utf8).map_err(|toml_err| {
            anyhow!("Config is not valid JSON ({json_err}) or TOML ({toml_err})")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_toml_sections() {
        let config = ArchiveConfig::from_bytes(
            br#"
            [aggregate]
            data_dir = "archive/data"
            batch_size = 250

            [browse]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.aggregate.data_dir, PathBuf::from("archive/data"));
        assert_eq!(config.aggregate.batch_size, 250);
        assert_eq!(config.aggregate.top_authors, 50);
        assert_eq!(config.browse.page_size, 25);
        assert_eq!(config.browse_dir(), PathBuf::from("public/data"));
    }

    #[test]
    fn parses_json() {
        let config =
            ArchiveConfig::from_bytes(br#"{"browse":{"data_dir":"/srv/out"}}"#).unwrap();
        assert_eq!(config.browse_dir(), PathBuf::from("/srv/out"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ArchiveConfig::from_bytes(b"[aggregate]\nbatchsize = 3\n").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sigma-archive.toml");
        std::fs::write(
            &path,
            "[aggregate]\ndata_dir = \"raw\"\n\n[browse]\ndata_dir = \"/abs/out\"\n",
        )
        .unwrap();

        let config = ArchiveConfig::from_file(&path).unwrap();
        assert_eq!(config.aggregate.data_dir, temp.path().join("raw"));
        assert_eq!(config.aggregate.output_dir, PathBuf::from("public/data"));
        assert_eq!(config.browse_dir(), PathBuf::from("/abs/out"));
    }

    #[test]
    fn unset_paths_keep_their_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sigma-archive.toml");
        std::fs::write(&path, "[browse]\npage_size = 25\n").unwrap();

        let config = ArchiveConfig::from_file(&path).unwrap();
        assert_eq!(config.browse.page_size, 25);
        assert_eq!(config.aggregate.data_dir, PathBuf::from("data"));
        assert_eq!(config.aggregate.output_dir, PathBuf::from("public/data"));
        assert_eq!(config.browse_dir(), PathBuf::from("public/data"));
    }
}
