//! Configuration loading and resolution.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    paths,
    walk::WalkOptions,
};

/// Directory name used for the default target, next to the source tree.
const DEFAULT_TARGET_NAME: &str = "codex-skills";

/// Resolved settings for a conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the tree being converted.
    source: PathBuf,
    /// Root of the tree receiving converted output.
    target: PathBuf,
    /// Walker settings.
    walk: WalkOptions,
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    /// Source tree root.
    source: Option<String>,
    /// Target tree root.
    target: Option<String>,
    /// Entry names excluded from the walk.
    skip: Option<Vec<String>>,
    /// Directory groups whose children are lifted to the top level.
    flatten: Option<Vec<String>>,
    /// Accepted skill file names, in priority order.
    skill_files: Option<Vec<String>>,
    /// Top-level documentation files to copy.
    docs: Option<Vec<String>>,
}

/// Command line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit config file path.
    pub(crate) config: Option<PathBuf>,
    /// Source root from the command line.
    pub(crate) source: Option<PathBuf>,
    /// Target root from the command line.
    pub(crate) target: Option<PathBuf>,
}

impl Config {
    /// Create a config from explicit roots with default walker settings.
    #[cfg(test)]
    pub(crate) fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            walk: WalkOptions::default(),
        }
    }

    /// Load the config file (explicit or default) and apply overrides.
    pub(crate) fn load(overrides: &Overrides) -> Result<Self> {
        let cwd = env::current_dir().map_err(|error| Error::DirRead {
            path: PathBuf::from("."),
            source: error,
        })?;
        Self::load_with(overrides, &cwd)
    }

    /// Load with relative command line paths resolved against `cwd`.
    fn load_with(overrides: &Overrides, cwd: &Path) -> Result<Self> {
        let (raw, base_dir) = match &overrides.config {
            Some(path) => {
                let path = cwd.join(path);
                let raw = read_raw(&path)?.ok_or_else(|| Error::ConfigMissing {
                    path: path.clone(),
                })?;
                (raw, config_dir(&path))
            }
            None => {
                let path = paths::default_config_path()?;
                let raw = read_raw(&path)?.unwrap_or_default();
                (raw, config_dir(&path))
            }
        };

        Self::resolve(raw, &base_dir, cwd, overrides)
    }

    /// Combine file values, overrides and defaults.
    fn resolve(raw: RawConfig, base_dir: &Path, cwd: &Path, overrides: &Overrides) -> Result<Self> {
        let source = match (&overrides.source, &raw.source) {
            (Some(path), _) => paths::normalize_path(&cwd.join(path)),
            (None, Some(raw)) => paths::expand_path(raw, base_dir)?,
            (None, None) => paths::normalize_path(cwd),
        };

        let target = match (&overrides.target, &raw.target) {
            (Some(path), _) => paths::normalize_path(&cwd.join(path)),
            (None, Some(raw)) => paths::expand_path(raw, base_dir)?,
            (None, None) => default_target(&source),
        };

        let defaults = WalkOptions::default();
        let walk = WalkOptions {
            skip: raw.skip.unwrap_or(defaults.skip),
            flatten: raw.flatten.unwrap_or(defaults.flatten),
            skill_files: raw.skill_files.unwrap_or(defaults.skill_files),
            docs: raw.docs.unwrap_or(defaults.docs),
        };

        Ok(Self {
            source,
            target,
            walk,
        })
    }

    /// Fail unless both roots exist as directories.
    pub(crate) fn ensure_roots(&self) -> Result<()> {
        if !self.source.is_dir() {
            return Err(Error::SourceMissing {
                path: self.source.clone(),
            });
        }
        if !self.target.is_dir() {
            return Err(Error::TargetMissing {
                path: self.target.clone(),
            });
        }
        Ok(())
    }

    /// Return the source root.
    pub(crate) fn source(&self) -> &Path {
        &self.source
    }

    /// Return the target root.
    pub(crate) fn target(&self) -> &Path {
        &self.target
    }

    /// Return the walker settings.
    pub(crate) fn walk(&self) -> &WalkOptions {
        &self.walk
    }
}

/// Read and parse a config file, returning `None` when it does not exist.
fn read_raw(path: &Path) -> Result<Option<RawConfig>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source: error,
            });
        }
    };

    let raw = toml::from_str(&contents).map_err(|error| Error::ConfigParse {
        path: path.to_path_buf(),
        source: error,
    })?;
    Ok(Some(raw))
}

/// Directory that relative paths in a config file resolve against.
fn config_dir(path: &Path) -> PathBuf {
    path.parent().unwrap_or(Path::new(".")).to_path_buf()
}

/// The default target: a `codex-skills` sibling of the source root.
fn default_target(source: &Path) -> PathBuf {
    let parent = source.parent().unwrap_or(source);
    paths::normalize_path(&parent.join(DEFAULT_TARGET_NAME))
}
