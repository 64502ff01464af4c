//! Configuration management for nexus-prompt
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (nexus-prompt.toml)
//! - Environment variables (NEXUS_PROMPT__*)
//!
//! ## Example config file (nexus-prompt.toml):
//! ```toml
//! [walk]
//! extensions = ["md"]
//! skip_dirs = ["node_modules", ".git", "dist", "build", "coverage", "target"]
//! skip_prefixes = ["framework-"]
//!
//! [lint]
//! unused_inputs_are_errors = false
//!
//! [format]
//! show_diff = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Target discovery
    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub format: FormatConfig,
}

/// Which files `fmt` and `lint` pick up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// File extensions to process, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// File name prefixes to ignore
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    /// Report declared-but-unused inputs as errors instead of warnings
    #[serde(default)]
    pub unused_inputs_are_errors: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Print a unified diff for files that `fmt --check` would change
    #[serde(default)]
    pub show_diff: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    ["node_modules", ".git", "dist", "build", "coverage", "target"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_skip_prefixes() -> Vec<String> {
    vec!["framework-".to_string()]
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            skip_prefixes: default_skip_prefixes(),
        }
    }
}

impl WalkConfig {
    pub fn skips_dir(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.skip_dirs.iter().any(|d| *d == name)
    }

    pub fn accepts_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if self.skip_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return false;
        }
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

impl PromptConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "nexus-prompt.toml",
            ".nexus-prompt.toml",
            "config/nexus-prompt.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "nexus", "nexus-prompt") {
            let xdg_config = config_dir.config_dir().join("nexus-prompt.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // NEXUS_PROMPT__LINT__UNUSED_INPUTS_ARE_ERRORS=true
        builder = builder.add_source(
            Environment::with_prefix("NEXUS_PROMPT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PromptConfig::default();
        assert!(!config.lint.unused_inputs_are_errors);
        assert_eq!(config.walk.extensions, vec!["md"]);
        assert!(config.walk.skip_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_serialize_config() {
        let config = PromptConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[walk]"));
        assert!(toml_str.contains("[lint]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[lint]\nunused_inputs_are_errors = true\n").unwrap();

        let config = PromptConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert!(config.lint.unused_inputs_are_errors);
        assert_eq!(config.walk.skip_prefixes, vec!["framework-"]);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = PromptConfig::default();
        config.format.show_diff = true;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = PromptConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert!(loaded.format.show_diff);
    }

    #[test]
    fn test_accepts_file() {
        let walk = WalkConfig::default();
        assert!(walk.accepts_file(Path::new("docs/prompt.md")));
        assert!(walk.accepts_file(Path::new("docs/PROMPT.MD")));
        assert!(!walk.accepts_file(Path::new("docs/framework-base.md")));
        assert!(!walk.accepts_file(Path::new("docs/notes.txt")));
        assert!(!walk.accepts_file(Path::new("docs/README")));
    }
}
