//! Optional file selection rules.
//!
//! Discovery consults these rules for every regular file before the date
//! check. With no configuration file every file is selected. Rules come from a
//! TOML file:
//!
//! ```toml
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["**/cache/**"]
//! extensions = ["tmp", "part"]
//! regex = ['^~\$']
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Glob patterns are matched against the path relative to the source root,
//! so `cache/**` only excludes a `cache` directory at the top of a source.

use crate::config::ConfigError;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".ordnarc.toml";

/// File selection rules as written in the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files whose name starts with "." are selected. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist; a match here overrides every exclude rule.
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g. ".DS_Store").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns over the root-relative path.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, compared case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regular expressions over the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Loads the filter configuration.
    ///
    /// Lookup order:
    /// 1. `config_path`, when given
    /// 2. `.ordnarc.toml` in the current directory
    /// 3. `~/.config/ordna/config.toml`
    /// 4. defaults (select everything)
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed. An
    /// explicit `config_path` that does not exist is an error; missing
    /// implicit files are not.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("ordna")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validates every pattern and builds the matcher used by discovery.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-parsed rules ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Whether the file at `relative_path` (relative to its source root) is selected.
    ///
    /// Include patterns win; otherwise the file is dropped by the first
    /// matching rule among hidden-file, file name, extension, glob and regex.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}
