use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::marker::Tag;
use crate::navigation::LaneJumpMode;

/// Application configuration module
/// This module handles the configuration the surrounding application injects
/// into the engine: reserved tag identifiers, lane ordering and navigation
/// defaults. Nothing here is read from ambient state by the engine itself.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Reserved tag identifiers used by the classifier and grouping
    #[serde(default)]
    pub reserved_tags: ReservedTags,

    /// Explicit lane ordering settings
    #[serde(default)]
    pub lane_ordering: LaneOrderingConfig,

    /// Navigation defaults
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Reserved tag identifiers and naming conventions.
///
/// The classifier and grouping code only ever compare against this table,
/// so both can be tested without a live annotation store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReservedTags {
    /// Tag id marking a marker as confirmed by a reviewer
    #[serde(default)]
    pub status_confirmed_id: String,

    /// Tag id marking a marker as rejected by a reviewer
    #[serde(default)]
    pub status_rejected_id: String,

    /// Tag id marking a marker as created by hand
    #[serde(default)]
    pub source_manual_id: String,

    /// Primary tag id of scene-cut markers, which are excluded from lanes
    #[serde(default)]
    pub shot_boundary_id: Option<String>,

    /// Suffix that distinguishes AI-generated primary tags from their human equivalent
    #[serde(default = "default_ai_suffix")]
    pub ai_suffix: String,

    /// Id prefix of draft markers that have not been persisted yet
    #[serde(default = "default_temporary_id_prefix")]
    pub temporary_id_prefix: String,
}

impl Default for ReservedTags {
    fn default() -> Self {
        Self {
            status_confirmed_id: String::new(),
            status_rejected_id: String::new(),
            source_manual_id: String::new(),
            shot_boundary_id: None,
            ai_suffix: default_ai_suffix(),
            temporary_id_prefix: default_temporary_id_prefix(),
        }
    }
}

impl ReservedTags {
    /// Build a table from the three status/source tag ids, keeping default conventions
    pub fn new(
        status_confirmed_id: impl Into<String>,
        status_rejected_id: impl Into<String>,
        source_manual_id: impl Into<String>,
    ) -> Self {
        Self {
            status_confirmed_id: status_confirmed_id.into(),
            status_rejected_id: status_rejected_id.into(),
            source_manual_id: source_manual_id.into(),
            ..Self::default()
        }
    }

    /// Set the shot boundary tag id
    pub fn with_shot_boundary(mut self, tag_id: impl Into<String>) -> Self {
        self.shot_boundary_id = Some(tag_id.into());
        self
    }

    /// Whether a primary tag marks a scene cut rather than an action
    pub fn is_shot_boundary(&self, tag: &Tag) -> bool {
        self.shot_boundary_id.as_deref() == Some(tag.id.as_str())
    }

    /// Check that every id the classifier relies on is present and distinct
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("status_confirmed_id", &self.status_confirmed_id),
            ("status_rejected_id", &self.status_rejected_id),
            ("source_manual_id", &self.source_manual_id),
        ];

        for &(name, value) in required.iter() {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingReservedTag(name));
            }
        }

        for (i, &(first, a)) in required.iter().enumerate() {
            for &(second, b) in required.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::DuplicateReservedTag {
                        first,
                        second,
                        id: a.to_string(),
                    });
                }
            }
        }

        if self.ai_suffix.is_empty() {
            return Err(ConfigError::EmptyAiSuffix);
        }

        if self.temporary_id_prefix.is_empty() {
            return Err(ConfigError::EmptyTemporaryPrefix);
        }

        Ok(())
    }
}

/// Lane ordering settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LaneOrderingConfig {
    /// Parent tag whose children define an explicit lane order
    #[serde(default)]
    pub marker_group_parent_id: Option<String>,
}

/// Navigation defaults
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NavigationConfig {
    /// How cross-lane moves pick a marker in the target lane
    #[serde(default)]
    pub default_lane_jump: LaneJumpMode,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_ai_suffix() -> String {
    "_AI".to_string()
}

fn default_temporary_id_prefix() -> String {
    "temp-".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reserved_tags.validate()
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty-printed JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Per-user config location, e.g. `~/.config/markerlane/conf.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("markerlane").join("conf.json"))
    }
}
