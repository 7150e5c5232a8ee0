use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::time_utils::format_seconds;

// @module: Marker and tag value types

/// A tag attached to a marker, either as its primary tag or as a status/source tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag identifier in the annotation store
    pub id: String,

    /// Display name
    pub name: String,

    /// Ids of this tag's parent tags
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

impl Tag {
    /// Create a tag with no parents
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_ids: Vec::new(),
        }
    }

    /// Create a tag that lists the given tag ids as parents
    pub fn with_parents(id: impl Into<String>, name: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// A time interval annotation on a video.
///
/// Markers are treated as immutable values: every derived view (lanes,
/// tracks, status, navigation targets) is computed from them and callers
/// replace a marker wholesale when it is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Identifier, unique within a scene
    pub id: String,

    /// Start of the interval in seconds
    pub start_time: f64,

    /// End of the interval in seconds, if the marker has a duration
    #[serde(default)]
    pub end_time: Option<f64>,

    /// Tag that decides the marker's lane
    pub primary_tag: Tag,

    /// Additional status and source tags
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Marker {
    /// Create a marker without status tags
    pub fn new(id: impl Into<String>, start_time: f64, end_time: Option<f64>, primary_tag: Tag) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            primary_tag,
            tags: Vec::new(),
        }
    }

    /// Builder-style helper attaching additional tags
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// End of the occupied interval; markers without an end time occupy
    /// a zero-length interval at their start.
    pub fn end_or_start(&self) -> f64 {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Whether the two intervals overlap. Touching endpoints do not count.
    pub fn overlaps(&self, other: &Marker) -> bool {
        self.start_time < other.end_or_start() && other.start_time < self.end_or_start()
    }

    /// Whether the marker carries a tag with the given id
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Whether this is an unsaved draft identified by the temporary id prefix
    pub fn is_temporary(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.id.starts_with(prefix)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.end_time {
            Some(end) => write!(
                f,
                "{} [{} - {}] {}",
                self.id,
                format_seconds(self.start_time, true),
                format_seconds(end, true),
                self.primary_tag.name
            ),
            None => write!(
                f,
                "{} [{}] {}",
                self.id,
                format_seconds(self.start_time, true),
                self.primary_tag.name
            ),
        }
    }
}

/// Generate an id for a draft marker that has not been persisted yet
pub fn new_temporary_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}

/// Total order used everywhere markers are sorted: start time, then id.
pub fn chronological_order(a: &Marker, b: &Marker) -> Ordering {
    a.start_time
        .total_cmp(&b.start_time)
        .then_with(|| a.id.cmp(&b.id))
}

/// Return references to `markers` sorted by [`chronological_order`]
pub fn sorted_chronologically(markers: &[Marker]) -> Vec<&Marker> {
    let mut sorted: Vec<&Marker> = markers.iter().collect();
    sorted.sort_by(|a, b| chronological_order(a, b));
    sorted
}

/// Read a JSON array of markers from disk
pub fn load_markers(path: &Path) -> Result<Vec<Marker>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::File(format!("{}: {}", path.display(), e)))?;
    let markers: Vec<Marker> = serde_json::from_str(&content)?;
    debug!("Read {} markers from {}", markers.len(), path.display());
    Ok(markers)
}

/// Read a JSON array of tags from disk
pub fn load_tags(path: &Path) -> Result<Vec<Tag>, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::File(format!("{}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&content)?)
}
