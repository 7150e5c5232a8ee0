/*!
 * Review status classification.
 *
 * A marker's status is never stored; it is derived from its tag set every
 * time it is needed, using the reserved tag table the application injects.
 * Precedence is fixed: rejected, then confirmed, then manual, then
 * unprocessed.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app_config::ReservedTags;
use crate::marker::Marker;

/// Review status of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    Confirmed,
    Rejected,
    Manual,
    Unprocessed,
}

impl fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerStatus::Confirmed => "confirmed",
            MarkerStatus::Rejected => "rejected",
            MarkerStatus::Manual => "manual",
            MarkerStatus::Unprocessed => "unprocessed",
        };
        write!(f, "{}", name)
    }
}

/// Classifies markers by the reserved status and source tags they carry
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    reserved: ReservedTags,
}

impl StatusClassifier {
    /// Create a classifier over the given reserved tag table
    pub fn new(reserved: ReservedTags) -> Self {
        Self { reserved }
    }

    /// The reserved tag table this classifier was built with
    pub fn reserved_tags(&self) -> &ReservedTags {
        &self.reserved
    }

    /// Derive the status of a marker from its tags
    pub fn classify(&self, marker: &Marker) -> MarkerStatus {
        if marker.has_tag(&self.reserved.status_rejected_id) {
            MarkerStatus::Rejected
        } else if marker.has_tag(&self.reserved.status_confirmed_id) {
            MarkerStatus::Confirmed
        } else if marker.has_tag(&self.reserved.source_manual_id) {
            MarkerStatus::Manual
        } else {
            MarkerStatus::Unprocessed
        }
    }

    pub fn is_unprocessed(&self, marker: &Marker) -> bool {
        self.classify(marker) == MarkerStatus::Unprocessed
    }

    /// Unprocessed markers, in their original order
    pub fn filter_unprocessed_markers<'a>(&self, markers: &'a [Marker]) -> Vec<&'a Marker> {
        markers.iter().filter(|m| self.is_unprocessed(m)).collect()
    }

    /// Whether a marker carries both the confirmed and the rejected tag.
    ///
    /// [`classify`](Self::classify) resolves this as rejected; callers may
    /// want to surface it as a data problem.
    pub fn has_conflicting_status(&self, marker: &Marker) -> bool {
        marker.has_tag(&self.reserved.status_rejected_id)
            && marker.has_tag(&self.reserved.status_confirmed_id)
    }

    /// Whether a marker takes part in lanes and navigation (i.e. is not a shot boundary)
    pub fn is_action_marker(&self, marker: &Marker) -> bool {
        !self.reserved.is_shot_boundary(&marker.primary_tag)
    }

    /// Action markers, in their original order
    pub fn filter_action_markers(&self, markers: &[Marker]) -> Vec<Marker> {
        markers
            .iter()
            .filter(|m| self.is_action_marker(m))
            .cloned()
            .collect()
    }
}
