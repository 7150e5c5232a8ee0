/*!
 * Data-quality checks for marker collections.
 *
 * The engine tolerates all of these conditions; this module only reports
 * them so the application can surface them:
 * - Start times that are negative or not finite
 * - End times at or before the start time
 * - Markers carrying both the confirmed and the rejected status tag
 * - Ids used by more than one marker
 */

use std::collections::HashMap;

use log::{debug, warn};

use crate::marker::Marker;
use crate::status::StatusClassifier;

/// Types of marker issues
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIssue {
    /// Start time is negative, NaN or infinite
    InvalidStartTime {
        start: f64,
    },
    /// End time is not after the start time
    InvalidTimeRange {
        start: f64,
        end: f64,
    },
    /// Both status tags present; classified as rejected
    ConflictingStatus,
    /// Another marker earlier in the list uses the same id
    DuplicateId {
        first_index: usize,
    },
}

impl std::fmt::Display for MarkerIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerIssue::InvalidStartTime { start } => {
                write!(f, "Invalid start time: {}", start)
            }
            MarkerIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: end {}s <= start {}s", end, start)
            }
            MarkerIssue::ConflictingStatus => {
                write!(f, "Marker is tagged both confirmed and rejected")
            }
            MarkerIssue::DuplicateId { first_index } => {
                write!(f, "Id already used by marker at index {}", first_index)
            }
        }
    }
}

/// Result of validating a single marker
#[derive(Debug, Clone)]
pub struct MarkerEntryResult {
    /// Id of the marker
    pub marker_id: String,
    /// Whether the marker passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<MarkerIssue>,
}

/// Result of validating a marker collection
#[derive(Debug, Clone)]
pub struct MarkerValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each marker, in input order
    pub entry_results: Vec<MarkerEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of markers with conflicting status tags
    pub conflict_count: usize,
    /// Number of markers reusing an earlier id
    pub duplicate_count: usize,
}

impl MarkerValidationResult {
    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&MarkerEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Validator for marker collections
pub struct MarkerValidator<'a> {
    classifier: &'a StatusClassifier,
}

impl<'a> MarkerValidator<'a> {
    pub fn new(classifier: &'a StatusClassifier) -> Self {
        Self { classifier }
    }

    /// Validate a single marker in isolation
    pub fn validate_entry(&self, marker: &Marker) -> MarkerEntryResult {
        let mut issues = Vec::new();

        if !marker.start_time.is_finite() || marker.start_time < 0.0 {
            issues.push(MarkerIssue::InvalidStartTime {
                start: marker.start_time,
            });
        }

        if let Some(end) = marker.end_time {
            if end <= marker.start_time {
                issues.push(MarkerIssue::InvalidTimeRange {
                    start: marker.start_time,
                    end,
                });
            }
        }

        if self.classifier.has_conflicting_status(marker) {
            issues.push(MarkerIssue::ConflictingStatus);
        }

        MarkerEntryResult {
            marker_id: marker.id.clone(),
            passed: issues.is_empty(),
            issues,
        }
    }

    /// Validate every marker and check ids for uniqueness
    pub fn validate_collection(&self, markers: &[Marker]) -> MarkerValidationResult {
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicate_count = 0;

        let entry_results: Vec<MarkerEntryResult> = markers
            .iter()
            .enumerate()
            .map(|(index, marker)| {
                let mut result = self.validate_entry(marker);
                match first_seen.get(marker.id.as_str()) {
                    Some(&first_index) => {
                        duplicate_count += 1;
                        result.issues.push(MarkerIssue::DuplicateId { first_index });
                        result.passed = false;
                    }
                    None => {
                        first_seen.insert(marker.id.as_str(), index);
                    }
                }
                result
            })
            .collect();

        let conflict_count = entry_results
            .iter()
            .filter(|r| r.issues.contains(&MarkerIssue::ConflictingStatus))
            .count();
        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        if !passed {
            warn!(
                "Marker data issues: {} issues across {} markers ({} status conflicts, {} duplicate ids)",
                total_issues,
                entry_results.iter().filter(|r| !r.passed).count(),
                conflict_count,
                duplicate_count
            );
        } else {
            debug!("Validated {} markers, no issues", markers.len());
        }

        MarkerValidationResult {
            passed,
            entry_results,
            total_issues,
            conflict_count,
            duplicate_count,
        }
    }
}
