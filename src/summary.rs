use serde::{Deserialize, Serialize};

use crate::marker::Marker;
use crate::status::{MarkerStatus, StatusClassifier};

/// Marker counts by review outcome.
///
/// `unknown` holds every marker that is neither confirmed nor rejected,
/// manual markers included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSummary {
    pub confirmed: usize,
    pub rejected: usize,
    pub unknown: usize,
}

impl MarkerSummary {
    pub fn total(&self) -> usize {
        self.confirmed + self.rejected + self.unknown
    }
}

/// Count markers by status
pub fn calculate_summary(classifier: &StatusClassifier, markers: &[Marker]) -> MarkerSummary {
    markers
        .iter()
        .fold(MarkerSummary::default(), |mut summary, marker| {
            match classifier.classify(marker) {
                MarkerStatus::Confirmed => summary.confirmed += 1,
                MarkerStatus::Rejected => summary.rejected += 1,
                MarkerStatus::Manual | MarkerStatus::Unprocessed => summary.unknown += 1,
            }
            summary
        })
}
