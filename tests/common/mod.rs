/*!
 * Common test utilities for the markerlane test suite
 */

#![allow(dead_code)]

use markerlane::app_config::ReservedTags;
use markerlane::grouping::{MarkerGrouper, MarkerLayout};
use markerlane::marker::{Marker, Tag};
use markerlane::status::StatusClassifier;

pub const CONFIRMED: &str = "status-confirmed";
pub const REJECTED: &str = "status-rejected";
pub const MANUAL: &str = "source-manual";
pub const SHOT_BOUNDARY: &str = "shot-boundary";

/// Route library logging through env_logger when RUST_LOG is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Reserved tag table used across the test suite
pub fn reserved_tags() -> ReservedTags {
    ReservedTags::new(CONFIRMED, REJECTED, MANUAL).with_shot_boundary(SHOT_BOUNDARY)
}

pub fn classifier() -> StatusClassifier {
    StatusClassifier::new(reserved_tags())
}

pub fn grouper() -> MarkerGrouper {
    MarkerGrouper::new(reserved_tags())
}

/// Alphabetical layout for a marker list
pub fn layout_for(markers: &[Marker]) -> MarkerLayout {
    grouper().layout(markers, None)
}

/// Creates an unprocessed marker on a lane named after `tag`
pub fn marker(id: &str, tag: &str, start: f64, end: Option<f64>) -> Marker {
    Marker::new(id, start, end, Tag::new(format!("tag-{}", tag), tag))
}

/// Creates a marker carrying a single status/source tag
pub fn marker_with_status(id: &str, tag: &str, start: f64, status: &str) -> Marker {
    marker(id, tag, start, Some(start + 1.0)).with_tags(vec![Tag::new(status, status)])
}

pub fn shot_boundary(id: &str, start: f64) -> Marker {
    Marker::new(id, start, None, Tag::new(SHOT_BOUNDARY, "Shot Boundary"))
}
