/*!
 * # markerlane - Marker Timeline & Navigation Engine
 *
 * Pure, UI-independent logic for reviewing machine-generated time-interval
 * annotations ("markers") on a video.
 *
 * ## Features
 *
 * - Group markers into swimlanes by primary tag, folding AI-sourced tags
 *   onto their human equivalent
 * - Order lanes alphabetically or by an explicit marker-group tag hierarchy
 * - Assign overlap-free tracks inside each lane with the minimum track count
 * - Classify markers as confirmed, rejected, manual or unprocessed
 * - Keyboard navigation: chronological, within-lane, cross-lane and
 *   unprocessed-seeking, in both directions
 * - `mm:ss.mmm` time formatting and parsing
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_utils`: Time formatting, parsing and frame stepping
 * - `marker`: Marker and tag value types
 * - `app_config`: Configuration and the reserved tag table
 * - `status`: Review status classification
 * - `summary`: Status counts
 * - `grouping`: Swimlane grouping and track assignment
 * - `navigation`: Navigation operations over a layout snapshot
 * - `validation`: Data-quality reports for marker collections
 * - `errors`: Custom error types
 *
 * All engine operations are pure functions of their inputs; layouts are
 * recomputed on demand rather than cached.
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod grouping;
pub mod marker;
pub mod navigation;
pub mod status;
pub mod summary;
pub mod time_utils;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{Config, ReservedTags};
pub use errors::{AppError, ConfigError, TimeParseError};
pub use grouping::{ExplicitLaneOrder, MarkerGrouper, MarkerLayout, MarkerWithTrack, TagGroup};
pub use marker::{Marker, Tag};
pub use navigation::{LaneJumpMode, NavigationAction, NavigationEngine};
pub use status::{MarkerStatus, StatusClassifier};
pub use summary::{calculate_summary, MarkerSummary};
pub use time_utils::{format_seconds, parse_time_string, FRAME_STEP_SECONDS};
pub use validation::{MarkerIssue, MarkerValidator};
