/*!
 * Swimlane grouping and track assignment.
 *
 * Markers are partitioned into lanes keyed by their primary tag name, with
 * AI-sourced tags folded onto their human equivalent by stripping the
 * configured suffix. Lanes are ordered either by an explicit marker-group
 * tag hierarchy or alphabetically. Inside each lane every marker gets a
 * track so that no two overlapping markers share one.
 *
 * Nothing here is cached: every call recomputes the layout from the marker
 * list it is given.
 */

use std::collections::BTreeMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ReservedTags;
use crate::marker::{Marker, Tag};

// @const: "<prefix text>: <int>. <label>" marker group tag names
static GROUP_POSITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^:]*:\s*(\d+)\.\s*(.+?)\s*$").unwrap()
});

/// Parse the numeric position and label out of a marker group tag name.
///
/// `"Marker Group: 3. Kissing"` yields `(3, "Kissing")`.
pub fn parse_group_position(name: &str) -> Option<(u32, String)> {
    let caps = GROUP_POSITION_REGEX.captures(name)?;
    let position = caps[1].parse().ok()?;
    Some((position, caps[2].to_string()))
}

/// Explicit lane ordering supplied by the application: a parent tag and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitLaneOrder {
    /// Id of the marker group parent tag
    pub parent_id: String,

    /// Child tags named `"<prefix>: <n>. <label>"`
    pub children: Vec<Tag>,
}

impl ExplicitLaneOrder {
    /// Use `children` as-is; the caller already resolved them as children of `parent_id`
    pub fn new(parent_id: impl Into<String>, children: Vec<Tag>) -> Self {
        Self {
            parent_id: parent_id.into(),
            children,
        }
    }

    /// Pick the children of `parent_id` out of a full tag list
    pub fn from_tags(parent_id: impl Into<String>, tags: &[Tag]) -> Self {
        let parent_id = parent_id.into();
        let children = tags
            .iter()
            .filter(|t| t.parent_ids.iter().any(|p| p == &parent_id))
            .cloned()
            .collect();
        Self { parent_id, children }
    }

    /// Position for a lane, looked up by label first, then by the lane's
    /// primary tags listing a child as parent. The lowest match wins.
    fn position_for(&self, lane_key: &str, markers: &[Marker]) -> Option<u32> {
        self.children
            .iter()
            .filter_map(|child| {
                let (position, label) = parse_group_position(&child.name)?;
                let by_label = label == lane_key;
                let by_parent = markers
                    .iter()
                    .any(|m| m.primary_tag.parent_ids.iter().any(|p| p == &child.id));
                (by_label || by_parent).then_some(position)
            })
            .min()
    }
}

/// A marker projected onto the layout: its lane index and track within the lane
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerWithTrack {
    pub marker: Marker,
    pub swimlane: usize,
    pub track: usize,
}

/// A named swimlane with its markers in track-assignment order
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    /// Folded lane name
    pub name: String,

    /// Position of this lane in the ordered lane list
    pub order: usize,

    /// Markers of this lane with their assigned tracks
    pub markers: Vec<MarkerWithTrack>,

    /// Number of tracks the lane needs
    pub track_count: usize,
}

/// Ordered lanes plus lookup helpers used by navigation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayout {
    pub groups: Vec<TagGroup>,
}

impl MarkerLayout {
    pub fn new(groups: Vec<TagGroup>) -> Self {
        Self { groups }
    }

    pub fn lane_count(&self) -> usize {
        self.groups.len()
    }

    /// All tracked markers, lane by lane
    pub fn tracked_markers(&self) -> Vec<MarkerWithTrack> {
        flatten_tracks(&self.groups)
    }

    /// Tracked entry for a marker id, if it is part of the layout
    pub fn find(&self, marker_id: &str) -> Option<&MarkerWithTrack> {
        self.groups
            .iter()
            .flat_map(|g| g.markers.iter())
            .find(|t| t.marker.id == marker_id)
    }

    /// Lane index of a marker id
    pub fn lane_of(&self, marker_id: &str) -> Option<usize> {
        self.find(marker_id).map(|t| t.swimlane)
    }

    /// Markers of one lane; empty for an out-of-range index
    pub fn lane_markers(&self, lane: usize) -> &[MarkerWithTrack] {
        self.groups
            .get(lane)
            .map(|g| g.markers.as_slice())
            .unwrap_or(&[])
    }
}

/// Flatten lanes into a single tracked list, lane by lane
pub fn flatten_tracks(groups: &[TagGroup]) -> Vec<MarkerWithTrack> {
    groups
        .iter()
        .flat_map(|g| g.markers.iter().cloned())
        .collect()
}

/// Greedy interval partitioning.
///
/// Markers are sorted by start time, then id, with zero-length markers ahead
/// of intervals that start at the same instant. Each one goes
/// on the lowest track whose last end time is at or before its start;
/// otherwise a new track opens. Returns the sorted markers paired with
/// their track and the number of tracks used.
pub fn assign_tracks(markers: &[Marker]) -> (Vec<(Marker, usize)>, usize) {
    let mut sorted: Vec<&Marker> = markers.iter().collect();
    // A point placed after an interval at its own start would need a track
    // of its own, so points go first.
    sorted.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then_with(|| has_extent(a).cmp(&has_extent(b)))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut track_ends: Vec<f64> = Vec::new();
    let mut assigned = Vec::with_capacity(sorted.len());

    for marker in sorted {
        let end = marker.end_or_start();
        if end < marker.start_time {
            warn!(
                "Marker {} ends at {} before it starts at {}",
                marker.id, end, marker.start_time
            );
        }
        let track = match track_ends.iter().position(|&t| t <= marker.start_time) {
            Some(free) => {
                track_ends[free] = end;
                free
            }
            None => {
                track_ends.push(end);
                track_ends.len() - 1
            }
        };
        assigned.push((marker.clone(), track));
    }

    (assigned, track_ends.len())
}

fn has_extent(marker: &Marker) -> bool {
    marker.end_or_start() > marker.start_time
}

/// Builds swimlanes from a flat marker list
#[derive(Debug, Clone)]
pub struct MarkerGrouper {
    reserved: ReservedTags,
}

impl MarkerGrouper {
    pub fn new(reserved: ReservedTags) -> Self {
        Self { reserved }
    }

    /// Lane key for a primary tag name: the name with the AI suffix stripped
    pub fn lane_key(&self, tag_name: &str) -> String {
        match tag_name.strip_suffix(self.reserved.ai_suffix.as_str()) {
            Some(stripped) if !stripped.is_empty() && !self.reserved.ai_suffix.is_empty() => {
                stripped.to_string()
            }
            _ => tag_name.to_string(),
        }
    }

    /// Group markers into ordered swimlanes with track assignments.
    ///
    /// Shot boundary markers are left out. Lanes never come back empty.
    pub fn group_markers_by_tags(
        &self,
        markers: &[Marker],
        explicit_order: Option<&ExplicitLaneOrder>,
    ) -> Vec<TagGroup> {
        let mut lanes: BTreeMap<String, Vec<Marker>> = BTreeMap::new();
        for marker in markers {
            if self.reserved.is_shot_boundary(&marker.primary_tag) {
                continue;
            }
            lanes
                .entry(self.lane_key(&marker.primary_tag.name))
                .or_default()
                .push(marker.clone());
        }

        // BTreeMap iteration is alphabetical, so a stable sort on the explicit
        // position keeps key order as the tie-break.
        let mut ordered: Vec<(Option<u32>, String, Vec<Marker>)> = lanes
            .into_iter()
            .map(|(key, lane_markers)| {
                let position = explicit_order.and_then(|o| o.position_for(&key, &lane_markers));
                (position, key, lane_markers)
            })
            .collect();
        ordered.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.1.cmp(&b.1)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.cmp(&b.1),
        });

        let groups: Vec<TagGroup> = ordered
            .into_iter()
            .enumerate()
            .map(|(order, (_, name, lane_markers))| {
                let (assigned, track_count) = assign_tracks(&lane_markers);
                let markers = assigned
                    .into_iter()
                    .map(|(marker, track)| MarkerWithTrack {
                        marker,
                        swimlane: order,
                        track,
                    })
                    .collect();
                TagGroup {
                    name,
                    order,
                    markers,
                    track_count,
                }
            })
            .collect();

        debug!(
            "Grouped {} markers into {} lanes ({} tracks)",
            markers.len(),
            groups.len(),
            groups.iter().map(|g| g.track_count).sum::<usize>()
        );

        groups
    }

    /// Group markers and wrap the result for navigation
    pub fn layout(&self, markers: &[Marker], explicit_order: Option<&ExplicitLaneOrder>) -> MarkerLayout {
        MarkerLayout::new(self.group_markers_by_tags(markers, explicit_order))
    }
}
