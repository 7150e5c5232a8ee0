/*!
 * Tests for swimlane grouping and track assignment
 */

use markerlane::grouping::{ExplicitLaneOrder, TagGroup};
use markerlane::marker::{Marker, Tag};

use crate::common;

fn lane_names(groups: &[TagGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.name.as_str()).collect()
}

fn tracks(group: &TagGroup) -> Vec<(&str, usize)> {
    group
        .markers
        .iter()
        .map(|t| (t.marker.id.as_str(), t.track))
        .collect()
}

/// Test that AI-suffixed tags share a lane with their human tag
#[test]
fn test_groupMarkersByTags_withAiSuffixedTag_shouldShareLane() {
    let markers = vec![
        Marker::new("1", 0.0, Some(2.0), Tag::new("10", "Kissing")),
        Marker::new("2", 1.0, Some(3.0), Tag::new("11", "Kissing_AI")),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(lane_names(&groups), vec!["Kissing"]);
    assert_eq!(tracks(&groups[0]), vec![("1", 0), ("2", 1)]);
}

/// Test alphabetical lane order without explicit ordering
#[test]
fn test_groupMarkersByTags_withoutExplicitOrder_shouldSortAlphabetically() {
    let markers = vec![
        common::marker("1", "Walking", 0.0, None),
        common::marker("2", "Dancing", 0.0, None),
        common::marker("3", "Kissing_AI", 0.0, None),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(lane_names(&groups), vec!["Dancing", "Kissing", "Walking"]);
    for (index, group) in groups.iter().enumerate() {
        assert_eq!(group.order, index);
        assert!(group.markers.iter().all(|t| t.swimlane == index));
    }
}

/// Test explicit ordering via marker group children, with unmapped lanes appended
#[test]
fn test_groupMarkersByTags_withExplicitOrder_shouldPlaceMappedLanesFirst() {
    let order = ExplicitLaneOrder::new(
        "marker-groups",
        vec![
            Tag::new("g10", "Marker Group: 10. Dancing"),
            Tag::new("g2", "Marker Group: 2. Walking"),
        ],
    );
    let markers = vec![
        common::marker("1", "Alpha", 0.0, None),
        common::marker("2", "Dancing", 0.0, None),
        common::marker("3", "Walking", 0.0, None),
        common::marker("4", "Kissing", 0.0, None),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, Some(&order));

    assert_eq!(lane_names(&groups), vec!["Walking", "Dancing", "Alpha", "Kissing"]);
}

/// Test the greedy track assignment end-to-end scenario
#[test]
fn test_groupMarkersByTags_withOverlappingPair_shouldUseTwoTracks() {
    let markers = vec![
        common::marker("A", "Kissing", 0.0, Some(10.0)),
        common::marker("B", "Kissing", 5.0, Some(15.0)),
        common::marker("C", "Kissing", 20.0, Some(30.0)),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].track_count, 2);
    assert_eq!(tracks(&groups[0]), vec![("A", 0), ("B", 1), ("C", 0)]);
}

/// Test reuse of the lowest free track
#[test]
fn test_groupMarkersByTags_withFreedTrack_shouldReuseLowestIndex() {
    let markers = vec![
        common::marker("a", "L", 0.0, Some(10.0)),
        common::marker("b", "L", 1.0, Some(4.0)),
        common::marker("c", "L", 2.0, Some(12.0)),
        common::marker("d", "L", 5.0, Some(6.0)),
        common::marker("e", "L", 10.0, Some(11.0)),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(groups[0].track_count, 3);
    assert_eq!(
        tracks(&groups[0]),
        vec![("a", 0), ("b", 1), ("c", 2), ("d", 1), ("e", 0)]
    );
}

/// Test intervals sharing a start time are ordered by id, not by length
#[test]
fn test_groupMarkersByTags_withSharedStartDifferentEnds_shouldOrderById() {
    let markers = vec![
        common::marker("b", "L", 0.0, Some(5.0)),
        common::marker("a", "L", 0.0, Some(10.0)),
        common::marker("p", "L", 0.0, None),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(groups[0].track_count, 2);
    assert_eq!(tracks(&groups[0]), vec![("p", 0), ("a", 0), ("b", 1)]);
}

/// Test markers sharing identical intervals get distinct tracks
#[test]
fn test_groupMarkersByTags_withIdenticalIntervals_shouldTerminateWithDistinctTracks() {
    let markers: Vec<Marker> = (0..50)
        .map(|i| common::marker(&format!("m{:02}", i), "L", 7.0, Some(9.0)))
        .collect();

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(groups[0].track_count, 50);
    let mut seen: Vec<usize> = groups[0].markers.iter().map(|t| t.track).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..50).collect::<Vec<_>>());
}

/// Test shot boundaries never appear in lanes
#[test]
fn test_groupMarkersByTags_withShotBoundaries_shouldExcludeThem() {
    let markers = vec![
        common::shot_boundary("s1", 0.0),
        common::shot_boundary("s2", 30.0),
        common::marker("1", "Kissing", 5.0, Some(6.0)),
    ];

    let groups = common::grouper().group_markers_by_tags(&markers, None);

    assert_eq!(lane_names(&groups), vec!["Kissing"]);
    assert_eq!(groups[0].markers.len(), 1);
}

/// Test temporary draft markers take part in grouping
#[test]
fn test_groupMarkersByTags_withTemporaryMarker_shouldIncludeIt() {
    let draft_id = markerlane::marker::new_temporary_id("temp-");
    let markers = vec![
        common::marker("1", "Kissing", 0.0, Some(10.0)),
        common::marker(&draft_id, "Kissing", 2.0, Some(4.0)),
    ];

    let layout = common::layout_for(&markers);

    let draft = layout.find(&draft_id).expect("draft should be tracked");
    assert_eq!(draft.swimlane, 0);
    assert_eq!(draft.track, 1);
}

/// Test that repeated grouping is identical
#[test]
fn test_groupMarkersByTags_calledTwice_shouldBeIdentical() {
    let markers = vec![
        common::marker("b", "Kissing", 5.0, Some(7.0)),
        common::marker("a", "Kissing", 5.0, Some(7.0)),
        common::marker("c", "Dancing_AI", 1.0, None),
        common::marker("d", "Dancing", 1.0, Some(3.0)),
    ];
    let grouper = common::grouper();

    let first = grouper.group_markers_by_tags(&markers, None);
    let second = grouper.group_markers_by_tags(&markers, None);

    assert_eq!(first, second);
}
