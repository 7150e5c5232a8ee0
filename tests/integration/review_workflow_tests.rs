/*!
 * End-to-end review session scenarios: group, navigate, edit, regroup
 */

use markerlane::grouping::ExplicitLaneOrder;
use markerlane::marker::{new_temporary_id, Marker, Tag};
use markerlane::navigation::{LaneJumpMode, NavigationAction, NavigationEngine};
use markerlane::status::MarkerStatus;
use markerlane::summary::calculate_summary;
use markerlane::validation::{MarkerIssue, MarkerValidator};

use crate::common::{self, CONFIRMED, REJECTED};

/// Replace a marker by id, the way callers apply an edit
fn replace(markers: &mut [Marker], updated: Marker) {
    if let Some(slot) = markers.iter_mut().find(|m| m.id == updated.id) {
        *slot = updated;
    }
}

fn confirm(marker: &Marker) -> Marker {
    marker.clone().with_tags(vec![Tag::new(CONFIRMED, "Status: Confirmed")])
}

/// Test a reviewer confirming markers one by one via "next unprocessed"
#[test]
fn test_reviewSession_confirmingEachUnprocessed_shouldEndWithNoSelection() {
    common::init_logging();
    let classifier = common::classifier();
    let mut markers = vec![
        common::marker("k1", "Kissing", 0.0, Some(4.0)),
        common::marker("k2", "Kissing_AI", 2.0, Some(6.0)),
        common::marker("d1", "Dancing", 1.0, Some(3.0)),
        common::shot_boundary("cut", 5.0),
        common::marker_with_status("d2", "Dancing", 8.0, REJECTED),
    ];

    let mut selected: Option<String> = None;
    let mut visited = Vec::new();

    loop {
        // Layout is recomputed after every edit
        let layout = common::layout_for(&markers);
        let engine = NavigationEngine::new(&markers, Some(&layout), &classifier);
        selected = engine.navigate(NavigationAction::NextUnprocessedGlobal, selected.as_deref());

        let Some(id) = selected.clone() else { break };
        visited.push(id.clone());
        let current = markers.iter().find(|m| m.id == id).cloned().unwrap();
        replace(&mut markers, confirm(&current));
        assert!(visited.len() <= 3, "visited {:?}", visited);
    }

    assert_eq!(visited, vec!["k1", "d1", "k2"]);
    let actions = classifier.filter_action_markers(&markers);
    let summary = calculate_summary(&classifier, &actions);
    assert_eq!(summary.confirmed, 3);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.unknown, 0);
}

/// Five markers across two lanes; moving down from lane 0's last marker
#[test]
fn test_laneDown_fromLastMarkerOfFirstLane_shouldPickNearestInSecondLane() {
    let classifier = common::classifier();
    let markers = vec![
        common::marker("w1", "Walking", 0.0, Some(2.0)),
        common::marker("w2", "Walking", 30.0, Some(32.0)),
        common::marker("k1", "Kissing", 0.0, Some(3.0)),
        common::marker("k2", "Kissing", 12.0, Some(14.0)),
        common::marker("k3", "Kissing", 28.0, Some(29.0)),
    ];
    // Explicit order puts Walking first even though Kissing sorts earlier
    let order = ExplicitLaneOrder::new(
        "groups",
        vec![
            Tag::new("g1", "Marker Group: 1. Walking"),
            Tag::new("g2", "Marker Group: 2. Kissing"),
        ],
    );
    let layout = common::grouper().layout(&markers, Some(&order));
    let engine = NavigationEngine::new(&markers, Some(&layout), &classifier);

    assert_eq!(layout.groups[0].name, "Walking");
    let last_of_lane_zero = engine.next_in_lane(Some("w1")).unwrap();
    assert_eq!(last_of_lane_zero, "w2");

    let target = engine.navigate(
        NavigationAction::LaneDown(LaneJumpMode::TemporalLocality),
        Some(&last_of_lane_zero),
    );
    assert_eq!(target.as_deref(), Some("k3"));

    let first = engine.navigate(
        NavigationAction::LaneDown(LaneJumpMode::FirstMarker),
        Some(&last_of_lane_zero),
    );
    assert_eq!(first.as_deref(), Some("k1"));
}

/// Test an optimistic draft marker is navigable before it is persisted
#[test]
fn test_draftMarker_afterRegroup_shouldBeReachableInLane() {
    let classifier = common::classifier();
    let mut markers = vec![
        common::marker("1", "Kissing", 0.0, Some(5.0)),
        common::marker("2", "Kissing", 20.0, Some(25.0)),
    ];
    let draft_id = new_temporary_id(&classifier.reserved_tags().temporary_id_prefix);
    markers.push(common::marker(&draft_id, "Kissing", 10.0, Some(12.0)));

    let layout = common::layout_for(&markers);
    let engine = NavigationEngine::new(&markers, Some(&layout), &classifier);

    assert_eq!(engine.next_in_lane(Some("1")), Some(draft_id.clone()));
    assert_eq!(engine.next_in_lane(Some(&draft_id)).as_deref(), Some("2"));
    assert_eq!(
        classifier.classify(markers.last().unwrap()),
        MarkerStatus::Unprocessed
    );
}

/// Test splitting a marker (caller replaces one marker with two) regroups cleanly
#[test]
fn test_splitMarker_replacedByTwoHalves_shouldShareTrack() {
    let original = common::marker("m", "Kissing", 0.0, Some(10.0));
    let overlapping = common::marker("o", "Kissing", 2.0, Some(8.0));
    let before = common::layout_for(&[original.clone(), overlapping.clone()]);
    assert_eq!(before.groups[0].track_count, 2);

    let left = Marker::new("m", 0.0, Some(5.0), original.primary_tag.clone());
    let right = Marker::new("temp-right", 5.0, Some(10.0), original.primary_tag.clone());
    let after = common::layout_for(&[left, right, overlapping]);

    assert_eq!(after.groups[0].track_count, 2);
    assert_eq!(after.find("m").unwrap().track, 0);
    assert_eq!(after.find("temp-right").unwrap().track, 0);
    assert_eq!(after.find("o").unwrap().track, 1);
}

/// Test validation surfaces the problems the engine silently tolerates
#[test]
fn test_malformedData_shouldNavigateAndBeReported() {
    common::init_logging();
    let classifier = common::classifier();
    let markers = vec![
        common::marker("bad", "Kissing", 10.0, Some(4.0)),
        common::marker("ok", "Kissing", 5.0, Some(6.0)),
        common::marker("ok", "Dancing", 1.0, None),
        common::marker("both", "Kissing", 20.0, Some(21.0)).with_tags(vec![
            Tag::new(CONFIRMED, "Confirmed"),
            Tag::new(REJECTED, "Rejected"),
        ]),
    ];

    let layout = common::layout_for(&markers);
    assert_eq!(layout.tracked_markers().len(), 4);
    let engine = NavigationEngine::new(&markers, Some(&layout), &classifier);
    assert!(engine.next_chronological(Some("bad")).is_some());
    // Unknown selections fall back to the first marker instead of failing
    assert_eq!(engine.next_in_lane(Some("gone")).as_deref(), Some("ok"));

    let report = MarkerValidator::new(&classifier).validate_collection(&markers);
    assert!(!report.passed);
    assert_eq!(report.duplicate_count, 1);
    assert_eq!(report.conflict_count, 1);
    assert!(matches!(
        report.entry_results[0].issues[0],
        MarkerIssue::InvalidTimeRange { .. }
    ));
    assert_eq!(classifier.classify(&markers[3]), MarkerStatus::Rejected);
}
