/*!
 * Keyboard navigation over the marker timeline.
 *
 * Every operation is a pure function of the marker list, the current
 * layout and the selected marker id. The engine never changes selection
 * itself; it returns the id the caller should select next (or `None`).
 *
 * Ordering everywhere is start time, then marker id, so repeated calls on
 * the same input always land on the same marker.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::grouping::MarkerLayout;
use crate::marker::{chronological_order, Marker};
use crate::status::StatusClassifier;

/// How a cross-lane move picks its target inside the destination lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneJumpMode {
    /// Marker whose start time is closest to the current marker's start time
    #[default]
    TemporalLocality,
    /// First marker of the lane by start time
    FirstMarker,
}

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One navigation request, as bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    NextChronological,
    PreviousChronological,
    NextInLane,
    PreviousInLane,
    LaneUp(LaneJumpMode),
    LaneDown(LaneJumpMode),
    NextUnprocessedInLane,
    PreviousUnprocessedInLane,
    NextUnprocessedGlobal,
    PreviousUnprocessedGlobal,
}

/// Computes navigation targets over one snapshot of markers and layout
pub struct NavigationEngine<'a> {
    markers: &'a [Marker],
    layout: Option<&'a MarkerLayout>,
    classifier: &'a StatusClassifier,
}

impl<'a> NavigationEngine<'a> {
    /// `layout` may be `None` before the first layout pass; lane-based
    /// operations then fall back to their chronological counterparts.
    pub fn new(
        markers: &'a [Marker],
        layout: Option<&'a MarkerLayout>,
        classifier: &'a StatusClassifier,
    ) -> Self {
        Self {
            markers,
            layout,
            classifier,
        }
    }

    /// Run a single action and return the id to select
    pub fn navigate(&self, action: NavigationAction, selected: Option<&str>) -> Option<String> {
        let target = match action {
            NavigationAction::NextChronological => self.next_chronological(selected),
            NavigationAction::PreviousChronological => self.previous_chronological(selected),
            NavigationAction::NextInLane => self.next_in_lane(selected),
            NavigationAction::PreviousInLane => self.previous_in_lane(selected),
            NavigationAction::LaneUp(mode) => self.lane_up(selected, mode),
            NavigationAction::LaneDown(mode) => self.lane_down(selected, mode),
            NavigationAction::NextUnprocessedInLane => self.next_unprocessed_in_lane(selected),
            NavigationAction::PreviousUnprocessedInLane => {
                self.previous_unprocessed_in_lane(selected)
            }
            NavigationAction::NextUnprocessedGlobal => self.next_unprocessed_global(selected),
            NavigationAction::PreviousUnprocessedGlobal => {
                self.previous_unprocessed_global(selected)
            }
        };
        debug!("Navigation {:?} from {:?} -> {:?}", action, selected, target);
        target
    }

    pub fn next_chronological(&self, selected: Option<&str>) -> Option<String> {
        step(&self.chronological(), selected, Direction::Forward)
    }

    pub fn previous_chronological(&self, selected: Option<&str>) -> Option<String> {
        step(&self.chronological(), selected, Direction::Backward)
    }

    pub fn next_in_lane(&self, selected: Option<&str>) -> Option<String> {
        self.step_in_lane(selected, Direction::Forward)
    }

    pub fn previous_in_lane(&self, selected: Option<&str>) -> Option<String> {
        self.step_in_lane(selected, Direction::Backward)
    }

    /// Move to the previous lane
    pub fn lane_up(&self, selected: Option<&str>, mode: LaneJumpMode) -> Option<String> {
        self.jump_lane(selected, Direction::Backward, mode)
    }

    /// Move to the next lane
    pub fn lane_down(&self, selected: Option<&str>, mode: LaneJumpMode) -> Option<String> {
        self.jump_lane(selected, Direction::Forward, mode)
    }

    pub fn next_unprocessed_in_lane(&self, selected: Option<&str>) -> Option<String> {
        self.unprocessed_in_lane(selected, Direction::Forward)
    }

    pub fn previous_unprocessed_in_lane(&self, selected: Option<&str>) -> Option<String> {
        self.unprocessed_in_lane(selected, Direction::Backward)
    }

    pub fn next_unprocessed_global(&self, selected: Option<&str>) -> Option<String> {
        self.unprocessed_global(selected, Direction::Forward)
    }

    pub fn previous_unprocessed_global(&self, selected: Option<&str>) -> Option<String> {
        self.unprocessed_global(selected, Direction::Backward)
    }

    /// Action markers sorted by start time, then id
    fn chronological(&self) -> Vec<&'a Marker> {
        let mut sorted: Vec<&'a Marker> = self
            .markers
            .iter()
            .filter(|m| self.classifier.is_action_marker(m))
            .collect();
        sorted.sort_by(|a, b| chronological_order(a, b));
        sorted
    }

    /// Markers of one lane sorted by start time, then id
    fn lane_sorted(&self, layout: &'a MarkerLayout, lane: usize) -> Vec<&'a Marker> {
        let mut sorted: Vec<&'a Marker> = layout
            .lane_markers(lane)
            .iter()
            .map(|t| &t.marker)
            .collect();
        sorted.sort_by(|a, b| chronological_order(a, b));
        sorted
    }

    /// Layout and lane index of the selection, when both are known
    fn selected_lane(&self, selected: Option<&str>) -> Option<(&'a MarkerLayout, usize)> {
        let layout = self.layout?;
        let id = selected?;
        match layout.lane_of(id) {
            Some(lane) => Some((layout, lane)),
            None => {
                warn!("Marker {} is not in the current layout", id);
                None
            }
        }
    }

    fn step_in_lane(&self, selected: Option<&str>, direction: Direction) -> Option<String> {
        match self.selected_lane(selected) {
            Some((layout, lane)) => step(&self.lane_sorted(layout, lane), selected, direction),
            None => step(&self.chronological(), selected, direction),
        }
    }

    fn jump_lane(
        &self,
        selected: Option<&str>,
        direction: Direction,
        mode: LaneJumpMode,
    ) -> Option<String> {
        let Some(layout) = self.layout else {
            return selected.map(str::to_string);
        };

        let Some((_, lane)) = self.selected_lane(selected) else {
            return self.lane_sorted(layout, 0).first().map(|m| m.id.clone());
        };
        // selected_lane only succeeds with a selection present in the layout
        let current = layout.find(selected?)?;

        let target_lane = match direction {
            Direction::Backward => lane.saturating_sub(1),
            Direction::Forward => (lane + 1).min(layout.lane_count().saturating_sub(1)),
        };
        if target_lane == lane {
            return Some(current.marker.id.clone());
        }

        let candidates = self.lane_sorted(layout, target_lane);
        let target = match mode {
            LaneJumpMode::FirstMarker => candidates.first().copied(),
            LaneJumpMode::TemporalLocality => {
                closest_by_start(&candidates, current.marker.start_time)
            }
        };

        match target {
            Some(marker) => Some(marker.id.clone()),
            None => Some(current.marker.id.clone()),
        }
    }

    fn unprocessed_in_lane(&self, selected: Option<&str>, direction: Direction) -> Option<String> {
        let Some((layout, lane)) = self.selected_lane(selected) else {
            return self.unprocessed_global(selected, direction);
        };

        let sorted = self.lane_sorted(layout, lane);
        let current = selected.and_then(|id| sorted.iter().position(|m| m.id == id))?;

        match self.scan_unprocessed(&sorted, current, direction) {
            Some(found) => Some(found.id.clone()),
            None => Some(sorted[current].id.clone()),
        }
    }

    fn unprocessed_global(&self, selected: Option<&str>, direction: Direction) -> Option<String> {
        let sorted = self.chronological();
        let current = selected.and_then(|id| sorted.iter().position(|m| m.id == id));

        let found = match current {
            Some(index) => self.scan_unprocessed(&sorted, index, direction),
            None => match direction {
                Direction::Forward => sorted.iter().copied().find(|m| self.classifier.is_unprocessed(m)),
                Direction::Backward => sorted
                    .iter()
                    .rev()
                    .copied()
                    .find(|m| self.classifier.is_unprocessed(m)),
            },
        };

        found.map(|m| m.id.clone())
    }

    /// Scan away from `current` in `direction`, wrapping to the opposite end
    /// and stopping just before `current`.
    fn scan_unprocessed(
        &self,
        sorted: &[&'a Marker],
        current: usize,
        direction: Direction,
    ) -> Option<&'a Marker> {
        let len = sorted.len();
        let order: Vec<usize> = match direction {
            Direction::Forward => (current + 1..len).chain(0..current).collect(),
            Direction::Backward => (0..current).rev().chain((current + 1..len).rev()).collect(),
        };

        order
            .into_iter()
            .map(|i| sorted[i])
            .find(|m| self.classifier.is_unprocessed(m))
    }
}

/// Move one position from the selection, clamping at both ends.
/// Without a (known) selection the first marker is returned.
fn step(sorted: &[&Marker], selected: Option<&str>, direction: Direction) -> Option<String> {
    let first = sorted.first()?;

    let Some(id) = selected else {
        return Some(first.id.clone());
    };
    let Some(index) = sorted.iter().position(|m| m.id == id) else {
        warn!("Selected marker {} not found, falling back to first marker", id);
        return Some(first.id.clone());
    };

    let target = match direction {
        Direction::Forward => (index + 1).min(sorted.len() - 1),
        Direction::Backward => index.saturating_sub(1),
    };
    Some(sorted[target].id.clone())
}

/// Candidate with the smallest start time distance; the earliest wins ties
fn closest_by_start<'m>(candidates: &[&'m Marker], start_time: f64) -> Option<&'m Marker> {
    let mut best: Option<(&'m Marker, f64)> = None;
    for &candidate in candidates {
        let distance = (candidate.start_time - start_time).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(marker, _)| marker)
}
