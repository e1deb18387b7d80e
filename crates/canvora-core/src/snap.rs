//! Alignment snapping for drags and edge resizes.
//!
//! Both entry points are pure: the caller injects the manipulated object,
//! the sibling bounds, and the canvas size, and gets back snapped
//! coordinates plus the guide lines that produced them. The two axes are
//! fully independent; a result may snap on one, both, or neither.

use crate::handle::Direction;
use crate::object::{CanvasObject, MIN_HEIGHT, MIN_WIDTH};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Distance threshold for alignment snapping (in canvas units).
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Tolerance when testing whether a feature sits exactly on a target.
const ALIGN_EPSILON: f64 = 1e-6;

/// Alignment guide lines currently within snapping distance.
///
/// `vertical` holds x coordinates, `horizontal` holds y coordinates, both in
/// canvas space. Published to the overlay renderer and cleared when the
/// session ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuides {
    /// X coordinates of vertical guide lines.
    pub vertical: Vec<f64>,
    /// Y coordinates of horizontal guide lines.
    pub horizontal: Vec<f64>,
}

impl AlignmentGuides {
    /// Check if no guides are active.
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    /// Drop all guides.
    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal.clear();
    }

    /// Add a vertical guide, ignoring near-duplicates.
    pub fn push_vertical(&mut self, x: f64) {
        if !self.vertical.iter().any(|v| (v - x).abs() < ALIGN_EPSILON) {
            self.vertical.push(x);
        }
    }

    /// Add a horizontal guide, ignoring near-duplicates.
    pub fn push_horizontal(&mut self, y: f64) {
        if !self.horizontal.iter().any(|v| (v - y).abs() < ALIGN_EPSILON) {
            self.horizontal.push(y);
        }
    }
}

/// Result of snapping a drag candidate position.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Snapped (or unchanged) x coordinate.
    pub x: f64,
    /// Snapped (or unchanged) y coordinate.
    pub y: f64,
    /// Guides that produced the snap; empty per axis when that axis kept its
    /// candidate.
    pub guides: AlignmentGuides,
}

/// Result of snapping an edge-resize candidate geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResizeResult {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub guides: AlignmentGuides,
}

/// One axis's winning match.
struct AxisSnap {
    /// Correction to add to the candidate coordinate.
    offset: f64,
    /// The target coordinate the feature locked onto.
    target: f64,
}

/// Edge and center positions of a box on one axis.
fn axis_features(origin: f64, extent: f64) -> [f64; 3] {
    [origin, origin + extent, origin + extent / 2.0]
}

/// Alignment targets on one axis: canvas edges and centerline first, then
/// sibling edges and centers in the order given. Target order is the
/// tie-break order.
fn axis_targets(siblings: &[Rect], canvas_extent: f64, vertical: bool) -> Vec<f64> {
    let mut targets = Vec::with_capacity(3 + siblings.len() * 3);
    targets.extend([0.0, canvas_extent, canvas_extent / 2.0]);
    for rect in siblings {
        if vertical {
            targets.extend([rect.x0, rect.x1, (rect.x0 + rect.x1) / 2.0]);
        } else {
            targets.extend([rect.y0, rect.y1, (rect.y0 + rect.y1) / 2.0]);
        }
    }
    targets
}

/// Nearest qualifying (feature, target) pair on one axis.
///
/// Targets are scanned in tie-break order; only a strictly smaller distance
/// replaces the current best, so equidistant matches resolve to the earliest
/// target (canvas bounds before siblings, siblings in given order).
fn best_axis_snap(features: &[f64], targets: &[f64], threshold: f64) -> Option<AxisSnap> {
    let mut best_distance = f64::INFINITY;
    let mut best: Option<AxisSnap> = None;
    for &target in targets {
        for &feature in features {
            let distance = (target - feature).abs();
            if distance <= threshold && distance < best_distance {
                best_distance = distance;
                best = Some(AxisSnap {
                    offset: target - feature,
                    target,
                });
            }
        }
    }
    best
}

/// Record every target the (snapped) feature set aligns with exactly.
fn collect_aligned(features: &[f64], targets: &[f64], mut push: impl FnMut(f64)) {
    for &target in targets {
        if features.iter().any(|f| (f - target).abs() < ALIGN_EPSILON) {
            push(target);
        }
    }
}

/// Snap a drag candidate position against sibling and canvas features.
///
/// Compares the moved object's left/right/top/bottom edges and centers with
/// the same features of every sibling and with the canvas edges/centerlines.
/// A match within [`SNAP_THRESHOLD`] replaces the candidate coordinate with
/// the exact target; the guides that now align are reported per axis.
/// Returns the candidates unchanged when not actively dragging a selected
/// object, or when the canvas bounds are degenerate.
pub fn snap_position(
    object: &CanvasObject,
    candidate_x: f64,
    candidate_y: f64,
    siblings: &[Rect],
    canvas_width: f64,
    canvas_height: f64,
    is_dragging: bool,
    is_selected: bool,
) -> SnapResult {
    let mut result = SnapResult {
        x: candidate_x,
        y: candidate_y,
        guides: AlignmentGuides::default(),
    };
    if !is_dragging || !is_selected {
        return result;
    }
    if canvas_width <= 0.0 || canvas_height <= 0.0 {
        log::trace!("degenerate canvas bounds, snapping skipped");
        return result;
    }

    let x_targets = axis_targets(siblings, canvas_width, true);
    let y_targets = axis_targets(siblings, canvas_height, false);

    if let Some(snap) = best_axis_snap(
        &axis_features(candidate_x, object.width),
        &x_targets,
        SNAP_THRESHOLD,
    ) {
        result.x = candidate_x + snap.offset;
        log::trace!("drag snapped to vertical guide at {}", snap.target);
    }
    if let Some(snap) = best_axis_snap(
        &axis_features(candidate_y, object.height),
        &y_targets,
        SNAP_THRESHOLD,
    ) {
        result.y = candidate_y + snap.offset;
        log::trace!("drag snapped to horizontal guide at {}", snap.target);
    }

    let guides = &mut result.guides;
    collect_aligned(&axis_features(result.x, object.width), &x_targets, |t| {
        guides.push_vertical(t);
    });
    collect_aligned(&axis_features(result.y, object.height), &y_targets, |t| {
        guides.push_horizontal(t);
    });
    result
}

/// Snap an edge-resize candidate geometry.
///
/// Only the edge named by `direction` participates: it may lock onto sibling
/// edges/centers or the canvas edges/midlines, adjusting the corresponding
/// dimension (and origin, for north/west) so the edge lands exactly on the
/// target. Corner directions return the candidates unchanged; corner
/// resize deliberately does not snap.
#[allow(clippy::too_many_arguments)]
pub fn snap_resize(
    object: &CanvasObject,
    candidate_width: f64,
    candidate_height: f64,
    candidate_x: f64,
    candidate_y: f64,
    direction: Direction,
    siblings: &[Rect],
    canvas_width: f64,
    canvas_height: f64,
    is_resizing: bool,
    is_selected: bool,
) -> SnapResizeResult {
    let mut result = SnapResizeResult {
        x: candidate_x,
        y: candidate_y,
        width: candidate_width,
        height: candidate_height,
        guides: AlignmentGuides::default(),
    };
    if !is_resizing || !is_selected || !direction.is_edge() {
        return result;
    }
    if canvas_width <= 0.0 || canvas_height <= 0.0 {
        log::trace!("degenerate canvas bounds, snapping skipped");
        return result;
    }

    match direction {
        Direction::East => {
            let targets = axis_targets(siblings, canvas_width, true);
            let edge = candidate_x + candidate_width;
            if let Some(snap) = best_axis_snap(&[edge], &targets, SNAP_THRESHOLD) {
                let width = candidate_width + snap.offset;
                if width >= MIN_WIDTH {
                    result.width = width;
                    result.guides.push_vertical(snap.target);
                    log::trace!("resize edge snapped to x={} for {}", snap.target, object.id());
                }
            }
        }
        Direction::West => {
            let targets = axis_targets(siblings, canvas_width, true);
            if let Some(snap) = best_axis_snap(&[candidate_x], &targets, SNAP_THRESHOLD) {
                let width = candidate_width - snap.offset;
                if width >= MIN_WIDTH {
                    result.x = snap.target;
                    result.width = width;
                    result.guides.push_vertical(snap.target);
                    log::trace!("resize edge snapped to x={} for {}", snap.target, object.id());
                }
            }
        }
        Direction::South => {
            let targets = axis_targets(siblings, canvas_height, false);
            let edge = candidate_y + candidate_height;
            if let Some(snap) = best_axis_snap(&[edge], &targets, SNAP_THRESHOLD) {
                let height = candidate_height + snap.offset;
                if height >= MIN_HEIGHT {
                    result.height = height;
                    result.guides.push_horizontal(snap.target);
                    log::trace!("resize edge snapped to y={} for {}", snap.target, object.id());
                }
            }
        }
        Direction::North => {
            let targets = axis_targets(siblings, canvas_height, false);
            if let Some(snap) = best_axis_snap(&[candidate_y], &targets, SNAP_THRESHOLD) {
                let height = candidate_height - snap.offset;
                if height >= MIN_HEIGHT {
                    result.y = snap.target;
                    result.height = height;
                    result.guides.push_horizontal(snap.target);
                    log::trace!("resize edge snapped to y={} for {}", snap.target, object.id());
                }
            }
        }
        _ => unreachable!("edge directions only"),
    }
    result
}
