//! Pure resize computation for the eight handle directions.
//!
//! `resize` is referentially transparent: all "current state" (the object,
//! its pre-session geometry snapshot, siblings, canvas size, modifier keys)
//! is injected by the caller, and the result is a value describing the new
//! geometry. Nothing here mutates objects.

use crate::handle::Direction;
use crate::interaction::Modifiers;
use crate::object::{
    CanvasObject, Geometry, ObjectKind, ShapeType, MIN_FONT_SIZE, MIN_HEIGHT, MIN_WIDTH,
};
use crate::snap::{snap_resize, AlignmentGuides};
use kurbo::{Rect, Vec2};

/// Width comparison tolerance for `width_changed`.
const GEOM_EPSILON: f64 = 1e-9;

/// Output of one resize computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeResult {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// New font size for corner-resized text; `None` means unchanged.
    pub font_size: Option<f64>,
    /// Whether the width specifically changed. Callers use this to decide
    /// whether wrapped-text height must be re-measured afterwards.
    pub width_changed: bool,
    /// Guides from the edge-snap path; empty for corner resizes.
    pub guides: AlignmentGuides,
}

impl ResizeResult {
    fn unchanged(original: Geometry) -> Self {
        Self {
            x: original.x,
            y: original.y,
            width: original.width,
            height: original.height,
            font_size: None,
            width_changed: false,
            guides: AlignmentGuides::default(),
        }
    }
}

/// Whether a corner resize keeps the width/height ratio fixed.
///
/// Text and circle/triangle shapes are always locked; everything else is
/// free unless shift overrides.
pub fn aspect_locked(object: &CanvasObject, shift: bool) -> bool {
    match &object.kind {
        ObjectKind::Text(_) => true,
        ObjectKind::Shape(attrs) => match attrs.shape_type {
            ShapeType::Circle | ShapeType::Triangle => true,
            ShapeType::Rectangle => shift,
        },
        _ => shift,
    }
}

/// Compute the geometry produced by dragging a resize grip.
///
/// `original` is the pre-session snapshot and `delta` the total pointer
/// movement since the grip went down. The grip's opposite corner/edge stays
/// fixed unless alt holds the center fixed instead. Edge grips consult the
/// snap engine; corner grips do not. A locked object is returned unchanged;
/// such a session should have been rejected at start.
#[allow(clippy::too_many_arguments)]
pub fn resize(
    object: &CanvasObject,
    original: Geometry,
    direction: Direction,
    delta: Vec2,
    modifiers: Modifiers,
    siblings: &[Rect],
    canvas_width: f64,
    canvas_height: f64,
) -> ResizeResult {
    if object.locked || direction == Direction::Move {
        return ResizeResult::unchanged(original);
    }
    if direction.is_corner() {
        corner_resize(object, original, direction, delta, modifiers)
    } else {
        edge_resize(
            object,
            original,
            direction,
            delta,
            modifiers,
            siblings,
            canvas_width,
            canvas_height,
        )
    }
}

/// Origin of the resized box: the grip's opposite corner/edge stays fixed,
/// or the center when alt is held.
fn anchored_origin(
    original: Geometry,
    direction: Direction,
    width: f64,
    height: f64,
    alt: bool,
) -> (f64, f64) {
    let x = if alt {
        original.x - (width - original.width) / 2.0
    } else if direction.touches_left() {
        original.right() - width
    } else {
        original.x
    };
    let y = if alt {
        original.y - (height - original.height) / 2.0
    } else if direction.touches_top() {
        original.bottom() - height
    } else {
        original.y
    };
    (x, y)
}

fn corner_resize(
    object: &CanvasObject,
    original: Geometry,
    direction: Direction,
    delta: Vec2,
    modifiers: Modifiers,
) -> ResizeResult {
    let orig_width = original.width.max(1.0);
    let orig_height = original.height.max(1.0);

    let mut width = if direction.touches_right() {
        original.width + delta.x
    } else {
        original.width - delta.x
    };
    let mut height = if direction.touches_bottom() {
        original.height + delta.y
    } else {
        original.height - delta.y
    };
    // Minimums apply before ratio derivation, so a locked ratio is computed
    // from already-clamped dimensions.
    width = width.max(MIN_WIDTH);
    height = height.max(MIN_HEIGHT);

    if aspect_locked(object, modifiers.shift) {
        let scale_w = width / orig_width;
        let scale_h = height / orig_height;
        // The larger proportional growth wins; diagonal motion against the
        // lock direction must not shrink the box.
        let mut scale = scale_w.max(scale_h);
        let floor = (MIN_WIDTH / orig_width).max(MIN_HEIGHT / orig_height);
        scale = scale.max(floor);
        width = orig_width * scale;
        height = orig_height * scale;
    }

    let (x, y) = anchored_origin(original, direction, width, height, modifiers.alt);

    let font_size = match (&object.kind, original.font_size) {
        (ObjectKind::Text(_), Some(size)) => {
            Some((size * width / orig_width).round().max(MIN_FONT_SIZE))
        }
        _ => None,
    };

    ResizeResult {
        x,
        y,
        width,
        height,
        font_size,
        width_changed: (width - original.width).abs() > GEOM_EPSILON,
        guides: AlignmentGuides::default(),
    }
}

#[allow(clippy::too_many_arguments)]
fn edge_resize(
    object: &CanvasObject,
    original: Geometry,
    direction: Direction,
    delta: Vec2,
    modifiers: Modifiers,
    siblings: &[Rect],
    canvas_width: f64,
    canvas_height: f64,
) -> ResizeResult {
    let mut width = original.width;
    let mut height = original.height;
    match direction {
        Direction::East => width = original.width + delta.x,
        Direction::West => width = original.width - delta.x,
        Direction::South => height = original.height + delta.y,
        Direction::North => height = original.height - delta.y,
        _ => unreachable!("edge directions only"),
    }
    width = width.max(MIN_WIDTH);
    height = height.max(MIN_HEIGHT);

    let (x, y) = anchored_origin(original, direction, width, height, modifiers.alt);

    // The moving edge may lock onto sibling edges/centers or the canvas
    // edges/midlines; corner resize never snaps.
    let snap = snap_resize(
        object,
        width,
        height,
        x,
        y,
        direction,
        siblings,
        canvas_width,
        canvas_height,
        true,
        true,
    );

    ResizeResult {
        x: snap.x,
        y: snap.y,
        width: snap.width,
        height: snap.height,
        font_size: None,
        width_changed: (snap.width - original.width).abs() > GEOM_EPSILON,
        guides: snap.guides,
    }
}
