//! Pointer interaction arbitration: click vs drag vs resize.
//!
//! The arbiter is an explicit state machine {idle, initiated, drag, resize}
//! with guarded transitions keyed on elapsed movement and host-supplied
//! timestamps; it owns no timers and never reads a clock. It emits
//! mode-transition signals and never mutates objects itself.

use crate::error::EngineError;
use crate::handle::Direction;
use crate::object::{CanvasObject, Geometry, ObjectId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Movement (canvas units) before an initiated press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;
/// Rolling double-click window in milliseconds.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 300.0;
/// Maximum distance between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Modifier keys state, sampled by the host on every pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// One pointer sample delivered by the host.
///
/// `timestamp_ms` is host-supplied milliseconds on any monotonic origin; the
/// arbiter only ever compares differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub position: Point,
    pub modifiers: Modifiers,
    pub timestamp_ms: f64,
}

impl PointerInput {
    /// Create a pointer sample.
    pub fn new(position: Point, modifiers: Modifiers, timestamp_ms: f64) -> Self {
        Self {
            position,
            modifiers,
            timestamp_ms,
        }
    }
}

/// Latest-wins buffer for pointer-move coalescing.
///
/// The host pushes every raw move event and drains the buffer once per
/// frame; superseded events are discarded before they are ever processed,
/// so at most one geometry recomputation runs per frame and a stale event
/// can never overwrite a later one.
#[derive(Debug, Clone, Default)]
pub struct MoveBuffer {
    pending: Option<PointerInput>,
}

impl MoveBuffer {
    /// Buffer a move event, replacing any pending one.
    pub fn push(&mut self, input: PointerInput) {
        self.pending = Some(input);
    }

    /// Take the latest pending event, leaving the buffer empty.
    pub fn take(&mut self) -> Option<PointerInput> {
        self.pending.take()
    }

    /// Drop any pending event.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Check if no event is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Transient record of an in-progress drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// The lead object being dragged.
    pub object_id: ObjectId,
    /// Other selected objects that follow the lead's motion.
    pub followers: Vec<ObjectId>,
    /// Pointer-down position.
    pub origin: Point,
    /// Lead geometry at session start.
    pub original: Geometry,
}

/// Transient record of an in-progress resize.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    pub object_id: ObjectId,
    /// The grip being dragged.
    pub direction: Direction,
    /// Pointer-down position.
    pub origin: Point,
    /// Geometry at session start.
    pub original: Geometry,
}

/// Externally visible arbiter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Idle,
    /// Pressed, still below the movement threshold.
    Initiated,
    Drag,
    Resize,
}

/// Mode-transition and movement signals emitted by the arbiter.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Press released below the drag threshold: a plain click.
    Clicked { object: ObjectId },
    /// Second press inside the double-click window: activate the object
    /// (e.g. enter text editing) instead of toggling selection.
    Activated { object: ObjectId },
    /// Movement crossed the threshold and the drag is now live. The
    /// promoting move's delta is included, so no motion is lost.
    DragStarted {
        object: ObjectId,
        delta: Vec2,
        modifiers: Modifiers,
    },
    /// An active drag advanced; `delta` is relative to the session origin.
    DragMoved {
        object: ObjectId,
        delta: Vec2,
        modifiers: Modifiers,
    },
    /// An active resize advanced.
    ResizeMoved {
        object: ObjectId,
        direction: Direction,
        delta: Vec2,
        modifiers: Modifiers,
    },
    /// Drag committed on pointer-up.
    DragEnded { object: ObjectId },
    /// Resize committed on pointer-up.
    ResizeEnded { object: ObjectId },
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Initiated(DragSession),
    Drag(DragSession),
    Resize(ResizeSession),
}

/// Classifies pointer input into clicks, drags, and resizes.
#[derive(Debug, Clone, Default)]
pub struct InteractionArbiter {
    state: State,
    /// Previous press, for the rolling double-click window.
    last_press: Option<(Point, f64)>,
}

impl InteractionArbiter {
    /// Create an idle arbiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        match self.state {
            State::Idle => Mode::Idle,
            State::Initiated(_) => Mode::Initiated,
            State::Drag(_) => Mode::Drag,
            State::Resize(_) => Mode::Resize,
        }
    }

    /// Check if a session is initiated or active.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// The drag session, while initiated or dragging.
    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.state {
            State::Initiated(session) | State::Drag(session) => Some(session),
            _ => None,
        }
    }

    /// The resize session, while resizing.
    pub fn resize_session(&self) -> Option<&ResizeSession> {
        match &self.state {
            State::Resize(session) => Some(session),
            _ => None,
        }
    }

    /// Record a press on an object.
    ///
    /// No session starts yet: the press sits in the initiated state until
    /// movement exceeds [`DRAG_THRESHOLD`], so a plain click is never
    /// misread as a micro-drag. A second press inside the double-click
    /// window fires [`Signal::Activated`] instead. `followers` are the
    /// other selected objects that will move with the lead if this press
    /// becomes a drag.
    pub fn pointer_down(
        &mut self,
        object: &CanvasObject,
        followers: Vec<ObjectId>,
        input: PointerInput,
    ) -> Result<Option<Signal>, EngineError> {
        if self.is_active() {
            return Err(EngineError::SessionActive);
        }
        if object.locked {
            return Err(EngineError::ObjectLocked(object.id()));
        }

        if let Some((position, timestamp_ms)) = self.last_press {
            let elapsed = input.timestamp_ms - timestamp_ms;
            let distance = input.position.distance(position);
            if elapsed <= DOUBLE_CLICK_WINDOW_MS && distance <= DOUBLE_CLICK_DISTANCE {
                // Reset so a triple click does not read as another double.
                self.last_press = None;
                log::debug!("double click on {}", object.id());
                return Ok(Some(Signal::Activated { object: object.id() }));
            }
        }
        self.last_press = Some((input.position, input.timestamp_ms));

        self.state = State::Initiated(DragSession {
            object_id: object.id(),
            followers,
            origin: input.position,
            original: object.geometry(),
        });
        Ok(None)
    }

    /// Start a resize session on a grip.
    ///
    /// Invoked when the press target is a resize handle: the geometry
    /// snapshot is captured immediately, with no move-threshold debounce.
    pub fn begin_resize(
        &mut self,
        object: &CanvasObject,
        direction: Direction,
        input: PointerInput,
    ) -> Result<(), EngineError> {
        if self.is_active() {
            return Err(EngineError::SessionActive);
        }
        if object.locked {
            return Err(EngineError::ObjectLocked(object.id()));
        }
        if direction == Direction::Move {
            return Err(EngineError::NotAResizeHandle(direction));
        }

        log::debug!("resize session on {} via {:?}", object.id(), direction);
        self.state = State::Resize(ResizeSession {
            object_id: object.id(),
            direction,
            origin: input.position,
            original: object.geometry(),
        });
        Ok(())
    }

    /// Advance the session with a pointer move.
    ///
    /// Modifier state is sampled from the input on every move and passed
    /// through in the emitted signal.
    pub fn pointer_move(&mut self, input: PointerInput) -> Option<Signal> {
        match &self.state {
            State::Idle => None,
            State::Initiated(session) => {
                let delta = input.position - session.origin;
                if delta.hypot() <= DRAG_THRESHOLD {
                    return None;
                }
                let session = session.clone();
                let signal = Signal::DragStarted {
                    object: session.object_id,
                    delta,
                    modifiers: input.modifiers,
                };
                log::debug!("drag session on {}", session.object_id);
                self.state = State::Drag(session);
                Some(signal)
            }
            State::Drag(session) => Some(Signal::DragMoved {
                object: session.object_id,
                delta: input.position - session.origin,
                modifiers: input.modifiers,
            }),
            State::Resize(session) => Some(Signal::ResizeMoved {
                object: session.object_id,
                direction: session.direction,
                delta: input.position - session.origin,
                modifiers: input.modifiers,
            }),
        }
    }

    /// End the session on pointer-up.
    ///
    /// A press that never crossed the threshold resolves to a click; live
    /// sessions commit and the arbiter returns to idle.
    pub fn pointer_up(&mut self, _input: PointerInput) -> Option<Signal> {
        match std::mem::take(&mut self.state) {
            State::Idle => None,
            State::Initiated(session) => Some(Signal::Clicked {
                object: session.object_id,
            }),
            State::Drag(session) => Some(Signal::DragEnded {
                object: session.object_id,
            }),
            State::Resize(session) => Some(Signal::ResizeEnded {
                object: session.object_id,
            }),
        }
    }

    /// Abort any session, e.g. when the object is deleted mid-interaction.
    ///
    /// Synchronous: after this returns, stray move events are no-ops.
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("interaction session cancelled");
        }
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ShapeType;

    fn object() -> CanvasObject {
        CanvasObject::shape(Point::new(100.0, 100.0), 100.0, 80.0, ShapeType::Rectangle)
    }

    fn input(x: f64, y: f64, timestamp_ms: f64) -> PointerInput {
        PointerInput::new(Point::new(x, y), Modifiers::default(), timestamp_ms)
    }

    #[test]
    fn test_click_below_threshold() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        assert_eq!(arbiter.mode(), Mode::Initiated);

        // Three units of jitter stays a click.
        assert_eq!(arbiter.pointer_move(input(113.0, 110.0, 16.0)), None);
        assert_eq!(
            arbiter.pointer_up(input(113.0, 110.0, 32.0)),
            Some(Signal::Clicked { object: target.id() })
        );
        assert_eq!(arbiter.mode(), Mode::Idle);
    }

    #[test]
    fn test_drag_promotion_past_threshold() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();

        let signal = arbiter.pointer_move(input(120.0, 110.0, 16.0)).unwrap();
        match signal {
            Signal::DragStarted { object, delta, .. } => {
                assert_eq!(object, target.id());
                assert!((delta.x - 10.0).abs() < f64::EPSILON);
            }
            other => panic!("expected DragStarted, got {other:?}"),
        }
        assert_eq!(arbiter.mode(), Mode::Drag);

        let signal = arbiter.pointer_move(input(125.0, 118.0, 32.0)).unwrap();
        match signal {
            Signal::DragMoved { delta, .. } => {
                assert!((delta.x - 15.0).abs() < f64::EPSILON);
                assert!((delta.y - 8.0).abs() < f64::EPSILON);
            }
            other => panic!("expected DragMoved, got {other:?}"),
        }
    }

    #[test]
    fn test_double_click_inside_window_activates() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        arbiter.pointer_up(input(110.0, 110.0, 40.0));

        let signal = arbiter
            .pointer_down(&target, vec![], input(111.0, 110.0, 200.0))
            .unwrap();
        assert_eq!(signal, Some(Signal::Activated { object: target.id() }));
        assert_eq!(arbiter.mode(), Mode::Idle);
    }

    #[test]
    fn test_second_click_after_window_is_plain() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        arbiter.pointer_up(input(110.0, 110.0, 40.0));

        let signal = arbiter
            .pointer_down(&target, vec![], input(110.0, 110.0, 400.0))
            .unwrap();
        assert_eq!(signal, None);
        assert_eq!(arbiter.mode(), Mode::Initiated);
    }

    #[test]
    fn test_second_click_too_far_is_plain() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        arbiter.pointer_up(input(110.0, 110.0, 40.0));

        let signal = arbiter
            .pointer_down(&target, vec![], input(160.0, 110.0, 100.0))
            .unwrap();
        assert_eq!(signal, None);
    }

    #[test]
    fn test_triple_click_does_not_activate_twice() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        arbiter.pointer_up(input(110.0, 110.0, 10.0));
        let second = arbiter
            .pointer_down(&target, vec![], input(110.0, 110.0, 100.0))
            .unwrap();
        assert!(matches!(second, Some(Signal::Activated { .. })));

        let third = arbiter
            .pointer_down(&target, vec![], input(110.0, 110.0, 200.0))
            .unwrap();
        assert_eq!(third, None);
    }

    #[test]
    fn test_locked_object_rejected_at_start() {
        let mut arbiter = InteractionArbiter::new();
        let target = object().with_locked(true);
        let result = arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0));
        assert_eq!(result, Err(EngineError::ObjectLocked(target.id())));
        assert_eq!(arbiter.mode(), Mode::Idle);

        let result = arbiter.begin_resize(&target, Direction::East, input(200.0, 140.0, 0.0));
        assert_eq!(result, Err(EngineError::ObjectLocked(target.id())));
    }

    #[test]
    fn test_begin_resize_has_no_debounce() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter
            .begin_resize(&target, Direction::SouthEast, input(200.0, 180.0, 0.0))
            .unwrap();
        assert_eq!(arbiter.mode(), Mode::Resize);

        // One unit of movement already reports.
        let signal = arbiter.pointer_move(input(201.0, 180.0, 16.0)).unwrap();
        match signal {
            Signal::ResizeMoved { direction, delta, .. } => {
                assert_eq!(direction, Direction::SouthEast);
                assert!((delta.x - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("expected ResizeMoved, got {other:?}"),
        }
    }

    #[test]
    fn test_move_is_not_a_resize_handle() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        let result = arbiter.begin_resize(&target, Direction::Move, input(0.0, 0.0, 0.0));
        assert_eq!(result, Err(EngineError::NotAResizeHandle(Direction::Move)));
    }

    #[test]
    fn test_press_during_session_rejected() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        let result = arbiter.pointer_down(&target, vec![], input(120.0, 110.0, 8.0));
        assert_eq!(result, Err(EngineError::SessionActive));
    }

    #[test]
    fn test_cancel_makes_stray_moves_no_ops() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter.pointer_down(&target, vec![], input(110.0, 110.0, 0.0)).unwrap();
        arbiter.pointer_move(input(130.0, 110.0, 16.0)).unwrap();
        assert_eq!(arbiter.mode(), Mode::Drag);

        arbiter.cancel();
        assert_eq!(arbiter.mode(), Mode::Idle);
        assert_eq!(arbiter.pointer_move(input(150.0, 110.0, 32.0)), None);
        assert_eq!(arbiter.pointer_up(input(150.0, 110.0, 48.0)), None);
    }

    #[test]
    fn test_modifiers_sampled_each_move() {
        let mut arbiter = InteractionArbiter::new();
        let target = object();
        arbiter
            .begin_resize(&target, Direction::East, input(200.0, 140.0, 0.0))
            .unwrap();

        let alt = Modifiers { alt: true, ..Modifiers::default() };
        let signal = arbiter
            .pointer_move(PointerInput::new(Point::new(210.0, 140.0), alt, 16.0))
            .unwrap();
        match signal {
            Signal::ResizeMoved { modifiers, .. } => assert!(modifiers.alt),
            other => panic!("expected ResizeMoved, got {other:?}"),
        }
    }

    #[test]
    fn test_move_buffer_keeps_latest_only() {
        let mut buffer = MoveBuffer::default();
        assert!(buffer.is_empty());
        buffer.push(input(10.0, 10.0, 0.0));
        buffer.push(input(20.0, 20.0, 8.0));
        let latest = buffer.take().unwrap();
        assert!((latest.position.x - 20.0).abs() < f64::EPSILON);
        assert!(buffer.take().is_none());
    }
}
