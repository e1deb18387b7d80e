//! Canvora Core Library
//!
//! Direct-manipulation geometry engine for the Canvora canvas editor: turns
//! raw pointer input into drag/resize updates for on-canvas objects and
//! computes the alignment guides that snap objects to each other and to the
//! canvas bounds. Rendering, persistence, and text editing live in the host.

pub mod engine;
pub mod error;
pub mod handle;
pub mod interaction;
pub mod object;
pub mod page;
pub mod resize;
pub mod snap;

pub use engine::{Editor, HeuristicMeasurer, TextMeasurer};
pub use error::EngineError;
pub use handle::{handles_for, hit_test_handles, Direction, Handle};
pub use interaction::{
    InteractionArbiter, Mode, Modifiers, MoveBuffer, PointerInput, Signal, DOUBLE_CLICK_WINDOW_MS,
    DRAG_THRESHOLD,
};
pub use object::{
    CanvasObject, Geometry, GeometryUpdate, ObjectId, ObjectKind, ShapeAttrs, ShapeType,
    TextAttrs, MIN_FONT_SIZE, MIN_HEIGHT, MIN_WIDTH,
};
pub use page::Page;
pub use resize::{aspect_locked, resize, ResizeResult};
pub use snap::{
    snap_position, snap_resize, AlignmentGuides, SnapResizeResult, SnapResult, SNAP_THRESHOLD,
};
