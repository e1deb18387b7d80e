//! Engine error types.

use crate::handle::Direction;
use crate::object::ObjectId;
use thiserror::Error;

/// Errors surfaced when starting a manipulation session.
///
/// Mid-session degeneracies (zero-sized candidates, missing canvas bounds,
/// stray events after cancellation) are clamped or ignored silently and
/// never reach this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The object is locked and rejects manipulation.
    #[error("object {0} is locked")]
    ObjectLocked(ObjectId),

    /// The object is not on the page.
    #[error("object {0} does not exist on this page")]
    ObjectNotFound(ObjectId),

    /// The direction does not name a resize grip.
    #[error("{0:?} is not a resize handle")]
    NotAResizeHandle(Direction),

    /// A session is already initiated or active.
    #[error("an interaction session is already active")]
    SessionActive,
}
