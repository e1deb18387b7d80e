//! Editor facade: drives drag/resize sessions end to end.
//!
//! Control flow per the host's event loop: `pointer_down` routes the press,
//! every raw move lands in a latest-wins buffer via `pointer_move`, and
//! `tick` (called once per frame) performs at most one geometry
//! recomputation, consults the snap engine, applies the result to the page
//! through whole-object replacement, and republishes the guides for the
//! overlay. `pointer_up` commits and clears; `cancel` aborts.

use crate::error::EngineError;
use crate::handle::Direction;
use crate::interaction::{
    InteractionArbiter, Mode, Modifiers, MoveBuffer, PointerInput, Signal,
};
use crate::object::{GeometryUpdate, ObjectId, TextAttrs};
use crate::page::Page;
use crate::resize::resize;
use crate::snap::{snap_position, AlignmentGuides};
use kurbo::Vec2;

/// Text layout collaborator.
///
/// The engine never implements text layout. After a width-changing text
/// resize the editor asks this seam for the wrapped height at the new width
/// and reconciles the object's height with the answer.
pub trait TextMeasurer {
    /// Height of `content` laid out at `width` with the given attributes.
    fn measure_height(&self, content: &str, width: f64, attrs: &TextAttrs) -> f64;
}

/// Character-count approximation of wrapped text height.
///
/// A stand-in for hosts without a text stack wired up (and for tests); real
/// hosts measure with their renderer's layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure_height(&self, content: &str, width: f64, attrs: &TextAttrs) -> f64 {
        // Average glyph width approximated from the font size.
        let char_width = (attrs.font_size * 0.55 + attrs.letter_spacing).max(1.0);
        let per_line = (width / char_width).floor().max(1.0);
        let mut lines = 0.0;
        for line in content.lines() {
            lines += (line.chars().count() as f64 / per_line).ceil().max(1.0);
        }
        lines = lines.max(1.0);
        lines * attrs.font_size * 1.2
    }
}

/// Drives manipulation sessions against a [`Page`].
///
/// Owns only transient interaction state (arbiter, pending move, guides);
/// all document state is injected per call, so identical inputs always
/// produce identical updates.
#[derive(Debug, Default)]
pub struct Editor {
    arbiter: InteractionArbiter,
    moves: MoveBuffer,
    guides: AlignmentGuides,
}

impl Editor {
    /// Create an idle editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current arbiter mode.
    pub fn mode(&self) -> Mode {
        self.arbiter.mode()
    }

    /// Guides for the overlay renderer; empty outside an active session.
    pub fn guides(&self) -> &AlignmentGuides {
        &self.guides
    }

    /// Route a press on an object.
    ///
    /// If the target is part of the current selection, the rest of the
    /// selection becomes followers of the prospective drag.
    pub fn pointer_down(
        &mut self,
        page: &Page,
        target: ObjectId,
        input: PointerInput,
    ) -> Result<Option<Signal>, EngineError> {
        let object = page
            .object(target)
            .ok_or(EngineError::ObjectNotFound(target))?;
        let followers = if page.is_selected(target) {
            page.selection()
                .iter()
                .copied()
                .filter(|id| *id != target)
                .collect()
        } else {
            Vec::new()
        };
        self.arbiter.pointer_down(object, followers, input)
    }

    /// Route a press on a resize handle.
    pub fn begin_resize(
        &mut self,
        page: &Page,
        target: ObjectId,
        direction: Direction,
        input: PointerInput,
    ) -> Result<(), EngineError> {
        let object = page
            .object(target)
            .ok_or(EngineError::ObjectNotFound(target))?;
        self.arbiter.begin_resize(object, direction, input)
    }

    /// Buffer a pointer move for the next tick.
    ///
    /// Moves may arrive faster than the display refresh; only the most
    /// recent pending one survives to be processed.
    pub fn pointer_move(&mut self, input: PointerInput) {
        self.moves.push(input);
    }

    /// Process the latest pending move: at most one geometry recomputation.
    ///
    /// Applies the (possibly snapped) result to the page and republishes
    /// the guides. Returns the arbiter signal for the host, or `None` when
    /// nothing was pending or the session is idle/below threshold.
    pub fn tick(&mut self, page: &mut Page, measurer: &dyn TextMeasurer) -> Option<Signal> {
        let input = self.moves.take()?;
        let signal = self.arbiter.pointer_move(input)?;
        match &signal {
            Signal::DragStarted { object, delta, .. }
            | Signal::DragMoved { object, delta, .. } => {
                self.apply_drag(page, *object, *delta);
            }
            Signal::ResizeMoved {
                object,
                direction,
                delta,
                modifiers,
            } => {
                self.apply_resize(page, measurer, *object, *direction, *delta, *modifiers);
            }
            _ => {}
        }
        Some(signal)
    }

    /// Commit the session on pointer-up and clear guides and pending moves.
    pub fn pointer_up(&mut self, input: PointerInput) -> Option<Signal> {
        self.moves.clear();
        self.guides.clear();
        self.arbiter.pointer_up(input)
    }

    /// Abort any session, e.g. after an external reset.
    ///
    /// Synchronous: stray moves still queued with the host apply nothing
    /// afterwards.
    pub fn cancel(&mut self) {
        self.arbiter.cancel();
        self.moves.clear();
        self.guides.clear();
    }

    fn apply_drag(&mut self, page: &mut Page, lead: ObjectId, delta: Vec2) {
        let (followers, original) = match self.arbiter.drag_session() {
            Some(session) => (session.followers.clone(), session.original),
            None => return,
        };
        let Some(object) = page.object(lead) else {
            // Lead vanished mid-session (external delete): drop everything.
            self.cancel();
            return;
        };

        let candidate_x = original.x + delta.x;
        let candidate_y = original.y + delta.y;
        let mut exclude = followers.clone();
        exclude.push(lead);
        let siblings = page.sibling_bounds(&exclude);
        let snapped = snap_position(
            object,
            candidate_x,
            candidate_y,
            &siblings,
            page.width,
            page.height,
            true,
            page.is_selected(lead),
        );

        // Followers get the lead's exact post-snap frame delta, applied as
        // one batch per frame; they never re-run the snap engine, so the
        // group stays rigid relative to the lead's motion.
        let before = object.position;
        let frame_delta = Vec2::new(snapped.x - before.x, snapped.y - before.y);
        page.apply_update(lead, GeometryUpdate::at(snapped.x, snapped.y));
        if !followers.is_empty() {
            page.apply_batch(&followers, frame_delta);
        }
        self.guides = snapped.guides;
    }

    fn apply_resize(
        &mut self,
        page: &mut Page,
        measurer: &dyn TextMeasurer,
        target: ObjectId,
        direction: Direction,
        delta: Vec2,
        modifiers: Modifiers,
    ) {
        let original = match self.arbiter.resize_session() {
            Some(session) => session.original,
            None => return,
        };
        let Some(object) = page.object(target) else {
            self.cancel();
            return;
        };

        let siblings = page.sibling_bounds(&[target]);
        let result = resize(
            object,
            original,
            direction,
            delta,
            modifiers,
            &siblings,
            page.width,
            page.height,
        );

        let mut update = GeometryUpdate {
            x: Some(result.x),
            y: Some(result.y),
            width: Some(result.width),
            height: Some(result.height),
            font_size: result.font_size,
        };
        // Reconcile wrapped-text height once the width actually changed.
        if result.width_changed {
            if let Some(attrs) = object.text_attrs() {
                let mut attrs = attrs.clone();
                if let Some(font_size) = result.font_size {
                    attrs.font_size = font_size;
                }
                update.height =
                    Some(measurer.measure_height(&attrs.content, result.width, &attrs));
            }
        }
        page.apply_update(target, update);
        self.guides = result.guides;
    }
}
