//! Page object store consumed by the engine.
//!
//! The engine reads the object list, selection set, and canvas size from
//! here on every call, and writes back exclusively through whole-object
//! replacement ([`Page::apply_update`] / [`Page::apply_batch`]), so a reader
//! between callbacks never observes a half-updated object. Persistence and
//! re-render scheduling belong to the host.

use crate::object::{CanvasObject, GeometryUpdate, ObjectId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One page's objects, z-order, selection, and canvas size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Canvas width in canvas units.
    pub width: f64,
    /// Canvas height in canvas units.
    pub height: f64,
    /// All objects on the page, keyed by id.
    objects: HashMap<ObjectId, CanvasObject>,
    /// Z-order of objects (back to front).
    z_order: Vec<ObjectId>,
    /// Currently selected objects.
    selection: HashSet<ObjectId>,
}

impl Page {
    /// Create an empty page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            objects: HashMap::new(),
            z_order: Vec::new(),
            selection: HashSet::new(),
        }
    }

    /// Add an object on top of the stack. Returns its id.
    pub fn add_object(&mut self, object: CanvasObject) -> ObjectId {
        let id = object.id();
        self.z_order.push(id);
        self.objects.insert(id, object);
        id
    }

    /// Remove an object, dropping it from z-order and selection.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<CanvasObject> {
        self.z_order.retain(|&object_id| object_id != id);
        self.selection.remove(&id);
        self.objects.remove(&id)
    }

    /// Get an object by id.
    pub fn object(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.get(&id)
    }

    /// Number of objects on the page.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the page has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in z-order (back to front).
    pub fn objects_ordered(&self) -> impl Iterator<Item = &CanvasObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Bring an object to the front (topmost).
    pub fn bring_to_front(&mut self, id: ObjectId) {
        if self.objects.contains_key(&id) {
            self.z_order.retain(|&object_id| object_id != id);
            self.z_order.push(id);
        }
    }

    /// Send an object to the back (bottommost).
    pub fn send_to_back(&mut self, id: ObjectId) {
        if self.objects.contains_key(&id) {
            self.z_order.retain(|&object_id| object_id != id);
            self.z_order.insert(0, id);
        }
    }

    /// Topmost object hit by a point, if any.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        self.z_order
            .iter()
            .rev()
            .find(|id| {
                self.objects
                    .get(id)
                    .is_some_and(|object| object.hit_test(point, tolerance))
            })
            .copied()
    }

    /// Select a single object, clearing the rest of the selection.
    pub fn select(&mut self, id: ObjectId) {
        if self.objects.contains_key(&id) {
            self.selection.clear();
            self.selection.insert(id);
        }
    }

    /// Add an object to the selection.
    pub fn add_to_selection(&mut self, id: ObjectId) {
        if self.objects.contains_key(&id) {
            self.selection.insert(id);
        }
    }

    /// Toggle an object's selection membership.
    pub fn toggle_selection(&mut self, id: ObjectId) {
        if self.selection.contains(&id) {
            self.selection.remove(&id);
        } else {
            self.add_to_selection(id);
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Check if an object is selected.
    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// The selection set.
    pub fn selection(&self) -> &HashSet<ObjectId> {
        &self.selection
    }

    /// Bounds of every object except the given ids, in z-order.
    ///
    /// These are the snap targets for a manipulation: the session's own
    /// objects are excluded so a dragged group never snaps to itself.
    pub fn sibling_bounds(&self, exclude: &[ObjectId]) -> Vec<Rect> {
        self.objects_ordered()
            .filter(|object| !exclude.contains(&object.id()))
            .map(CanvasObject::bounds)
            .collect()
    }

    /// Replace an object's geometry from engine output.
    ///
    /// The replacement is whole-object: the stored object is cloned, the
    /// update applied, and the result swapped in atomically. Returns false
    /// for an unknown id.
    pub fn apply_update(&mut self, id: ObjectId, update: GeometryUpdate) -> bool {
        let Some(current) = self.objects.get(&id) else {
            return false;
        };
        let mut next = current.clone();
        update.apply_to(&mut next);
        self.objects.insert(id, next);
        true
    }

    /// Translate a set of objects by one shared delta, as a single batch.
    pub fn apply_batch(&mut self, ids: &[ObjectId], delta: Vec2) {
        for id in ids {
            if let Some(object) = self.objects.get_mut(id) {
                object.translate(delta);
            }
        }
    }
}
