//! Canvas object model.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for canvas objects.
pub type ObjectId = Uuid;

/// Minimum width any resize path may produce.
pub const MIN_WIDTH: f64 = 50.0;
/// Minimum height any resize path may produce.
pub const MIN_HEIGHT: f64 = 20.0;
/// Minimum font size for text objects.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Geometric variants of a shape object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
}

/// Text-specific attributes.
///
/// `content` is carried only so it can be handed to the text-measurement
/// collaborator after a width-changing resize; the engine never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAttrs {
    /// The text content.
    pub content: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Font family name as known to the host's text stack.
    pub font_family: String,
    /// Additional spacing between characters.
    #[serde(default)]
    pub letter_spacing: f64,
}

impl TextAttrs {
    /// Default font size for new text objects.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create text attributes with defaults for everything but content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: "Inter".to_string(),
            letter_spacing: 0.0,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }
}

/// Shape-specific attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeAttrs {
    pub shape_type: ShapeType,
}

/// Kind of a canvas object plus its kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Text(TextAttrs),
    Shape(ShapeAttrs),
    Line,
    Arrow,
    Image,
}

/// An object on the page: geometry plus kind-specific attributes.
///
/// Geometry is expressed as a top-left position with width/height in canvas
/// coordinates. Objects are mutated only through whole-object replacement
/// from engine output (see [`crate::page::Page::apply_update`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    pub(crate) id: ObjectId,
    pub kind: ObjectKind,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in radians (around the center).
    #[serde(default)]
    pub rotation: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Locked objects reject manipulation sessions at start.
    #[serde(default)]
    pub locked: bool,
}

fn default_opacity() -> f64 {
    1.0
}

impl CanvasObject {
    /// Create a new object of the given kind.
    pub fn new(kind: ObjectKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width,
            height,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
        }
    }

    /// Create a text object.
    pub fn text(position: Point, width: f64, height: f64, attrs: TextAttrs) -> Self {
        Self::new(ObjectKind::Text(attrs), position, width, height)
    }

    /// Create a shape object.
    pub fn shape(position: Point, width: f64, height: f64, shape_type: ShapeType) -> Self {
        Self::new(ObjectKind::Shape(ShapeAttrs { shape_type }), position, width, height)
    }

    /// Create a line object.
    pub fn line(position: Point, width: f64, height: f64) -> Self {
        Self::new(ObjectKind::Line, position, width, height)
    }

    /// Create an arrow object.
    pub fn arrow(position: Point, width: f64, height: f64) -> Self {
        Self::new(ObjectKind::Arrow, position, width, height)
    }

    /// Create an image object.
    pub fn image(position: Point, width: f64, height: f64) -> Self {
        Self::new(ObjectKind::Image, position, width, height)
    }

    /// Mark the object as locked.
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Get the center point.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Snapshot the current geometry for session delta math.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.position.x,
            y: self.position.y,
            width: self.width,
            height: self.height,
            font_size: self.font_size(),
        }
    }

    /// Font size, for text objects only.
    pub fn font_size(&self) -> Option<f64> {
        match &self.kind {
            ObjectKind::Text(attrs) => Some(attrs.font_size),
            _ => None,
        }
    }

    /// Text attributes, for text objects only.
    pub fn text_attrs(&self) -> Option<&TextAttrs> {
        match &self.kind {
            ObjectKind::Text(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Check if this object is a text object.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text(_))
    }

    /// Check if a point (in canvas coordinates) hits this object.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Translate the object in place.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Regenerate the id, for duplicating objects.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Pre-interaction geometry snapshot, taken at session start.
///
/// All drag/resize delta math is computed against this record rather than
/// against intermediate frames, so accumulated rounding never drifts the
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Font size at session start, for text objects.
    pub font_size: Option<f64>,
}

impl Geometry {
    /// Right edge coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge coordinate.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Partial geometry produced by the engine.
///
/// `None` fields leave the current value untouched. Applied via whole-object
/// replacement so readers between callbacks never observe a half-updated
/// object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
}

impl GeometryUpdate {
    /// An update that only moves the object.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Check if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the carried fields onto an object.
    ///
    /// A `font_size` on a non-text object is ignored.
    pub fn apply_to(&self, object: &mut CanvasObject) {
        if let Some(x) = self.x {
            object.position.x = x;
        }
        if let Some(y) = self.y {
            object.position.y = y;
        }
        if let Some(width) = self.width {
            object.width = width;
        }
        if let Some(height) = self.height {
            object.height = height;
        }
        if let Some(font_size) = self.font_size {
            if let ObjectKind::Text(attrs) = &mut object.kind {
                attrs.font_size = font_size;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let object = CanvasObject::shape(Point::new(10.0, 20.0), 100.0, 50.0, ShapeType::Rectangle);
        let bounds = object.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let object = CanvasObject::image(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(object.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!object.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(object.hit_test(Point::new(105.0, 50.0), 10.0)); // Within tolerance
    }

    #[test]
    fn test_geometry_snapshot() {
        let object = CanvasObject::text(
            Point::new(5.0, 6.0),
            200.0,
            40.0,
            TextAttrs::new("hello").with_font_size(36.0),
        );
        let geometry = object.geometry();
        assert!((geometry.x - 5.0).abs() < f64::EPSILON);
        assert!((geometry.right() - 205.0).abs() < f64::EPSILON);
        assert!((geometry.bottom() - 46.0).abs() < f64::EPSILON);
        assert_eq!(geometry.font_size, Some(36.0));
    }

    #[test]
    fn test_update_applies_carried_fields_only() {
        let mut object = CanvasObject::shape(Point::new(0.0, 0.0), 100.0, 80.0, ShapeType::Circle);
        let update = GeometryUpdate {
            x: Some(25.0),
            width: Some(120.0),
            ..Default::default()
        };
        update.apply_to(&mut object);
        assert!((object.position.x - 25.0).abs() < f64::EPSILON);
        assert!((object.position.y - 0.0).abs() < f64::EPSILON);
        assert!((object.width - 120.0).abs() < f64::EPSILON);
        assert!((object.height - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_font_size_ignored_for_non_text() {
        let mut object = CanvasObject::line(Point::new(0.0, 0.0), 100.0, 20.0);
        let update = GeometryUpdate {
            font_size: Some(12.0),
            ..Default::default()
        };
        update.apply_to(&mut object);
        assert_eq!(object.font_size(), None);
    }

    #[test]
    fn test_update_font_size_applied_to_text() {
        let mut object =
            CanvasObject::text(Point::new(0.0, 0.0), 200.0, 40.0, TextAttrs::new("hi"));
        let update = GeometryUpdate {
            font_size: Some(36.0),
            ..Default::default()
        };
        update.apply_to(&mut object);
        assert_eq!(object.font_size(), Some(36.0));
    }
}
