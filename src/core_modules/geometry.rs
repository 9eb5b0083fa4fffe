// THEORY:
// The `geometry` module is the lowest layer of the engine. Everything above it
// (scenes, the packer, the renderer) reasons about axis-aligned rectangles in
// integer canvas coordinates, so the rectangle type must be impossible to
// construct in a degenerate state. All operations here are pure and total over
// well-formed rectangles; the single way to obtain a `Rect` is the validating
// constructor, which rejects `x1 >= x2` or `y1 >= y2` with `InvalidGeometry`.
//
// The overlap test is deliberately strict: two rectangles that merely share an
// edge do not overlap. Objects packed flush against each other are legal, which
// is exactly what a zero-margin packing produces.

use crate::core_modules::error::LayoutError;

/// An axis-aligned rectangle, `(x1, y1)` top-left inclusive, `(x2, y2)`
/// bottom-right exclusive. Invariant: `x1 < x2 && y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    /// Builds a rectangle, rejecting degenerate corner orderings.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Result<Self, LayoutError> {
        if x1 >= x2 || y1 >= y2 {
            return Err(LayoutError::InvalidGeometry { x1, y1, x2, y2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Strict intersection test. Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// The area of the intersection with `other`, zero when disjoint.
    pub fn overlap_area(&self, other: &Rect) -> u64 {
        if !self.overlaps(other) {
            return 0;
        }
        let w = self.x2.min(other.x2) - self.x1.max(other.x1);
        let h = self.y2.min(other.y2) - self.y1.max(other.y1);
        w as u64 * h as u64
    }

    /// Whether the rectangle lies entirely within a `canvas_width` x
    /// `canvas_height` canvas anchored at the origin.
    pub fn within(&self, canvas_width: u32, canvas_height: u32) -> bool {
        self.x2 <= canvas_width && self.y2 <= canvas_height
    }

    /// The same-sized rectangle with its top-left corner moved to `(x, y)`.
    pub fn translated(&self, x: u32, y: u32) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + self.width(),
            y2: y + self.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_rectangles() {
        assert!(matches!(
            Rect::new(10, 10, 10, 20),
            Err(LayoutError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            Rect::new(10, 30, 20, 30),
            Err(LayoutError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            Rect::new(50, 50, 40, 60),
            Err(LayoutError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn area_and_dimensions() {
        let r = Rect::new(50, 50, 150, 250).unwrap();
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 200);
        assert_eq!(r.area(), 20_000);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 100, 100).unwrap();
        let b = Rect::new(100, 0, 200, 100).unwrap();
        assert!(!a.overlaps(&b));
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn interior_intersection_overlaps() {
        let a = Rect::new(0, 0, 100, 100).unwrap();
        let b = Rect::new(50, 50, 150, 150).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert_eq!(a.overlap_area(&b), 2_500);
    }

    #[test]
    fn within_is_inclusive_of_the_far_edge() {
        let r = Rect::new(400, 450, 500, 550).unwrap();
        assert!(r.within(500, 550));
        assert!(!r.within(499, 550));
        assert!(!r.within(500, 549));
    }

    #[test]
    fn translation_preserves_size() {
        let r = Rect::new(200, 150, 300, 350).unwrap();
        let moved = r.translated(0, 0);
        assert_eq!(moved, Rect::new(0, 0, 100, 200).unwrap());
        assert_eq!(moved.area(), r.area());
    }
}
