//! Rectangles for collision and camera projection.

use macroquad::prelude::Vec2;

/// Axis-aligned rectangle in integer pixels.
///
/// Edges are exclusive: two rectangles that only touch do not intersect, so a
/// player resting exactly on a floor is not considered overlapping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Rectangle at `(x, y)` of size `w` by `h`.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// One past the last column.
    #[inline] pub fn right(&self) -> i32 { self.x.saturating_add(self.w) }
    /// One past the last row.
    #[inline] pub fn bottom(&self) -> i32 { self.y.saturating_add(self.h) }
    /// Zero or negative area.
    #[inline] pub fn is_empty(&self) -> bool { self.w <= 0 || self.h <= 0 }

    /// Overlap test with exclusive edges. Empty rectangles never intersect.
    pub fn has_intersection(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Axis-aligned rectangle in continuous world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl WorldRect {
    /// Rectangle at `(x, y)` of size `w` by `h`.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        WorldRect { x, y, w, h }
    }

    /// Top-left corner.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Pixel rectangle relative to a camera offset, truncating toward zero.
    pub fn to_screen(&self, camera: Vec2) -> Rect {
        Rect::new(
            (self.x - camera.x) as i32,
            (self.y - camera.y) as i32,
            self.w as i32,
            self.h as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.has_intersection(&Rect::new(10, 0, 5, 5)));
        assert!(!a.has_intersection(&Rect::new(0, 10, 5, 5)));
        assert!(a.has_intersection(&Rect::new(9, 9, 5, 5)));
    }

    #[test]
    fn edges_saturate_at_the_i32_limit() {
        let far = Rect::new(i32::MAX, i32::MAX, 72, 72);
        assert_eq!(far.right(), i32::MAX);
        assert_eq!(far.bottom(), i32::MAX);
        assert!(!far.has_intersection(&Rect::new(0, 0, 10, 10)));
    }

    #[test]
    fn empty_rects_never_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(!a.has_intersection(&Rect::new(2, 2, 0, 4)));
    }

    #[test]
    fn world_rect_projects_through_camera() {
        let r = WorldRect::new(120.7, 30.0, 72.0, 72.0);
        assert_eq!(r.to_screen(Vec2::new(20.0, 0.0)), Rect::new(100, 30, 72, 72));
    }
}
