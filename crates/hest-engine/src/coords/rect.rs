use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Returns `true` if `other` lies fully inside `self` (edges inclusive).
    #[inline]
    pub fn encloses(self, other: Rect) -> bool {
        let (a, b) = (self.max(), other.max());
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && b.x <= a.x
            && b.y <= a.y
    }

    /// Corner positions in quad winding order:
    /// bottom-left, bottom-right, top-right, top-left (with +Y down).
    ///
    /// Two triangles `0,1,2` and `0,2,3` cover the quad.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, max.y),
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, min.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── corners ───────────────────────────────────────────────────────────

    #[test]
    fn corners_follow_quad_winding() {
        let c = r(10.0, 20.0, 30.0, 40.0).corners();
        assert_eq!(c[0], Vec2::new(10.0, 60.0));
        assert_eq!(c[1], Vec2::new(40.0, 60.0));
        assert_eq!(c[2], Vec2::new(40.0, 20.0));
        assert_eq!(c[3], Vec2::new(10.0, 20.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    // ── encloses ──────────────────────────────────────────────────────────

    #[test]
    fn encloses_shared_edges() {
        let outer = r(0.0, 0.0, 100.0, 50.0);
        assert!(outer.encloses(r(0.0, 0.0, 100.0, 50.0)));
        assert!(outer.encloses(r(68.0, 18.0, 32.0, 32.0)));
    }

    #[test]
    fn encloses_rejects_overhang() {
        let outer = r(0.0, 0.0, 100.0, 50.0);
        assert!(!outer.encloses(r(69.0, 0.0, 32.0, 32.0)));
        assert!(!outer.encloses(r(-1.0, 0.0, 10.0, 10.0)));
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
