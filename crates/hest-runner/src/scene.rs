use std::ops::Range;

use hest_engine::coords::{Rect, Viewport};
use hest_engine::paint::Color;
use hest_engine::render::VertexPositionColor;
use rand::Rng;

/// Parameters for the random rectangle scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    /// Number of boxes, upper bound exclusive.
    pub box_count: Range<u32>,
    /// Width and height of each box in logical pixels, upper bound exclusive.
    pub box_size: Range<u32>,
    /// Fixed seed for a reproducible scene.
    pub seed: Option<u64>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            box_count: 5..250,
            box_size: 32..128,
            seed: None,
        }
    }
}

/// CPU-side geometry of the generated boxes.
#[derive(Debug, Clone, Default)]
pub struct RectScene {
    pub rects: Vec<Rect>,
    pub vertices: Vec<VertexPositionColor>,
    pub indices: Vec<u32>,
}

impl RectScene {
    pub const VERTICES_PER_BOX: usize = 4;
    pub const INDICES_PER_BOX: usize = 6;

    /// Two triangles over the corners `(x, y+h)`, `(x+w, y+h)`, `(x+w, y)`, `(x, y)`.
    const BOX_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

    /// Scatters random boxes over `extent`.
    ///
    /// A box that does not fit the extent is pinned to the origin on that axis.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, extent: Viewport, options: &SceneOptions) -> Self {
        let count = pick(rng, options.box_count.clone()) as usize;

        let mut scene = Self {
            rects: Vec::with_capacity(count),
            vertices: Vec::with_capacity(count * Self::VERTICES_PER_BOX),
            indices: Vec::with_capacity(count * Self::INDICES_PER_BOX),
        };

        for _ in 0..count {
            let w = pick(rng, options.box_size.clone());
            let h = pick(rng, options.box_size.clone());
            let x = pick(rng, 0..(extent.width as u32).saturating_sub(w));
            let y = pick(rng, 0..(extent.height as u32).saturating_sub(h));

            scene.push_box(rng, Rect::new(x as f32, y as f32, w as f32, h as f32));
        }

        scene
    }

    fn push_box<R: Rng + ?Sized>(&mut self, rng: &mut R, rect: Rect) {
        let base = self.vertices.len() as u32;

        for corner in rect.corners() {
            self.vertices.push(VertexPositionColor::new(corner, random_color(rng)));
        }
        self.indices.extend(Self::BOX_INDICES.iter().map(|i| base + i));
        self.rects.push(rect);
    }

    pub fn box_count(&self) -> usize {
        self.rects.len()
    }
}

/// Random opaque color with each channel in `[0, 1)`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::opaque(rng.random(), rng.random(), rng.random())
}

/// Uniform pick from `range`; an empty range yields its start.
fn pick<R: Rng + ?Sized>(rng: &mut R, range: Range<u32>) -> u32 {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hest_engine::coords::Vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(seed: u64, extent: Viewport, options: &SceneOptions) -> RectScene {
        RectScene::generate(&mut StdRng::seed_from_u64(seed), extent, options)
    }

    // ── counts ───────────────────────────────────────────────────────────

    #[test]
    fn box_count_is_within_range() {
        for seed in 0..32 {
            let s = scene(seed, Viewport::new(1280.0, 756.0), &SceneOptions::default());
            assert!((5..250).contains(&(s.box_count() as u32)), "seed {seed}: {}", s.box_count());
            assert_eq!(s.vertices.len(), s.box_count() * RectScene::VERTICES_PER_BOX);
            assert_eq!(s.indices.len(), s.box_count() * RectScene::INDICES_PER_BOX);
        }
    }

    #[test]
    fn single_value_range_is_exact() {
        let options = SceneOptions { box_count: 3..4, ..SceneOptions::default() };
        assert_eq!(scene(7, Viewport::new(640.0, 480.0), &options).box_count(), 3);
    }

    #[test]
    fn same_seed_same_scene() {
        let extent = Viewport::new(800.0, 600.0);
        let a = scene(42, extent, &SceneOptions::default());
        let b = scene(42, extent, &SceneOptions::default());
        assert_eq!(a.rects, b.rects);
        assert_eq!(a.indices, b.indices);
    }

    // ── geometry ─────────────────────────────────────────────────────────

    #[test]
    fn boxes_fit_the_extent() {
        let extent = Viewport::new(1280.0, 756.0);
        let bounds = Rect::new(0.0, 0.0, extent.width, extent.height);
        let s = scene(3, extent, &SceneOptions::default());

        for r in &s.rects {
            assert!((32.0..128.0).contains(&r.size.x));
            assert!((32.0..128.0).contains(&r.size.y));
            assert!(bounds.encloses(*r), "{r:?}");
        }
    }

    #[test]
    fn vertices_follow_corner_order() {
        let options = SceneOptions { box_count: 1..2, ..SceneOptions::default() };
        let s = scene(11, Viewport::new(1280.0, 756.0), &options);
        let r = s.rects[0];
        let (x, y, w, h) = (r.origin.x, r.origin.y, r.size.x, r.size.y);

        let positions: Vec<[f32; 2]> = s.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[x, y + h], [x + w, y + h], [x + w, y], [x, y]]);
    }

    #[test]
    fn indices_offset_by_box() {
        let options = SceneOptions { box_count: 2..3, ..SceneOptions::default() };
        let s = scene(5, Viewport::new(1280.0, 756.0), &options);
        assert_eq!(s.indices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn small_window_pins_boxes_to_origin() {
        let s = scene(9, Viewport::new(16.0, 16.0), &SceneOptions::default());
        assert!(s.box_count() > 0);
        for r in &s.rects {
            assert_eq!(r.origin, Vec2::zero());
        }
    }

    // ── colors ───────────────────────────────────────────────────────────

    #[test]
    fn colors_are_opaque_and_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let c = random_color(&mut rng);
            assert!(c.is_opaque());
            for ch in [c.r, c.g, c.b] {
                assert!((0.0..1.0).contains(&ch));
            }
        }
    }

    #[test]
    fn each_vertex_gets_opaque_color() {
        let s = scene(2, Viewport::new(1280.0, 756.0), &SceneOptions::default());
        assert!(s.vertices.iter().all(|v| v.color[3] == 1.0));
    }
}
