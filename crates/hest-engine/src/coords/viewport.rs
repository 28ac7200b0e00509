/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the size as a `[width, height]` pair, the layout shaders expect for a `vec2<f32>`.
    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.width, self.height]
    }
}
