/// Color-blend factor bouncing between 0 and 1.
///
/// At 1 the shader shows the vertex colors, at 0 their complements.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorBlend {
    factor: f32,
    delta: f32,
}

impl ColorBlend {
    pub const DEFAULT_STEP: f32 = 1.0 / 8024.0;

    /// Starts at full color, fading by `step` per tick.
    pub fn new(step: f32) -> Self {
        Self { factor: 1.0, delta: step }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Signed change applied by the next `step`.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Advances one tick, reversing direction at either bound.
    pub fn step(&mut self) -> f32 {
        self.factor += self.delta;
        if self.factor >= 1.0 {
            self.factor = 1.0;
            self.delta = -self.delta;
        }
        if self.factor <= 0.0 {
            self.factor = 0.0;
            self.delta = -self.delta;
        }
        self.factor
    }
}

impl Default for ColorBlend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_clamps_and_turns_down() {
        let mut blend = ColorBlend::default();
        assert_eq!(blend.factor(), 1.0);

        assert_eq!(blend.step(), 1.0);
        assert_eq!(blend.delta(), -ColorBlend::DEFAULT_STEP);

        assert!(blend.step() < 1.0);
    }

    #[test]
    fn bounces_off_zero() {
        let mut blend = ColorBlend::new(0.25);
        blend.step(); // 1.0, turns
        assert_eq!(blend.step(), 0.75);
        assert_eq!(blend.step(), 0.5);
        assert_eq!(blend.step(), 0.25);
        assert_eq!(blend.step(), 0.0);
        assert_eq!(blend.delta(), 0.25);
        assert_eq!(blend.step(), 0.25);
    }

    #[test]
    fn overshoot_is_clamped() {
        let mut blend = ColorBlend::new(0.4);
        blend.step();
        blend.step(); // 0.6
        blend.step(); // 0.2
        assert_eq!(blend.step(), 0.0);
    }

    #[test]
    fn stays_in_unit_range() {
        let mut blend = ColorBlend::new(0.037);
        for _ in 0..1000 {
            let f = blend.step();
            assert!((0.0..=1.0).contains(&f));
        }
    }
}
