use hest_engine::coords::Vec2;
use hest_engine::input::Key;

/// One camera movement, bound to a held key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Movement {
    ZoomIn,
    ZoomOut,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    /// Keys in the order they are checked each tick.
    pub const BINDINGS: [(Key, Movement); 6] = [
        (Key::W, Movement::ZoomIn),
        (Key::S, Movement::ZoomOut),
        (Key::A, Movement::Left),
        (Key::D, Movement::Right),
        (Key::Space, Movement::Up),
        (Key::ShiftLeft, Movement::Down),
    ];

    pub fn for_key(key: Key) -> Option<Movement> {
        Self::BINDINGS.iter().find(|(k, _)| *k == key).map(|(_, m)| *m)
    }
}

/// 2D pan/zoom over the scene.
///
/// `offset` is in logical pixels (+Y down); `zoom` scales around the
/// viewport center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub zoom: f32,
    pub speed: f32,
}

impl Camera {
    pub const DEFAULT_SPEED: f32 = 1.5;
    pub const ZOOM_STEP: f32 = 0.01;
    pub const MIN_ZOOM: f32 = 0.25;
    pub const MAX_ZOOM: f32 = 4.0;

    pub fn new(speed: f32) -> Self {
        Self { offset: Vec2::zero(), zoom: 1.0, speed }
    }

    pub fn apply(&mut self, movement: Movement) {
        match movement {
            Movement::Left => self.offset.x -= self.speed,
            Movement::Right => self.offset.x += self.speed,
            Movement::Up => self.offset.y -= self.speed,
            Movement::Down => self.offset.y += self.speed,
            Movement::ZoomIn => self.set_zoom(self.zoom * (1.0 + Self::ZOOM_STEP)),
            Movement::ZoomOut => self.set_zoom(self.zoom * (1.0 - Self::ZOOM_STEP)),
        }
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pans_by_speed() {
        let mut cam = Camera::default();
        cam.apply(Movement::Right);
        cam.apply(Movement::Right);
        cam.apply(Movement::Up);
        assert_eq!(cam.offset, Vec2::new(3.0, -1.5));

        cam.apply(Movement::Left);
        cam.apply(Movement::Down);
        assert_eq!(cam.offset, Vec2::new(1.5, 0.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::default();
        for _ in 0..1000 {
            cam.apply(Movement::ZoomIn);
        }
        assert_eq!(cam.zoom, Camera::MAX_ZOOM);

        for _ in 0..1000 {
            cam.apply(Movement::ZoomOut);
        }
        assert_eq!(cam.zoom, Camera::MIN_ZOOM);
    }

    #[test]
    fn zoom_does_not_pan() {
        let mut cam = Camera::default();
        cam.apply(Movement::ZoomIn);
        assert_eq!(cam.offset, Vec2::zero());
        assert!((cam.zoom - 1.01).abs() < 1e-6);
    }

    #[test]
    fn key_bindings() {
        assert_eq!(Movement::for_key(Key::W), Some(Movement::ZoomIn));
        assert_eq!(Movement::for_key(Key::ShiftLeft), Some(Movement::Down));
        assert_eq!(Movement::for_key(Key::ShiftRight), None);
        assert_eq!(Movement::for_key(Key::Escape), None);
    }
}
