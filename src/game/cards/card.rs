use crate::engine::tween::{Ease, Tween};
use crate::engine::Point;
use crate::sprite::Sprite;

struct Motion {
    x: Tween,
    y: Tween,
    rotation: Tween,
}

/// One card: a sprite plus at most one running move.
pub struct CardSprite {
    pub sprite: Sprite,
    motion: Option<Motion>,
}

impl CardSprite {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        let mut sprite = Sprite::at(x, y);
        sprite.set_scale(scale);
        CardSprite {
            sprite,
            motion: None,
        }
    }

    /// Starts a move, replacing any move already running. Position eases out
    /// (power3.out), rotation eases in and out (power2.inOut).
    pub fn animate_to(&mut self, target: Point, rotation: f64, duration_ms: f64) {
        let duration = duration_ms.max(0.0) / 1000.0;
        self.motion = Some(Motion {
            x: Tween::new(self.sprite.position.x, target.x, duration, Ease::CubicOut),
            y: Tween::new(self.sprite.position.y, target.y, duration, Ease::CubicOut),
            rotation: Tween::new(self.sprite.rotation, rotation, duration, Ease::QuadInOut),
        });
    }

    /// Returns true on the update that completes the move.
    pub fn update(&mut self, dt_ms: f64) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        let dt = dt_ms / 1000.0;
        self.sprite.position.x = motion.x.update(dt);
        self.sprite.position.y = motion.y.update(dt);
        self.sprite.rotation = motion.rotation.update(dt);

        if motion.x.is_finished() && motion.rotation.is_finished() {
            self.motion = None;
            true
        } else {
            false
        }
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn stop(&mut self) {
        self.motion = None;
    }
}
