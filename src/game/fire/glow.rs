use crate::engine::tween::{Ease, Tween};
use crate::engine::{BlendMode, Point, Renderer};
use crate::sprite::Sprite;

const COLOR: u32 = 0xFFC571;
const SCALE_MIN: f64 = 1.5;
const SCALE_MAX: f64 = 2.2;
const PULSE_S: f64 = 1.5;
/// radius of the glow at scale 1
const RADIUS: f64 = 64.0;

/// Warm additive halo behind the flame, breathing in and out.
pub struct FireGlow {
    pub sprite: Sprite,
    pulse: Option<(Tween, Tween)>,
}

impl Default for FireGlow {
    fn default() -> Self {
        let mut sprite = Sprite::at(0.0, -40.0);
        sprite.set_scale(SCALE_MIN);
        sprite.tint = COLOR;
        FireGlow {
            sprite,
            pulse: None,
        }
    }
}

impl FireGlow {
    pub fn start_pulse(&mut self) {
        self.sprite.set_scale(SCALE_MIN);
        self.sprite.alpha = 1.0;
        self.pulse = Some((
            Tween::new(SCALE_MIN, SCALE_MAX, PULSE_S, Ease::SineInOut).yoyo(),
            Tween::new(1.0, 0.8, PULSE_S, Ease::SineInOut).yoyo(),
        ));
    }

    pub fn stop_pulse(&mut self) {
        self.pulse = None;
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_some()
    }

    pub fn update(&mut self, dt_s: f64) {
        if let Some((scale, alpha)) = &mut self.pulse {
            self.sprite.set_scale(scale.update(dt_s));
            self.sprite.alpha = alpha.update(dt_s);
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        renderer.set_blend(BlendMode::Add);
        renderer.fill_glow(
            self.sprite.position,
            RADIUS * self.sprite.scale.x,
            self.sprite.tint,
            self.sprite.alpha,
        );
        renderer.set_blend(BlendMode::Normal);
    }

    pub fn position(&self) -> Point {
        self.sprite.position
    }
}
