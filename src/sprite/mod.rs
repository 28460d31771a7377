// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      What lives in sprite/                               │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ File              │ Role                                                 │
// ├───────────────────┼──────────────────────────────────────────────────────┤
// │ mod.rs            │ Sprite : transform + alpha + tint + z-order          │
// │ sheet.rs          │ SpriteSheet : grid slicing, frame for a progress t   │
// └───────────────────┴──────────────────────────────────────────────────────┘
// Sprites hold no image handle, the scene that owns them decides which
// texture and frame to hand the renderer.
use crate::engine::Point;

pub mod sheet;

pub const WHITE: u32 = 0xFFFFFF;

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub position: Point,
    pub scale: Point,
    pub rotation: f64,
    pub alpha: f64,
    pub tint: u32,
    /// 0..1 within the drawn size, (0.5, 0.5) is centred
    pub anchor: Point,
    pub z_index: i32,
    pub visible: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Sprite {
            position: Point::default(),
            scale: Point { x: 1.0, y: 1.0 },
            rotation: 0.0,
            alpha: 1.0,
            tint: WHITE,
            anchor: Point { x: 0.5, y: 0.5 },
            z_index: 0,
            visible: true,
        }
    }
}

impl Sprite {
    pub fn at(x: f64, y: f64) -> Self {
        Sprite {
            position: Point { x, y },
            ..Sprite::default()
        }
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = Point { x: scale, y: scale };
    }

    pub fn with_anchor(mut self, x: f64, y: f64) -> Self {
        self.anchor = Point { x, y };
        self
    }
}

/// Back-to-front order for a batch of sprites.
pub fn sort_by_z<T>(items: &mut [T], z: impl Fn(&T) -> i32) {
    items.sort_by_key(|item| z(item));
}
