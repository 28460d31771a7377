use super::{BackButton, Shared, MAIN_MENU};
use crate::engine::scene::{Scene, SceneContext};
use crate::engine::{BlendMode, Point, Rect, Renderer, Size};
use crate::game::fire::glow::FireGlow;
use crate::game::fire::particle::FireParticle;
use crate::game::fire::system::FireParticleSystem;
use crate::sprite::sheet::SpriteSheet;
use crate::sprite::{Sprite, WHITE};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use web_sys::HtmlImageElement;

/// Radius of the stand-in blob for a particle at scale 1.
const PARTICLE_RADIUS: f64 = 48.0;

struct Flipbook {
    image: HtmlImageElement,
    sheet: SpriteSheet,
}

struct Torch {
    image: HtmlImageElement,
    sprite: Sprite,
}

pub struct PhoenixFlameScene {
    system: FireParticleSystem,
    glow: FireGlow,
    flipbook: Option<Flipbook>,
    torch: Option<Torch>,
    back: BackButton,
}

impl PhoenixFlameScene {
    pub fn new(shared: &Shared) -> Self {
        let config = &shared.config.phoenix_flame;
        let resources = shared.resources();

        let flipbook = resources.texture("fireSpriteSheet").ok().map(|image| Flipbook {
            sheet: SpriteSheet::grid(
                image.natural_width().into(),
                image.natural_height().into(),
                config.sheet_columns,
                config.sheet_rows,
            ),
            image: image.clone(),
        });
        if flipbook.is_none() {
            info!("PhoenixFlameScene: no fireSpriteSheet, drawing soft particles");
        }

        let torch = resources.texture("torch").ok().map(|image| {
            let mut sprite = Sprite::at(0.0, 25.0);
            sprite.set_scale(1.5);
            Torch {
                image: image.clone(),
                sprite,
            }
        });

        PhoenixFlameScene {
            system: FireParticleSystem::new(config, StdRng::from_entropy()),
            glow: FireGlow::default(),
            flipbook,
            torch,
            back: BackButton::new(shared),
        }
    }

    pub fn system(&self) -> &FireParticleSystem {
        &self.system
    }

    pub fn glow(&self) -> &FireGlow {
        &self.glow
    }

    fn draw_particle(&self, renderer: &Renderer, particle: &FireParticle) {
        let sprite = &particle.sprite;
        if let Some(Flipbook { image, sheet }) = &self.flipbook {
            if let Some(frame) = sheet.frame(particle.frame) {
                renderer.draw_sprite(image, frame, sheet.frame_size(), sprite);
            }
            // canvas has no per-image tint, a coloured glow over the frame stands in
            if sprite.tint != WHITE {
                renderer.fill_glow(
                    sprite.position,
                    sheet.frame_size().width * 0.5 * sprite.scale.x,
                    sprite.tint,
                    sprite.alpha * 0.5,
                );
            }
        } else {
            renderer.fill_glow(
                sprite.position,
                PARTICLE_RADIUS * sprite.scale.x,
                sprite.tint,
                sprite.alpha,
            );
        }
    }
}

impl Scene for PhoenixFlameScene {
    fn on_show(&mut self) {
        debug!("PhoenixFlameScene: lighting {} particles", self.system.len());
        self.system.reset();
        self.system.start();
        self.glow.start_pulse();
    }

    fn on_hide(&mut self) {
        self.system.stop();
        self.glow.stop_pulse();
    }

    fn update(&mut self, ctx: &mut SceneContext) {
        self.back.layout(ctx.viewport);
        let delta_s = ctx.delta_s();
        self.system.update(delta_s);
        self.glow.update(delta_s);
    }

    fn draw(&self, renderer: &Renderer) {
        self.glow.draw(renderer);

        if let Some(Torch { image, sprite }) = &self.torch {
            let size = Size {
                width: image.natural_width().into(),
                height: image.natural_height().into(),
            };
            let frame = Rect::new(0.0, 0.0, size.width, size.height);
            renderer.draw_sprite(image, &frame, size, sprite);
        }

        renderer.set_blend(BlendMode::Add);
        for particle in self.system.particles() {
            self.draw_particle(renderer, particle);
        }
        renderer.set_blend(BlendMode::Normal);

        self.back.draw(renderer);
    }

    fn on_pointer_down(&mut self, point: Point, ctx: &mut SceneContext) {
        if self.back.pointer_down(point) {
            ctx.request_switch(MAIN_MENU);
        }
    }

    fn on_pointer_move(&mut self, point: Point) {
        self.back.pointer_move(point);
    }

    fn destroy(&mut self) {
        self.system.stop();
        self.glow.stop_pulse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::event::EventBus;
    use crate::engine::registry::Registry;
    use std::rc::Rc;

    fn scene() -> PhoenixFlameScene {
        PhoenixFlameScene::new(&Shared {
            config: Rc::new(GameConfig::default()),
            registry: Rc::new(Registry::new()),
        })
    }

    #[test]
    fn showing_lights_the_fire_and_hiding_puts_it_out() {
        let mut scene = scene();
        assert_eq!(scene.system().len(), 10);
        assert!(!scene.system().is_running());

        scene.on_show();
        assert!(scene.system().is_running());
        assert!(scene.glow().is_pulsing());

        scene.on_hide();
        assert!(!scene.system().is_running());
        assert!(!scene.glow().is_pulsing());
    }

    #[test]
    fn every_visit_starts_from_a_fresh_flame() {
        let events = EventBus::new();
        let mut scene = scene();
        scene.on_show();
        for _ in 0..20 {
            let mut ctx = SceneContext::new(16.0, &events, Size::default());
            scene.update(&mut ctx);
        }
        scene.on_hide();

        scene.on_show();

        for particle in scene.system().particles() {
            assert_eq!(particle.sprite.position.y, 0.0);
            assert_eq!(particle.sprite.alpha, 0.0);
        }
    }

    #[test]
    fn update_keeps_the_pool_size() {
        let events = EventBus::new();
        let mut scene = scene();
        scene.on_show();
        for _ in 0..200 {
            let mut ctx = SceneContext::new(16.0, &events, Size::default());
            scene.update(&mut ctx);
        }
        assert_eq!(scene.system().len(), 10);
    }
}
