use super::{BackButton, Shared, MAIN_MENU};
use crate::config::AceOfShadowsConfig;
use crate::engine::scene::{Scene, SceneContext};
use crate::engine::{Point, Rect, Renderer, Size};
use crate::game::cards::dealer::CardStackManager;
use crate::game::cards::{circle_positions, draw_card_face};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use web_sys::HtmlImageElement;

/// Degrees of the first target stack, straight below the spawn.
const FIRST_STACK_DEG: f64 = 270.0;

pub struct AceOfShadowsScene {
    config: AceOfShadowsConfig,
    texture: Option<HtmlImageElement>,
    dealer: Option<CardStackManager>,
    back: BackButton,
}

impl AceOfShadowsScene {
    pub fn new(shared: &Shared) -> Self {
        let texture = shared.resources().texture("gameCard").ok().cloned();
        if texture.is_none() {
            info!("AceOfShadowsScene: no gameCard texture, drawing card faces");
        }
        AceOfShadowsScene {
            config: shared.config.ace_of_shadows.clone(),
            texture,
            dealer: None,
            back: BackButton::new(shared),
        }
    }

    fn card_size(&self) -> Size {
        Size {
            width: self.config.card_width,
            height: self.config.card_height,
        }
    }

    pub fn dealer(&self) -> Option<&CardStackManager> {
        self.dealer.as_ref()
    }

    fn cleanup(&mut self) {
        if let Some(mut dealer) = self.dealer.take() {
            dealer.destroy();
        }
    }
}

impl Scene for AceOfShadowsScene {
    fn on_show(&mut self) {
        self.cleanup();
        let targets = circle_positions(
            self.config.stack_count,
            self.config.circle_radius,
            FIRST_STACK_DEG,
        );
        debug!(
            "AceOfShadowsScene: dealing {} cards onto {} stacks",
            self.config.card_count,
            targets.len()
        );
        self.dealer = Some(CardStackManager::new(
            Point::default(),
            &targets,
            &self.config,
            StdRng::from_entropy(),
        ));
    }

    fn on_hide(&mut self) {
        self.cleanup();
    }

    fn update(&mut self, ctx: &mut SceneContext) {
        self.back.layout(ctx.viewport);
        if let Some(dealer) = &mut self.dealer {
            dealer.update(ctx.delta_ms);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        let size = self.card_size();
        if let Some(dealer) = &self.dealer {
            for card in dealer.cards() {
                match &self.texture {
                    Some(image) => {
                        let frame = Rect::new(
                            0.0,
                            0.0,
                            image.natural_width().into(),
                            image.natural_height().into(),
                        );
                        renderer.draw_sprite(image, &frame, size, &card.sprite);
                    }
                    None => renderer.with_transform(&card.sprite, |r| draw_card_face(r, size)),
                }
            }
        }
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
        self.cleanup();
    }
}
