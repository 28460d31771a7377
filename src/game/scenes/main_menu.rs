use super::{draw_centered_text, Shared, ACE_OF_SHADOWS, MAGIC_WORDS, PHOENIX_FLAME};
use crate::engine::scene::{Scene, SceneContext};
use crate::engine::{Point, Renderer, Size, TextStyle};
use crate::game::ui::{self, Button};
use log::debug;

pub struct MainMenuScene {
    title: TextStyle,
    /// (button, scene it opens)
    buttons: Vec<(Button, &'static str)>,
}

impl MainMenuScene {
    pub fn new(shared: &Shared) -> Self {
        let label = TextStyle {
            font_family: shared.font_family(),
            font_size: 24.0,
            color: 0xFFFFFF,
            bold: false,
            italic: false,
        };
        let size = Size {
            width: 300.0,
            height: 70.0,
        };
        let buttons = [
            ("Ace of Shadows", -80.0, ACE_OF_SHADOWS),
            ("Magic Words", 20.0, MAGIC_WORDS),
            ("Phoenix Flame", 120.0, PHOENIX_FLAME),
        ]
        .into_iter()
        .map(|(text, y, scene)| {
            (
                Button::new(Point::new(0.0, y), size, 10.0, ui::GREY).with_label(text, label.clone()),
                scene,
            )
        })
        .collect();

        MainMenuScene {
            title: TextStyle {
                font_size: 48.0,
                ..label
            },
            buttons,
        }
    }

    /// Scene behind the button under `point`, if any.
    fn pressed(&mut self, point: Point) -> Option<&'static str> {
        self.buttons
            .iter_mut()
            .find_map(|(button, scene)| button.pointer_down(point).then_some(*scene))
    }
}

impl Scene for MainMenuScene {
    fn on_show(&mut self) {
        debug!("MainMenuScene: shown");
    }

    fn on_hide(&mut self) {
        for (button, _) in &mut self.buttons {
            button.set_enabled(true);
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn draw(&self, renderer: &Renderer) {
        draw_centered_text(renderer, "Main Menu", Point::new(0.0, -250.0), &self.title);
        for (button, _) in &self.buttons {
            button.draw(renderer);
        }
    }

    fn on_pointer_down(&mut self, point: Point, ctx: &mut SceneContext) {
        if let Some(scene) = self.pressed(point) {
            ctx.request_switch(scene);
        }
    }

    fn on_pointer_move(&mut self, point: Point) {
        for (button, _) in &mut self.buttons {
            button.pointer_move(point);
        }
    }
}
