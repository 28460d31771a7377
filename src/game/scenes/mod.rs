use crate::config::GameConfig;
use crate::engine::registry::Registry;
use crate::engine::resources::Resources;
use crate::engine::{Point, Renderer, Size, TextStyle};
use crate::game::audio::AudioManager;
use crate::game::ui::{self, Button};
use std::rc::Rc;

pub mod ace_of_shadows;
pub mod magic_words;
pub mod main_menu;
pub mod phoenix_flame;

pub const MAIN_MENU: &str = "mainMenu";
pub const ACE_OF_SHADOWS: &str = "aceOfShadows";
pub const MAGIC_WORDS: &str = "magicWords";
pub const PHOENIX_FLAME: &str = "phoenixFlame";

/// What every scene is built from.
#[derive(Clone)]
pub struct Shared {
    pub config: Rc<GameConfig>,
    pub registry: Rc<Registry>,
}

impl Shared {
    pub fn resources(&self) -> Rc<Resources> {
        self.registry.instance::<Resources>()
    }

    pub fn audio(&self) -> Rc<AudioManager> {
        self.registry.instance::<AudioManager>()
    }

    pub fn font_family(&self) -> String {
        self.config.magic_words.text.font_family.clone()
    }
}

/// Round "home" button pinned to the bottom of the screen.
pub struct BackButton {
    button: Button,
}

impl BackButton {
    const SIZE: f64 = 80.0;
    const ICON: f64 = 40.0;

    pub fn new(shared: &Shared) -> Self {
        let mut button = Button::new(
            Point::default(),
            Size {
                width: Self::SIZE,
                height: Self::SIZE,
            },
            Self::SIZE / 2.0,
            ui::GREY,
        );
        button = match shared.resources().texture("home") {
            Ok(icon) => button.with_icon(
                icon.clone(),
                Size {
                    width: Self::ICON,
                    height: Self::ICON,
                },
            ),
            Err(_) => button.with_label(
                "<",
                TextStyle {
                    font_family: shared.font_family(),
                    font_size: 32.0,
                    color: 0xFFFFFF,
                    bold: true,
                    italic: false,
                },
            ),
        };
        BackButton { button }
    }

    /// Keeps the button `SIZE` above the bottom edge.
    pub fn layout(&mut self, viewport: Size) {
        self.button
            .set_center(Point::new(0.0, viewport.height / 2.0 - Self::SIZE));
    }

    pub fn pointer_down(&mut self, point: Point) -> bool {
        self.button.pointer_down(point)
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.button.pointer_move(point);
    }

    pub fn draw(&self, renderer: &Renderer) {
        self.button.draw(renderer);
    }
}

/// Single line centred on `center`.
pub fn draw_centered_text(renderer: &Renderer, text: &str, center: Point, style: &TextStyle) {
    let width = renderer.measure_text(text, style);
    renderer.fill_text(
        text,
        Point::new(center.x - width / 2.0, center.y - style.font_size / 2.0),
        style,
        1.0,
    );
}
