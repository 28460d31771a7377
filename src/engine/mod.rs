use crate::browser;
use crate::config::TimeConfig;
use crate::sprite::Sprite;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub mod event;
pub mod input;
pub mod random;
pub mod registry;
pub mod resources;
pub mod scene;
pub mod time;
pub mod timer;
pub mod tween;
pub mod viewport;

use self::event::{names, EventBus, EventPayload};
use self::input::InputState;
use self::time::Time;
use self::viewport::Viewport;

/// The engine drives one `Game`. Everything but `initialize` is reached
/// through bus subscriptions the loop sets up, in this order per frame:
/// pointer events, every `fixedUpdateTick`, one `tick`, then `draw`.
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self, events: Rc<EventBus>, viewport: Size) -> Result<Box<dyn Game>>;
    fn time_config(&self) -> TimeConfig {
        TimeConfig::default()
    }
    fn fixed_update(&mut self) {}
    fn update(&mut self, delta_ms: f64);
    fn resize(&mut self, _viewport: Size) {}
    fn pointer_down(&mut self, _point: Point) {}
    fn pointer_move(&mut self, _point: Point) {}
    fn draw(&self, renderer: &Renderer);
}

type SharedGame = Rc<RefCell<Box<dyn Game>>>;
type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

pub struct GameLoop;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let events = Rc::new(EventBus::new());
        let canvas = browser::canvas()?;
        let input = Rc::new(InputState::new());
        input::attach_pointer_listeners(&canvas, Rc::clone(&input))?;

        let (width, height, pixel_ratio) = browser::window_size()?;
        browser::resize_canvas(&canvas, width, height);
        let mut viewport = Viewport::new(width, height, pixel_ratio);

        let game: SharedGame = Rc::new(RefCell::new(
            game.initialize(Rc::clone(&events), viewport.size()).await?,
        ));
        let mut time = Time::new(browser::now()?, &game.borrow().time_config());
        Self::subscribe(&events, &game);
        events.trigger(names::READY, None);
        info!("GameLoop: ready");

        let renderer = Renderer::new(browser::context()?);
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            if let Ok((width, height, pixel_ratio)) = browser::window_size() {
                if viewport.update(width, height, pixel_ratio, &events) {
                    browser::resize_canvas(&canvas, width, height);
                }
            }
            input.drain(&events);
            time.tick(perf, &events);
            renderer.begin_frame(viewport.size());
            game.borrow().draw(&renderer);
            renderer.end_frame();

            if let Some(next) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next) {
                    warn!("GameLoop: stopped : {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// The game listens on the bus like any other collaborator. A callback that
    /// finds the game already borrowed (re-entrant trigger) is skipped.
    fn subscribe(events: &EventBus, game: &SharedGame) {
        let target = Rc::clone(game);
        events.on(names::FIXED_UPDATE_TICK, move |_| {
            if let Ok(mut game) = target.try_borrow_mut() {
                game.fixed_update();
            }
        });

        let target = Rc::clone(game);
        events.on(names::TICK, move |payload| {
            let delta_ms = match payload {
                Some(EventPayload::Delta { delta_ms }) => *delta_ms,
                _ => 0.0,
            };
            if let Ok(mut game) = target.try_borrow_mut() {
                game.update(delta_ms);
            }
        });

        let target = Rc::clone(game);
        events.on(names::RESIZE, move |payload| {
            if let (Some(EventPayload::Resize { width, height, .. }), Ok(mut game)) =
                (payload, target.try_borrow_mut())
            {
                debug!("GameLoop: resize {}x{}", width, height);
                game.resize(Size {
                    width: *width,
                    height: *height,
                });
            }
        });

        let target = Rc::clone(game);
        events.on(names::POINTER_DOWN, move |payload| {
            if let (Some(EventPayload::Pointer(point)), Ok(mut game)) = (payload, target.try_borrow_mut()) {
                game.pointer_down(*point);
            }
        });

        let target = Rc::clone(game);
        events.on(names::POINTER_MOVE, move |payload| {
            if let (Some(EventPayload::Pointer(point)), Ok(mut game)) = (payload, target.try_borrow_mut()) {
                game.pointer_move(*point);
            }
        });
    }
}

// ==================== Geometry ====================
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width * 0.5,
            y: self.y + self.height * 0.5,
        }
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }
}

// ==================== Rendering ====================
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: u32,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub fn font(&self) -> String {
        format!(
            "{} {} {}px {}",
            if self.italic { "italic" } else { "normal" },
            if self.bold { "bold" } else { "normal" },
            self.font_size,
            self.font_family
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Add,
}

/// `0xRRGGBB` + alpha → css `rgba(...)`
pub fn css_color(rgb: u32, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (rgb >> 16) & 0xff,
        (rgb >> 8) & 0xff,
        rgb & 0xff,
        alpha.clamp(0.0, 1.0)
    )
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    const BACKGROUND: u32 = 0x121214;

    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Renderer { context }
    }

    /// Clears to the background colour and moves the origin to the centre of
    /// the screen, scenes lay themselves out around (0, 0).
    pub fn begin_frame(&self, viewport: Size) {
        let _ = self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.context.set_global_alpha(1.0);
        self.context.set_fill_style(&JsValue::from_str(&css_color(Self::BACKGROUND, 1.0)));
        self.context.fill_rect(0.0, 0.0, viewport.width, viewport.height);
        self.context.save();
        let _ = self
            .context
            .translate(viewport.width * 0.5, viewport.height * 0.5);
    }

    pub fn end_frame(&self) {
        self.context.restore();
    }

    pub fn clear(&self, rect: &Rect) {
        self.context
            .clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    pub fn set_blend(&self, mode: BlendMode) {
        let operation = match mode {
            BlendMode::Normal => "source-over",
            BlendMode::Add => "lighter",
        };
        let _ = self.context.set_global_composite_operation(operation);
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x,
                frame.y,
                frame.width,
                frame.height,
                destination.x,
                destination.y,
                destination.width,
                destination.height,
            )
        {
            warn!("Renderer: draw_image failed : {:#?}", err);
        }
    }

    /// Draws `frame` of `image` with the sprite's transform. `size` is the
    /// unscaled on-screen size, the anchor is applied inside it.
    pub fn draw_sprite(&self, image: &HtmlImageElement, frame: &Rect, size: Size, sprite: &Sprite) {
        if !sprite.visible || sprite.alpha <= 0.0 {
            return;
        }
        self.with_transform(sprite, |renderer| {
            renderer.draw_image(
                image,
                frame,
                &Rect::new(
                    -size.width * sprite.anchor.x,
                    -size.height * sprite.anchor.y,
                    size.width,
                    size.height,
                ),
            );
        });
    }

    pub fn fill_rect(&self, rect: &Rect, color: u32, alpha: f64) {
        self.context.set_fill_style(&JsValue::from_str(&css_color(color, alpha)));
        self.context.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    pub fn fill_rounded_rect(&self, rect: &Rect, radius: f64, color: u32, alpha: f64) {
        let r = radius.min(rect.width * 0.5).min(rect.height * 0.5).max(0.0);
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        self.context.begin_path();
        self.context.move_to(x + r, y);
        let _ = self.context.arc_to(x + w, y, x + w, y + h, r);
        let _ = self.context.arc_to(x + w, y + h, x, y + h, r);
        let _ = self.context.arc_to(x, y + h, x, y, r);
        let _ = self.context.arc_to(x, y, x + w, y, r);
        self.context.close_path();
        self.context.set_fill_style(&JsValue::from_str(&css_color(color, alpha)));
        self.context.fill();
    }

    pub fn fill_circle(&self, center: Point, radius: f64, color: u32, alpha: f64) {
        self.context.begin_path();
        let _ = self.context.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.context.set_fill_style(&JsValue::from_str(&css_color(color, alpha)));
        self.context.fill();
    }

    /// Soft round light, brightest in the middle.
    pub fn fill_glow(&self, center: Point, radius: f64, color: u32, alpha: f64) {
        let Ok(gradient) = self.context.create_radial_gradient(
            center.x,
            center.y,
            0.0,
            center.x,
            center.y,
            radius.max(1.0),
        ) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &css_color(color, 0.6 * alpha));
        let _ = gradient.add_color_stop(1.0, &css_color(color, 0.0));
        self.context.set_fill_style(&gradient);
        self.context.fill_rect(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
    }

    /// Text with its top-left corner at `position`.
    pub fn fill_text(&self, text: &str, position: Point, style: &TextStyle, alpha: f64) {
        if alpha <= 0.0 || text.is_empty() {
            return;
        }
        self.context.save();
        self.context.set_global_alpha(self.context.global_alpha() * alpha.clamp(0.0, 1.0));
        self.context.set_font(&style.font());
        self.context.set_text_baseline("top");
        self.context.set_fill_style(&JsValue::from_str(&css_color(style.color, 1.0)));
        if let Err(err) = self.context.fill_text(text, position.x, position.y) {
            warn!("Renderer: fill_text failed : {:#?}", err);
        }
        self.context.restore();
    }

    pub fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        self.context.set_font(&style.font());
        self.context
            .measure_text(text)
            .map(|metrics| metrics.width())
            .unwrap_or(0.0)
    }

    /// Runs `draw` inside the sprite's translate/rotate/scale/alpha.
    pub fn with_transform(&self, sprite: &Sprite, draw: impl FnOnce(&Renderer)) {
        self.context.save();
        let _ = self.context.translate(sprite.position.x, sprite.position.y);
        let _ = self.context.rotate(sprite.rotation);
        let _ = self.context.scale(sprite.scale.x, sprite.scale.y);
        self.context
            .set_global_alpha(self.context.global_alpha() * sprite.alpha.clamp(0.0, 1.0));
        draw(self);
        self.context.restore();
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    image.set_cross_origin(Some("anonymous"));
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let source_name = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine::load_image] Error loading image '{}': {:#?}",
                source_name,
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - first for the channel being dropped, second for the load result
    rx.await??;

    Ok(image)
}
