use crate::engine::{Point, Rect, Renderer, Size, TextStyle};
use web_sys::HtmlImageElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Hover,
    Pressed,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    pub normal: u32,
    pub hover: u32,
    pub pressed: u32,
    pub disabled: u32,
}

pub const GREY: ButtonColors = ButtonColors {
    normal: 0x333333,
    hover: 0x555555,
    pressed: 0x222222,
    disabled: 0x666666,
};

/// Rounded, centred button with an optional label or icon. Pointer
/// positions are in the same space as `center`.
pub struct Button {
    center: Point,
    size: Size,
    corner_radius: f64,
    colors: ButtonColors,
    fill_alpha: f64,
    label: Option<(String, TextStyle)>,
    icon: Option<(HtmlImageElement, Size)>,
    state: ButtonState,
}

impl Button {
    pub fn new(center: Point, size: Size, corner_radius: f64, colors: ButtonColors) -> Self {
        Button {
            center,
            size,
            corner_radius,
            colors,
            fill_alpha: 0.8,
            label: None,
            icon: None,
            state: ButtonState::Normal,
        }
    }

    pub fn with_label(mut self, text: &str, style: TextStyle) -> Self {
        self.label = Some((text.to_string(), style));
        self
    }

    pub fn with_icon(mut self, image: HtmlImageElement, size: Size) -> Self {
        self.icon = Some((image, size));
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.size.width / 2.0,
            self.center.y - self.size.height / 2.0,
            self.size.width,
            self.size.height,
        )
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.state != ButtonState::Disabled && self.bounds().contains(point)
    }

    /// True when the press lands on the button.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if !self.hit_test(point) {
            return false;
        }
        self.state = ButtonState::Pressed;
        true
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.state == ButtonState::Disabled {
            return;
        }
        self.state = if self.bounds().contains(point) {
            ButtonState::Hover
        } else {
            ButtonState::Normal
        };
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.state = if enabled {
            ButtonState::Normal
        } else {
            ButtonState::Disabled
        };
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn color(&self) -> u32 {
        match self.state {
            ButtonState::Normal => self.colors.normal,
            ButtonState::Hover => self.colors.hover,
            ButtonState::Pressed => self.colors.pressed,
            ButtonState::Disabled => self.colors.disabled,
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        renderer.fill_rounded_rect(&self.bounds(), self.corner_radius, self.color(), self.fill_alpha);
        if let Some((image, size)) = &self.icon {
            let frame = Rect::new(
                0.0,
                0.0,
                image.natural_width().into(),
                image.natural_height().into(),
            );
            let destination = Rect::new(
                self.center.x - size.width / 2.0,
                self.center.y - size.height / 2.0,
                size.width,
                size.height,
            );
            renderer.draw_image(image, &frame, &destination);
        }
        if let Some((text, style)) = &self.label {
            let width = renderer.measure_text(text, style);
            renderer.fill_text(
                text,
                Point::new(self.center.x - width / 2.0, self.center.y - style.font_size / 2.0),
                style,
                1.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> Button {
        Button::new(
            Point::new(0.0, -80.0),
            Size {
                width: 300.0,
                height: 70.0,
            },
            10.0,
            GREY,
        )
    }

    #[test]
    fn hit_test_covers_the_centred_rect() {
        let button = button();
        assert!(button.hit_test(Point::new(-150.0, -115.0)));
        assert!(button.hit_test(Point::new(149.0, -46.0)));
        assert!(!button.hit_test(Point::new(0.0, -40.0)));
    }

    #[test]
    fn colours_follow_pointer() {
        let mut button = button();
        assert_eq!(button.color(), 0x333333);
        button.pointer_move(Point::new(0.0, -80.0));
        assert_eq!(button.state(), ButtonState::Hover);
        assert_eq!(button.color(), 0x555555);
        assert!(button.pointer_down(Point::new(0.0, -80.0)));
        assert_eq!(button.color(), 0x222222);
        button.pointer_move(Point::new(500.0, 0.0));
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn disabled_button_ignores_everything() {
        let mut button = button();
        button.set_enabled(false);
        assert!(!button.pointer_down(Point::new(0.0, -80.0)));
        button.pointer_move(Point::new(0.0, -80.0));
        assert_eq!(button.state(), ButtonState::Disabled);
        assert_eq!(button.color(), 0x666666);
    }
}
