use super::parser::{AvatarData, AvatarPosition, DialogueItem};
use super::rich_text::{Align, PlacedToken, RichTextRenderer, TextMeasure, TextToken};
use super::ImageCache;
use crate::config::{BubbleConfig, MagicWordsConfig, TextConfig};
use crate::engine::tween::{Ease, Tween};
use crate::engine::{Point, Rect, Renderer, Size, TextStyle};
use crate::sprite::Sprite;
use std::collections::HashMap;

const LABEL_COLOR: u32 = 0xAAAAAA;
const NAME_FONT_SIZE: f64 = 18.0;
const SYSTEM_FONT_SIZE: f64 = 24.0;
const SYSTEM_FADE_S: f64 = 0.5;
const TOKEN_FADE_S: f64 = 0.1;

struct Label {
    text: String,
    /// top-left
    position: Point,
    width: f64,
    style: TextStyle,
}

impl Label {
    fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.style.font_size)
    }
}

struct Avatar {
    url: String,
    bounds: Rect,
}

struct TypedToken {
    placed: PlacedToken,
    reveal: Tween,
}

enum Body {
    Dialogue {
        avatar: Option<Avatar>,
        tokens: Vec<TypedToken>,
        name: Label,
        text_style: TextStyle,
        emoji_size: f64,
    },
    System {
        label: Label,
        fade: Tween,
    },
}

/// One speech bubble (or a centred system line). Content is laid out in
/// local space, `pivot` is the centre of its bounds and lands on `position`.
pub struct Bubble {
    pub position: Point,
    /// multiplied in by the history as the bubble ages
    pub alpha: f64,
    pub interactive: bool,
    bounds: Rect,
    scale: Tween,
    body: Body,
}

impl Bubble {
    pub fn update(&mut self, dt_s: f64) {
        self.scale.update(dt_s);
        match &mut self.body {
            Body::Dialogue { tokens, .. } => {
                for token in tokens {
                    token.reveal.update(dt_s);
                }
            }
            Body::System { fade, .. } => {
                fade.update(dt_s);
            }
        }
    }

    pub fn height(&self) -> f64 {
        self.bounds.height
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.bounds.width,
            height: self.bounds.height,
        }
    }

    pub fn pivot(&self) -> Point {
        self.bounds.center()
    }

    pub fn scale(&self) -> f64 {
        self.scale.value()
    }

    pub fn is_system(&self) -> bool {
        matches!(self.body, Body::System { .. })
    }

    /// Tokens whose typewriter fade has completed.
    pub fn revealed_tokens(&self) -> usize {
        match &self.body {
            Body::Dialogue { tokens, .. } => tokens.iter().filter(|t| t.reveal.is_finished()).count(),
            Body::System { .. } => 0,
        }
    }

    pub fn token_count(&self) -> usize {
        match &self.body {
            Body::Dialogue { tokens, .. } => tokens.len(),
            Body::System { .. } => 0,
        }
    }

    /// Remote images this bubble shows: avatar and emojis.
    pub fn image_urls(&self) -> Vec<&str> {
        let Body::Dialogue { avatar, tokens, .. } = &self.body else {
            return Vec::new();
        };
        avatar
            .iter()
            .map(|avatar| avatar.url.as_str())
            .chain(tokens.iter().filter_map(|token| match &token.placed.token {
                TextToken::Emoji { url } => Some(url.as_str()),
                TextToken::Text { .. } => None,
            }))
            .collect()
    }

    pub fn draw(&self, renderer: &Renderer, images: &ImageCache) {
        if self.alpha <= 0.0 {
            return;
        }
        let mut transform = Sprite::at(self.position.x, self.position.y);
        transform.set_scale(self.scale.value());
        transform.alpha = self.alpha;
        let pivot = self.pivot();
        let local = |p: Point| Point::new(p.x - pivot.x, p.y - pivot.y);

        renderer.with_transform(&transform, |renderer| match &self.body {
            Body::Dialogue {
                avatar,
                tokens,
                name,
                text_style,
                emoji_size,
            } => {
                if let Some(avatar) = avatar {
                    let origin = local(Point::new(avatar.bounds.x, avatar.bounds.y));
                    let rect = Rect::new(origin.x, origin.y, avatar.bounds.width, avatar.bounds.height);
                    renderer.fill_rounded_rect(&rect, 10.0, 0xFFFFFF, 0.1);
                    if let Some(image) = images.get(&avatar.url) {
                        let frame = Rect::new(0.0, 0.0, image.natural_width().into(), image.natural_height().into());
                        renderer.draw_image(&image, &frame, &rect);
                    }
                }
                for token in tokens {
                    let alpha = token.reveal.value();
                    let at = local(token.placed.position);
                    match &token.placed.token {
                        TextToken::Text { content, bold } => {
                            let style = TextStyle {
                                bold: *bold,
                                ..text_style.clone()
                            };
                            renderer.fill_text(content, at, &style, alpha);
                        }
                        TextToken::Emoji { url } => {
                            // sits slightly above the text line
                            let rect = Rect::new(at.x, at.y - emoji_size * 0.15, *emoji_size, *emoji_size);
                            if let Some(image) = images.get(url) {
                                let frame =
                                    Rect::new(0.0, 0.0, image.natural_width().into(), image.natural_height().into());
                                let faded = Sprite {
                                    alpha,
                                    ..Sprite::default()
                                };
                                renderer.with_transform(&faded, |r| r.draw_image(&image, &frame, &rect));
                            }
                        }
                    }
                }
                renderer.fill_text(&name.text, local(name.position), &name.style, 1.0);
            }
            Body::System { label, fade } => {
                renderer.fill_text(&label.text, local(label.position), &label.style, fade.value());
            }
        });
    }
}

/// Builds bubbles for one conversation: avatar side, wrapped rich text,
/// name label, pop-in and typewriter reveal.
pub struct DialogueBubbleFactory {
    avatars: HashMap<String, AvatarData>,
    text: RichTextRenderer,
    bubble: BubbleConfig,
    text_config: TextConfig,
}

impl DialogueBubbleFactory {
    pub fn new(
        avatars: HashMap<String, AvatarData>,
        emojis: HashMap<String, String>,
        config: &MagicWordsConfig,
    ) -> Self {
        DialogueBubbleFactory {
            avatars,
            text: RichTextRenderer::new(emojis, config.text.clone()),
            bubble: config.bubble.clone(),
            text_config: config.text.clone(),
        }
    }

    fn alignment(avatar: Option<&AvatarData>) -> Align {
        match avatar.map(|avatar| avatar.position) {
            None => Align::Center,
            Some(AvatarPosition::Right) => Align::Right,
            Some(AvatarPosition::Left) => Align::Left,
        }
    }

    /// (text start x, text max width)
    fn text_bounds(&self, align: Align) -> (f64, f64) {
        let BubbleConfig {
            width,
            avatar_size,
            padding,
            ..
        } = self.bubble;
        match align {
            Align::Left => (avatar_size + padding, width - avatar_size - padding),
            Align::Right => (0.0, width - avatar_size - padding),
            Align::Center => (0.0, width),
        }
    }

    fn label_style(&self, font_size: f64) -> TextStyle {
        TextStyle {
            font_family: self.text_config.font_family.clone(),
            font_size,
            color: LABEL_COLOR,
            bold: false,
            italic: true,
        }
    }

    pub fn create(&self, item: &DialogueItem, measure: &dyn TextMeasure) -> Bubble {
        let avatar_data = self.avatars.get(&item.name);
        let align = Self::alignment(avatar_data);
        let size = self.bubble.avatar_size;

        let avatar = avatar_data.map(|data| Avatar {
            url: data.url.clone(),
            bounds: Rect::new(
                if align == Align::Right {
                    self.bubble.width - size
                } else {
                    0.0
                },
                0.0,
                size,
                size,
            ),
        });

        let (text_x, text_width) = self.text_bounds(align);
        let block = self.text.render(&item.text, text_x, 0.0, align, text_width, measure);

        let name_style = self.label_style(NAME_FONT_SIZE);
        let name_width = measure.measure(&item.name, &name_style);
        let name_x = match align {
            Align::Right => text_width - name_width,
            Align::Center => (self.bubble.width - name_width) / 2.0,
            Align::Left => text_x,
        };
        let name = Label {
            text: item.name.clone(),
            position: Point::new(name_x, block.height + 5.0),
            width: name_width,
            style: name_style,
        };

        let text_style = self.text.style(false);
        let emoji_size = self.text.emoji_size();
        let mut bounds = name.bounds();
        if let Some(avatar) = &avatar {
            bounds = bounds.union(&avatar.bounds);
        }
        for placed in &block.items {
            let height = match placed.token {
                TextToken::Text { .. } => text_style.font_size,
                TextToken::Emoji { .. } => emoji_size,
            };
            bounds = bounds.union(&Rect::new(placed.position.x, placed.position.y, placed.width, height));
        }

        let pop = self.bubble.pop_in_duration;
        let tokens = block
            .items
            .into_iter()
            .enumerate()
            .map(|(i, placed)| TypedToken {
                placed,
                reveal: Tween::new(0.0, 1.0, TOKEN_FADE_S, Ease::Linear)
                    .with_delay(pop * 0.5 + i as f64 * self.text_config.typewriter_speed),
            })
            .collect();

        Bubble {
            position: Point::default(),
            alpha: 1.0,
            interactive: true,
            bounds,
            scale: Tween::new(0.0, 1.0, pop, Ease::BackOut(self.bubble.pop_in_overshoot)),
            body: Body::Dialogue {
                avatar,
                tokens,
                name,
                text_style,
                emoji_size,
            },
        }
    }

    /// Centred grey italic line that fades in.
    pub fn create_system_message(&self, text: &str, measure: &dyn TextMeasure) -> Bubble {
        let style = self.label_style(SYSTEM_FONT_SIZE);
        let width = measure.measure(text, &style);
        let label = Label {
            text: text.to_string(),
            position: Point::new(-width / 2.0, -SYSTEM_FONT_SIZE / 2.0),
            width,
            style,
        };
        Bubble {
            position: Point::default(),
            alpha: 1.0,
            interactive: false,
            bounds: label.bounds(),
            scale: Tween::new(1.0, 1.0, 0.0, Ease::Linear),
            body: Body::System {
                label,
                fade: Tween::new(0.0, 1.0, SYSTEM_FADE_S, Ease::Linear),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dialogue::rich_text::tests::FixedPitch;
    use approx::assert_relative_eq;

    fn factory() -> DialogueBubbleFactory {
        let avatars = HashMap::from([
            (
                "Sheldon".to_string(),
                AvatarData {
                    name: "Sheldon".into(),
                    url: "sheldon.png".into(),
                    position: AvatarPosition::Left,
                },
            ),
            (
                "Penny".to_string(),
                AvatarData {
                    name: "Penny".into(),
                    url: "penny.png".into(),
                    position: AvatarPosition::Right,
                },
            ),
        ]);
        let emojis = HashMap::from([("sad".to_string(), "sad.png".to_string())]);
        DialogueBubbleFactory::new(avatars, emojis, &MagicWordsConfig::default())
    }

    fn line(name: &str, text: &str) -> DialogueItem {
        DialogueItem {
            name: name.into(),
            text: text.into(),
        }
    }

    #[test]
    fn left_speaker_text_starts_after_the_avatar() {
        let bubble = factory().create(&line("Sheldon", "hi {sad}"), &FixedPitch);
        let Body::Dialogue { tokens, avatar, .. } = &bubble.body else {
            panic!("expected a dialogue bubble");
        };
        assert_eq!(tokens[0].placed.position.x, 120.0);
        assert_eq!(avatar.as_ref().map(|a| a.bounds.x), Some(0.0));
        assert_eq!(bubble.image_urls(), vec!["sheldon.png", "sad.png"]);
    }

    #[test]
    fn right_speaker_avatar_on_the_far_side() {
        let bubble = factory().create(&line("Penny", "hello"), &FixedPitch);
        let Body::Dialogue { tokens, avatar, name, .. } = &bubble.body else {
            panic!("expected a dialogue bubble");
        };
        assert_eq!(avatar.as_ref().map(|a| a.bounds.x), Some(400.0));
        // right aligned inside 380 px
        assert_eq!(tokens[0].placed.position.x, 380.0 - 50.0);
        assert_eq!(name.position.x, 380.0 - 50.0);
        assert_eq!(name.position.y, 45.0);
    }

    #[test]
    fn unknown_speaker_is_centred_without_avatar() {
        let bubble = factory().create(&line("Unknown", "ab"), &FixedPitch);
        assert_eq!(bubble.image_urls(), Vec::<&str>::new());
        let pivot = bubble.pivot();
        assert_relative_eq!(pivot.x, 250.0);
    }

    #[test]
    fn pops_in_then_types_out() {
        let mut bubble = factory().create(&line("Sheldon", "one two three"), &FixedPitch);
        assert_eq!(bubble.scale(), 0.0);
        assert_eq!(bubble.token_count(), 5);

        bubble.update(0.3);
        assert!(bubble.scale() > 0.0);
        assert_eq!(bubble.revealed_tokens(), 0);

        bubble.update(0.12);
        assert_eq!(bubble.revealed_tokens(), 1);

        bubble.update(1.0);
        assert_relative_eq!(bubble.scale(), 1.0);
        assert_eq!(bubble.revealed_tokens(), 5);
    }

    #[test]
    fn system_message_fades_in_centred() {
        let mut message = factory().create_system_message("... Conversation starting ...", &FixedPitch);
        assert!(message.is_system());
        assert!(!message.interactive);
        assert_relative_eq!(message.pivot().x, 0.0);
        message.update(0.5);
        let Body::System { fade, .. } = &message.body else {
            panic!("expected a system message");
        };
        assert_relative_eq!(fade.value(), 1.0);
    }
}
