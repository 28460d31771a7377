use crate::config::TextConfig;
use crate::engine::{Point, Renderer, TextStyle};
use log::warn;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum TextToken {
    Text { content: String, bold: bool },
    Emoji { url: String },
}

impl TextToken {
    fn text(content: &str, bold: bool) -> Self {
        TextToken::Text {
            content: content.to_string(),
            bold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Width of a run of text in a given style. The canvas renderer measures for
/// real, tests plug in a fixed-pitch font.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> f64;
}

impl TextMeasure for Renderer {
    fn measure(&self, text: &str, style: &TextStyle) -> f64 {
        self.measure_text(text, style)
    }
}

enum Segment<'a> {
    Plain(&'a str),
    Enclosed(&'a str),
}

/// Splits on `open inner close` with a non-empty inner that holds no `close`.
fn split_enclosed(text: &str, open: char, close: char) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut search = 0;
    while let Some(offset) = text[search..].find(open) {
        let start = search + offset;
        let inner_start = start + open.len_utf8();
        match text[inner_start..].find(close) {
            Some(0) => search = inner_start,
            Some(len) => {
                if plain_start < start {
                    segments.push(Segment::Plain(&text[plain_start..start]));
                }
                segments.push(Segment::Enclosed(&text[inner_start..inner_start + len]));
                plain_start = inner_start + len + close.len_utf8();
                search = plain_start;
            }
            None => break,
        }
    }
    if plain_start < text.len() {
        segments.push(Segment::Plain(&text[plain_start..]));
    }
    segments
}

/// Words and the whitespace between them, in order, nothing dropped.
fn whitespace_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(previous) if previous != space => {
                runs.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

/// `"Hi {wave} *there* you"` → `Hi`, ` `, emoji, ` `, **there**, ` `, `you`.
/// Placeholders whose key is not in `emojis` produce nothing.
pub fn tokenize(text: &str, emojis: &HashMap<String, String>) -> Vec<TextToken> {
    let mut tokens = Vec::new();
    for segment in split_enclosed(text, '{', '}') {
        match segment {
            Segment::Enclosed(key) => match emojis.get(key.trim()) {
                Some(url) => tokens.push(TextToken::Emoji { url: url.clone() }),
                None => warn!("RichTextRenderer: no emoji for '{}'", key.trim()),
            },
            Segment::Plain(plain) => {
                for part in split_enclosed(plain, '*', '*') {
                    let (content, bold) = match part {
                        Segment::Enclosed(inner) => (inner, true),
                        Segment::Plain(plain) => (plain, false),
                    };
                    tokens.extend(
                        whitespace_runs(content)
                            .into_iter()
                            .map(|word| TextToken::text(word, bold)),
                    );
                }
            }
        }
    }
    tokens
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub items: Vec<(TextToken, f64)>,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedToken {
    pub token: TextToken,
    /// top-left
    pub position: Point,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub items: Vec<PlacedToken>,
    pub height: f64,
}

pub struct RichTextRenderer {
    emojis: HashMap<String, String>,
    config: TextConfig,
}

impl RichTextRenderer {
    pub fn new(emojis: HashMap<String, String>, config: TextConfig) -> Self {
        RichTextRenderer { emojis, config }
    }

    pub fn style(&self, bold: bool) -> TextStyle {
        TextStyle {
            font_family: self.config.font_family.clone(),
            font_size: self.config.font_size,
            color: self.config.color,
            bold,
            italic: false,
        }
    }

    /// Emojis are square, a little taller than the text.
    pub fn emoji_size(&self) -> f64 {
        self.config.font_size + 5.0
    }

    pub fn token_width(&self, token: &TextToken, measure: &dyn TextMeasure) -> f64 {
        match token {
            TextToken::Text { content, bold } => measure.measure(content, &self.style(*bold)),
            TextToken::Emoji { .. } => self.emoji_size(),
        }
    }

    /// Greedy wrap: a token that would overflow starts a new line unless the
    /// current line is empty. Tokens are never split.
    pub fn layout_lines(
        &self,
        tokens: Vec<TextToken>,
        max_width: f64,
        measure: &dyn TextMeasure,
    ) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current = Line {
            items: Vec::new(),
            width: 0.0,
        };
        for token in tokens {
            let width = self.token_width(&token, measure);
            if current.width + width > max_width && current.width > 0.0 {
                lines.push(std::mem::replace(
                    &mut current,
                    Line {
                        items: Vec::new(),
                        width: 0.0,
                    },
                ));
            }
            current.width += width;
            current.items.push((token, width));
        }
        if !current.items.is_empty() {
            lines.push(current);
        }
        lines
    }

    pub fn render(
        &self,
        text: &str,
        start_x: f64,
        start_y: f64,
        align: Align,
        max_width: f64,
        measure: &dyn TextMeasure,
    ) -> TextBlock {
        let lines = self.layout_lines(tokenize(text, &self.emojis), max_width, measure);
        let mut items = Vec::new();
        let mut y = start_y;
        for line in &lines {
            let mut x = match align {
                Align::Left => start_x,
                Align::Center => start_x + (max_width - line.width) / 2.0,
                Align::Right => start_x + max_width - line.width,
            };
            for (token, width) in &line.items {
                items.push(PlacedToken {
                    token: token.clone(),
                    position: Point::new(x, y),
                    width: *width,
                });
                x += width;
            }
            y += self.config.line_height;
        }
        TextBlock {
            items,
            height: y - start_y,
        }
    }
}
