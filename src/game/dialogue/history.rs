use super::bubble::Bubble;
use super::ImageCache;
use crate::config::HistoryConfig;
use crate::engine::{Point, Renderer};

/// Chat log: the newest bubble sits on the anchor, older ones climb and fade.
pub struct DialogueHistory {
    /// oldest first
    bubbles: Vec<Bubble>,
    system_message: Option<Bubble>,
    config: HistoryConfig,
}

impl DialogueHistory {
    pub fn new(config: HistoryConfig) -> Self {
        DialogueHistory {
            bubbles: Vec::new(),
            system_message: None,
            config,
        }
    }

    pub fn push(&mut self, mut bubble: Bubble) {
        let shift = bubble.height() + self.config.spacing;
        for older in &mut self.bubbles {
            older.position.y -= shift;
            older.alpha *= self.config.fade_factor;
        }
        bubble.position = Point::default();
        self.bubbles.push(bubble);

        let newest = self.bubbles.len() - 1;
        for (i, older) in self.bubbles.iter_mut().enumerate() {
            if newest - i >= self.config.max_visible_age {
                older.alpha = 0.0;
                older.interactive = false;
            }
        }

        let excess = self.bubbles.len().saturating_sub(self.config.max_retained);
        self.bubbles.drain(..excess);
    }

    pub fn set_system_message(&mut self, mut message: Bubble) {
        message.position = Point::default();
        self.system_message = Some(message);
    }

    pub fn clear_system_message(&mut self) {
        self.system_message = None;
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.system_message = None;
    }

    pub fn update(&mut self, dt_s: f64) {
        for bubble in self.bubbles.iter_mut().chain(self.system_message.iter_mut()) {
            bubble.update(dt_s);
        }
    }

    pub fn draw(&self, renderer: &Renderer, images: &ImageCache) {
        for bubble in self.bubbles.iter().chain(self.system_message.iter()) {
            bubble.draw(renderer, images);
        }
    }

    /// oldest first
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn system_message(&self) -> Option<&Bubble> {
        self.system_message.as_ref()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}
