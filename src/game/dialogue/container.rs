use super::bubble::DialogueBubbleFactory;
use super::history::DialogueHistory;
use super::parser::DialogueParser;
use super::rich_text::TextMeasure;
use super::sequencer::{DialogueSequencer, SequenceEvent};
use super::ImageCache;
use crate::config::MagicWordsConfig;
use crate::engine::Renderer;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;

pub const NO_DIALOGUE: &str = "No dialogue found.";

/// Glues parser, factory, sequencer and history together for one payload.
pub struct DialogueContainer {
    sequencer: DialogueSequencer,
    history: DialogueHistory,
    factory: DialogueBubbleFactory,
    config: MagicWordsConfig,
}

impl DialogueContainer {
    pub fn new(config: MagicWordsConfig) -> Self {
        DialogueContainer {
            sequencer: DialogueSequencer::new(config.sequence.display_time),
            history: DialogueHistory::new(config.history.clone()),
            factory: DialogueBubbleFactory::new(HashMap::new(), HashMap::new(), &config),
            config,
        }
    }

    /// Drops whatever was playing and starts over with `data`.
    pub fn print_data(&mut self, data: Option<&Value>, measure: &dyn TextMeasure) {
        self.reset();
        let parsed = data.map(DialogueParser::parse).unwrap_or_default();
        info!("DialogueContainer: {} lines queued", parsed.dialogues.len());

        self.factory = DialogueBubbleFactory::new(parsed.avatars, parsed.emojis, &self.config);
        if parsed.dialogues.is_empty() {
            self.history
                .set_system_message(self.factory.create_system_message(NO_DIALOGUE, measure));
            return;
        }
        let events = self.sequencer.start(&parsed.dialogues);
        self.apply(&events, measure);
    }

    /// Advances playback and every bubble animation. Returns what the
    /// sequencer emitted this frame.
    pub fn update(&mut self, dt_ms: f64, measure: &dyn TextMeasure) -> Vec<SequenceEvent> {
        let events = self.sequencer.update(dt_ms);
        self.apply(&events, measure);
        self.history.update(dt_ms / 1000.0);
        events
    }

    fn apply(&mut self, events: &[SequenceEvent], measure: &dyn TextMeasure) {
        for event in events {
            match event {
                // before the first line the message has the stage to itself
                SequenceEvent::SystemMessage(text) if self.history.is_empty() => {
                    self.history
                        .set_system_message(self.factory.create_system_message(text, measure));
                }
                SequenceEvent::SystemMessage(text) => {
                    self.history
                        .push(self.factory.create_system_message(text, measure));
                }
                SequenceEvent::RemoveStartMessage => self.history.clear_system_message(),
                SequenceEvent::Bubble(item) => {
                    debug!("DialogueContainer: {} says '{}'", item.name, item.text);
                    self.history.push(self.factory.create(item, measure));
                }
                SequenceEvent::Ended => debug!("DialogueContainer: conversation over"),
            }
        }
    }

    pub fn reset(&mut self) {
        self.sequencer.stop();
        self.history.clear();
    }

    /// Images for everything currently on screen.
    pub fn image_urls(&self) -> Vec<&str> {
        self.history
            .bubbles()
            .iter()
            .flat_map(|bubble| bubble.image_urls())
            .collect()
    }

    pub fn history(&self) -> &DialogueHistory {
        &self.history
    }

    pub fn sequencer(&self) -> &DialogueSequencer {
        &self.sequencer
    }

    pub fn draw(&self, renderer: &Renderer, images: &ImageCache) {
        self.history.draw(renderer, images);
    }
}
