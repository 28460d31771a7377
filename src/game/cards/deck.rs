use super::card::CardSprite;
use crate::engine::{random, Point};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckLayout {
    pub position_offset: f64,
    pub rotation_offset: f64,
    pub card_scale: f64,
    pub base_z: i32,
}

/// LIFO stack of cards around an anchor point.
pub struct CardDeck {
    cards: Vec<CardSprite>,
    anchor: Point,
    layout: DeckLayout,
}

impl CardDeck {
    pub fn new(anchor: Point, layout: DeckLayout) -> Self {
        CardDeck {
            cards: Vec::new(),
            anchor,
            layout,
        }
    }

    /// Spawns `count` cards on the anchor with positional and rotational jitter,
    /// each one stacked above the previous.
    pub fn create_cards<R: Rng>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            let mut card = CardSprite::new(
                self.randomize_position(self.anchor.x, rng),
                self.randomize_position(self.anchor.y, rng),
                self.layout.card_scale,
            );
            card.sprite.rotation = self.randomize_rotation(rng);
            card.sprite.z_index = self.top_z();
            self.cards.push(card);
        }
    }

    pub fn pop(&mut self) -> Option<CardSprite> {
        self.cards.pop()
    }

    pub fn push(&mut self, mut card: CardSprite, z_index: i32) {
        card.sprite.z_index = z_index;
        self.cards.push(card);
    }

    /// z for a card landing on top right now.
    pub fn top_z(&self) -> i32 {
        self.layout.base_z + self.cards.len() as i32
    }

    pub fn randomize_position<R: Rng>(&self, base: f64, rng: &mut R) -> f64 {
        random::jitter(rng, base, self.layout.position_offset)
    }

    pub fn randomize_rotation<R: Rng>(&self, rng: &mut R) -> f64 {
        random::jitter(rng, 0.0, self.layout.rotation_offset)
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn cards(&self) -> &[CardSprite] {
        &self.cards
    }

    pub fn top(&self) -> Option<&CardSprite> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn destroy(&mut self) {
        self.cards.clear();
    }
}
