use super::card::CardSprite;
use super::deck::{CardDeck, DeckLayout};
use crate::config::AceOfShadowsConfig;
use crate::engine::timer::Interval;
use crate::engine::Point;
use log::{debug, info};
use rand::rngs::StdRng;

/// Cards in the air draw above every stack.
const IN_FLIGHT_Z: i32 = 100_000;
/// z range reserved per deck, the source takes the first.
const DECK_Z_SPAN: i32 = 1_000;

struct InFlight {
    card: CardSprite,
    target: usize,
}

/// Deals the source deck card by card onto the target decks, round-robin.
///
/// ELI5:
/// every interval  : source.pop() ──animate──▶ targets[next % N]
/// on landing      : targets[i].push(card, z above its current top)
/// source empty    : interval cancelled for good, cards in the air still land
pub struct CardStackManager {
    source: CardDeck,
    targets: Vec<CardDeck>,
    in_flight: Vec<InFlight>,
    timer: Interval,
    next_target: usize,
    move_duration_ms: f64,
    dealt: Vec<usize>,
    rng: StdRng,
}

impl CardStackManager {
    pub fn new(
        spawn: Point,
        target_anchors: &[Point],
        config: &AceOfShadowsConfig,
        mut rng: StdRng,
    ) -> Self {
        let layout = |base_z| DeckLayout {
            position_offset: config.position_offset,
            rotation_offset: config.rotation_offset,
            card_scale: config.card_scale,
            base_z,
        };
        let mut source = CardDeck::new(spawn, layout(0));
        source.create_cards(config.card_count, &mut rng);
        let targets = target_anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| CardDeck::new(*anchor, layout(DECK_Z_SPAN * (i as i32 + 1))))
            .collect();

        let mut timer = Interval::new(config.interval_delay);
        if target_anchors.is_empty() {
            timer.cancel();
        }
        info!(
            "CardStackManager: {} cards, {} stacks",
            config.card_count,
            target_anchors.len()
        );

        CardStackManager {
            source,
            targets,
            in_flight: Vec::new(),
            timer,
            next_target: 0,
            move_duration_ms: config.move_duration * 1000.0,
            dealt: Vec::new(),
            rng,
        }
    }

    pub fn update(&mut self, dt_ms: f64) {
        for _ in 0..self.timer.poll(dt_ms) {
            self.deal_next();
        }

        let mut landed = Vec::new();
        for (i, flight) in self.in_flight.iter_mut().enumerate() {
            if flight.card.update(dt_ms) {
                landed.push(i);
            }
        }
        for i in landed.into_iter().rev() {
            let flight = self.in_flight.remove(i);
            let deck = &mut self.targets[flight.target];
            let z = deck.top_z();
            deck.push(flight.card, z);
        }
    }

    fn deal_next(&mut self) {
        let Some(mut card) = self.source.pop() else {
            self.timer.cancel();
            return;
        };
        let target = self.next_target % self.targets.len();
        self.next_target += 1;
        self.dealt.push(target);

        let deck = &self.targets[target];
        let anchor = deck.anchor();
        let destination = Point::new(
            deck.randomize_position(anchor.x, &mut self.rng),
            deck.randomize_position(anchor.y, &mut self.rng),
        );
        let rotation = deck.randomize_rotation(&mut self.rng);
        card.sprite.z_index = IN_FLIGHT_Z + self.dealt.len() as i32;
        card.animate_to(destination, rotation, self.move_duration_ms);
        self.in_flight.push(InFlight { card, target });

        if self.source.is_empty() {
            debug!("CardStackManager: source exhausted after {} deals", self.dealt.len());
            self.timer.cancel();
        }
    }

    /// Every card, back to front.
    pub fn cards(&self) -> Vec<&CardSprite> {
        let mut cards: Vec<&CardSprite> = self
            .source
            .cards()
            .iter()
            .chain(self.targets.iter().flat_map(|deck| deck.cards().iter()))
            .chain(self.in_flight.iter().map(|flight| &flight.card))
            .collect();
        crate::sprite::sort_by_z(&mut cards, |card| card.sprite.z_index);
        cards
    }

    /// Target index of every deal so far, in order.
    pub fn dealt_targets(&self) -> &[usize] {
        &self.dealt
    }

    pub fn source(&self) -> &CardDeck {
        &self.source
    }

    pub fn targets(&self) -> &[CardDeck] {
        &self.targets
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// No more deals will happen and nothing is in the air.
    pub fn is_finished(&self) -> bool {
        self.timer.is_cancelled() && self.in_flight.is_empty()
    }

    pub fn destroy(&mut self) {
        self.timer.cancel();
        self.in_flight.clear();
        self.source.destroy();
        for deck in &mut self.targets {
            deck.destroy();
        }
    }
}
