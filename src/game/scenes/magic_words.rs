use super::{BackButton, Shared, MAIN_MENU};
use crate::browser;
use crate::engine::scene::{Scene, SceneContext};
use crate::engine::{Point, Renderer};
use crate::game::audio::{AudioManager, MESSAGE};
use crate::game::dialogue::container::DialogueContainer;
use crate::game::dialogue::rich_text::TextMeasure;
use crate::game::dialogue::sequencer::SequenceEvent;
use crate::game::dialogue::service::MagicWordsService;
use crate::game::dialogue::ImageCache;
use log::debug;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

const MESSAGE_VOLUME: f64 = 0.4;

/// Response slot for one visit. `None` until the fetch settles, then the
/// payload or `None` for a failed request.
type Pending = Rc<RefCell<Option<Option<Value>>>>;

pub struct MagicWordsScene {
    service: Rc<MagicWordsService>,
    audio: Rc<AudioManager>,
    measure: Rc<dyn TextMeasure>,
    container: DialogueContainer,
    images: Rc<ImageCache>,
    /// replaced on every show, a late answer for an earlier visit lands in a
    /// slot nobody reads any more
    pending: Pending,
    back: BackButton,
}

impl MagicWordsScene {
    pub fn new(shared: &Shared, measure: Rc<dyn TextMeasure>) -> Self {
        MagicWordsScene {
            service: shared.registry.instance::<MagicWordsService>(),
            audio: shared.audio(),
            measure,
            container: DialogueContainer::new(shared.config.magic_words.clone()),
            images: Rc::new(ImageCache::default()),
            pending: Rc::new(RefCell::new(None)),
            back: BackButton::new(shared),
        }
    }

    /// Starts a new visit and returns the slot its payload goes into.
    fn begin_visit(&mut self) -> Pending {
        self.container.reset();
        self.pending = Rc::new(RefCell::new(None));
        Rc::clone(&self.pending)
    }

    /// Plays `data` as soon as the next update runs.
    pub fn deliver(&self, data: Option<Value>) {
        *self.pending.borrow_mut() = Some(data);
    }

    pub fn container(&self) -> &DialogueContainer {
        &self.container
    }
}

impl Scene for MagicWordsScene {
    fn on_show(&mut self) {
        let slot = self.begin_visit();
        let service = Rc::clone(&self.service);
        browser::spawn_local(async move {
            let data = service.fetch().await;
            *slot.borrow_mut() = Some(data);
        });
    }

    fn on_hide(&mut self) {
        self.begin_visit();
    }

    fn update(&mut self, ctx: &mut SceneContext) {
        self.back.layout(ctx.viewport);

        let arrived = self.pending.borrow_mut().take();
        if let Some(data) = arrived {
            debug!("MagicWordsScene: payload received : {}", data.is_some());
            self.container.print_data(data.as_ref(), self.measure.as_ref());
        }

        for event in self.container.update(ctx.delta_ms, self.measure.as_ref()) {
            if let SequenceEvent::Bubble(_) = event {
                self.audio.play(MESSAGE, MESSAGE_VOLUME);
            }
        }
    }

    fn draw(&self, renderer: &Renderer) {
        for url in self.container.image_urls() {
            self.images.request(url);
        }
        self.container.draw(renderer, &self.images);
        self.back.draw(renderer);
    }

    fn on_pointer_down(&mut self, point: Point, ctx: &mut SceneContext) {
        if self.back.pointer_down(point) {
            ctx.request_switch(MAIN_MENU);
        }
    }

    fn on_pointer_move(&mut self, point: Point) {
        self.back.pointer_move(point);
    }

    fn destroy(&mut self) {
        self.container.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::event::EventBus;
    use crate::engine::registry::Registry;
    use crate::engine::Size;
    use crate::game::dialogue::rich_text::tests::FixedPitch;
    use serde_json::json;

    fn scene() -> MagicWordsScene {
        let shared = Shared {
            config: Rc::new(GameConfig::default()),
            registry: Rc::new(Registry::new()),
        };
        MagicWordsScene::new(&shared, Rc::new(FixedPitch))
    }

    fn step(scene: &mut MagicWordsScene, events: &EventBus, delta_ms: f64) {
        let mut ctx = SceneContext::new(delta_ms, events, Size::default());
        scene.update(&mut ctx);
    }

    #[test]
    fn delivered_payload_is_played() {
        let events = EventBus::new();
        let mut scene = scene();
        scene.deliver(Some(json!({ "dialogue": [{ "name": "Sheldon", "text": "Hi" }] })));

        step(&mut scene, &events, 0.0);
        assert!(scene.container().sequencer().is_running());

        step(&mut scene, &events, 1600.0);
        assert_eq!(scene.container().history().len(), 1);
    }

    #[test]
    fn failed_fetch_shows_the_fallback_message() {
        let events = EventBus::new();
        let mut scene = scene();
        scene.deliver(None);
        step(&mut scene, &events, 16.0);

        assert!(scene.container().history().system_message().is_some());
        assert!(!scene.container().sequencer().is_running());
    }

    #[test]
    fn hiding_discards_a_late_payload() {
        let events = EventBus::new();
        let mut scene = scene();
        let stale = scene.begin_visit();
        scene.on_hide();
        *stale.borrow_mut() = Some(Some(json!({ "dialogue": ["late"] })));

        step(&mut scene, &events, 5000.0);
        assert!(scene.container().history().is_empty());
        assert!(scene.container().history().system_message().is_none());
    }
}
