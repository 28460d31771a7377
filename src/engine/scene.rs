use crate::engine::event::{names, EventBus, EventPayload};
use crate::engine::{Point, Renderer, Size};
use log::{debug, warn};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("no scene registered under '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Hidden,
    Visible,
}

/// Per-frame view handed to the active scene.
pub struct SceneContext<'a> {
    pub delta_ms: f64,
    pub events: &'a EventBus,
    pub viewport: Size,
    next_scene: Option<String>,
}

impl<'a> SceneContext<'a> {
    pub fn new(delta_ms: f64, events: &'a EventBus, viewport: Size) -> Self {
        SceneContext {
            delta_ms,
            events,
            viewport,
            next_scene: None,
        }
    }

    pub fn delta_s(&self) -> f64 {
        self.delta_ms * 0.001
    }

    /// Asks the manager to switch once the current callback returns. The last
    /// request in a frame wins.
    pub fn request_switch(&mut self, name: &str) {
        self.next_scene = Some(name.to_string());
    }

    pub fn requested_switch(&self) -> Option<&str> {
        self.next_scene.as_deref()
    }

    fn take_switch(&mut self) -> Option<String> {
        self.next_scene.take()
    }
}

/// A mutually exclusive, full-screen mode of the shell.
pub trait Scene {
    fn on_show(&mut self);
    fn on_hide(&mut self);
    fn update(&mut self, ctx: &mut SceneContext);
    fn fixed_update(&mut self, _ctx: &mut SceneContext) {}
    fn draw(&self, renderer: &Renderer);
    fn on_pointer_down(&mut self, _point: Point, _ctx: &mut SceneContext) {}
    fn on_pointer_move(&mut self, _point: Point) {}
    fn destroy(&mut self) {}
}

struct SceneSlot {
    scene: Box<dyn Scene>,
    state: SceneState,
}

impl SceneSlot {
    fn show(&mut self) {
        self.state = SceneState::Visible;
        self.scene.on_show();
    }

    fn hide(&mut self) {
        self.state = SceneState::Hidden;
        self.scene.on_hide();
    }
}

/// Name → scene registry with exactly one current scene.
///
/// ELI5:
/// ┌──────────── switch_to("b") ─────────────┐
/// │  current "a"  → hide()  → Hidden        │
/// │  target  "b"  → show()  → Visible       │
/// │  current = "b"                          │
/// ├──────────── switch_to("nope") ──────────┤
/// │  Err(Unknown), current untouched        │
/// └─────────────────────────────────────────┘
/// Only the current scene receives per-frame work.
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, SceneSlot>,
    current: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, scene: Box<dyn Scene>) {
        let slot = SceneSlot {
            scene,
            state: SceneState::Hidden,
        };
        if let Some(mut replaced) = self.scenes.insert(name.to_string(), slot) {
            warn!("SceneManager: scene '{}' was already registered and has been replaced", name);
            if self.current.as_deref() == Some(name) {
                self.current = None;
            }
            replaced.scene.destroy();
        }
    }

    pub fn switch_to(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            warn!("SceneManager: cannot switch to unknown scene '{}'", name);
            return Err(SceneError::Unknown(name.to_string()));
        }

        if let Some(slot) = self
            .current
            .take()
            .and_then(|current| self.scenes.get_mut(&current))
        {
            slot.hide();
        }

        if let Some(slot) = self.scenes.get_mut(name) {
            slot.show();
        }
        self.current = Some(name.to_string());
        debug!("SceneManager: switched to '{}'", name);
        Ok(())
    }

    pub fn update(&mut self, ctx: &mut SceneContext) {
        if let Some(slot) = self.current_slot_mut() {
            slot.scene.update(ctx);
        }
        self.apply_requested_switch(ctx);
    }

    pub fn fixed_update(&mut self, ctx: &mut SceneContext) {
        if let Some(slot) = self.current_slot_mut() {
            slot.scene.fixed_update(ctx);
        }
        self.apply_requested_switch(ctx);
    }

    pub fn pointer_down(&mut self, point: Point, ctx: &mut SceneContext) {
        if let Some(slot) = self.current_slot_mut() {
            slot.scene.on_pointer_down(point, ctx);
        }
        self.apply_requested_switch(ctx);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if let Some(slot) = self.current_slot_mut() {
            slot.scene.on_pointer_move(point);
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        if let Some(slot) = self.current.as_ref().and_then(|name| self.scenes.get(name)) {
            slot.scene.draw(renderer);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn state(&self, name: &str) -> Option<SceneState> {
        self.scenes.get(name).map(|slot| slot.state)
    }

    pub fn visible_count(&self) -> usize {
        self.scenes
            .values()
            .filter(|slot| slot.state == SceneState::Visible)
            .count()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn destroy(&mut self) {
        for (_, mut slot) in self.scenes.drain() {
            slot.scene.destroy();
        }
        self.current = None;
    }

    fn current_slot_mut(&mut self) -> Option<&mut SceneSlot> {
        let name = self.current.as_ref()?;
        self.scenes.get_mut(name)
    }

    fn apply_requested_switch(&mut self, ctx: &mut SceneContext) {
        let Some(next) = ctx.take_switch() else {
            return;
        };
        if self.switch_to(&next).is_ok() {
            ctx.events
                .trigger(names::SCENE_CHANGED, Some(&EventPayload::Scene(next)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        shows: Cell<u32>,
        hides: Cell<u32>,
        updates: Cell<u32>,
        destroyed: Cell<bool>,
    }

    struct Recorder {
        calls: Rc<Calls>,
        switch_on_update: Option<&'static str>,
    }

    impl Scene for Recorder {
        fn on_show(&mut self) {
            self.calls.shows.set(self.calls.shows.get() + 1);
        }
        fn on_hide(&mut self) {
            self.calls.hides.set(self.calls.hides.get() + 1);
        }
        fn update(&mut self, ctx: &mut SceneContext) {
            self.calls.updates.set(self.calls.updates.get() + 1);
            if let Some(next) = self.switch_on_update {
                ctx.request_switch(next);
            }
        }
        fn draw(&self, _renderer: &Renderer) {}
        fn destroy(&mut self) {
            self.calls.destroyed.set(true);
        }
    }

    fn recorder(manager: &mut SceneManager, name: &str) -> Rc<Calls> {
        let calls = Rc::new(Calls::default());
        manager.register(
            name,
            Box::new(Recorder {
                calls: Rc::clone(&calls),
                switch_on_update: None,
            }),
        );
        calls
    }

    fn viewport() -> Size {
        Size {
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn switching_hides_previous_and_shows_next() {
        let mut manager = SceneManager::new();
        let a = recorder(&mut manager, "a");
        let b = recorder(&mut manager, "b");

        manager.switch_to("a").unwrap();
        manager.switch_to("b").unwrap();

        assert_eq!(a.shows.get(), 1);
        assert_eq!(a.hides.get(), 1);
        assert_eq!(b.shows.get(), 1);
        assert_eq!(b.hides.get(), 0);
        assert_eq!(manager.current(), Some("b"));
        assert_eq!(manager.state("a"), Some(SceneState::Hidden));
        assert_eq!(manager.visible_count(), 1);
    }

    #[test]
    fn unknown_scene_leaves_current_unchanged() {
        let mut manager = SceneManager::new();
        let a = recorder(&mut manager, "a");
        manager.switch_to("a").unwrap();

        let result = manager.switch_to("unknown");

        assert_eq!(result, Err(SceneError::Unknown("unknown".to_string())));
        assert_eq!(manager.current(), Some("a"));
        assert_eq!(a.hides.get(), 0);
    }

    #[test]
    fn only_current_scene_is_updated() {
        let bus = EventBus::new();
        let mut manager = SceneManager::new();
        let a = recorder(&mut manager, "a");
        let b = recorder(&mut manager, "b");

        let mut ctx = SceneContext::new(16.0, &bus, viewport());
        manager.update(&mut ctx);
        assert_eq!(a.updates.get() + b.updates.get(), 0);

        manager.switch_to("b").unwrap();
        manager.update(&mut ctx);
        manager.update(&mut ctx);
        assert_eq!(a.updates.get(), 0);
        assert_eq!(b.updates.get(), 2);
    }

    #[test]
    fn scene_requested_switch_applies_after_update_and_announces_it() {
        let bus = EventBus::new();
        let announced = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&announced);
        bus.on(names::SCENE_CHANGED, move |payload| {
            if let Some(EventPayload::Scene(name)) = payload {
                sink.borrow_mut().push(name.clone());
            }
        });

        let mut manager = SceneManager::new();
        let menu_calls = Rc::new(Calls::default());
        manager.register(
            "menu",
            Box::new(Recorder {
                calls: Rc::clone(&menu_calls),
                switch_on_update: Some("game"),
            }),
        );
        let game = recorder(&mut manager, "game");
        manager.switch_to("menu").unwrap();

        let mut ctx = SceneContext::new(16.0, &bus, viewport());
        manager.update(&mut ctx);

        assert_eq!(manager.current(), Some("game"));
        assert_eq!(menu_calls.hides.get(), 1);
        assert_eq!(game.shows.get(), 1);
        assert_eq!(*announced.borrow(), vec!["game".to_string()]);
    }

    #[test]
    fn destroy_tears_down_every_scene() {
        let mut manager = SceneManager::new();
        let a = recorder(&mut manager, "a");
        let b = recorder(&mut manager, "b");
        manager.switch_to("a").unwrap();

        manager.destroy();

        assert!(a.destroyed.get() && b.destroyed.get());
        assert_eq!(manager.current(), None);
        assert!(!manager.is_registered("a"));
    }
}
