use crate::browser;
use crate::config::{GameConfig, TimeConfig};
use crate::engine::event::{names, EventBus, Subscription};
use crate::engine::registry::Registry;
use crate::engine::resources::{AssetSource, Resources};
use crate::engine::scene::{SceneContext, SceneManager};
use crate::engine::time;
use crate::engine::{Game, Point, Renderer, Size};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use log::{info, warn};
use std::rc::Rc;

pub mod audio;
pub mod cards;
pub mod dialogue;
pub mod fire;
pub mod scenes;
pub mod ui;

use self::audio::AudioManager;
use self::dialogue::rich_text::TextMeasure;
use self::dialogue::service::MagicWordsService;
use self::scenes::ace_of_shadows::AceOfShadowsScene;
use self::scenes::magic_words::MagicWordsScene;
use self::scenes::main_menu::MainMenuScene;
use self::scenes::phoenix_flame::PhoenixFlameScene;
use self::scenes::Shared;

/// TABLE
/// ┌──────────────────────── Shell Architecture ─────────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐   bus    ┌──────────────┐  current  ┌────────────┐   │
/// │    │  GameLoop   ├─────────►│ PlayableShell├──────────►│   Scene    │   │
/// │    │  (engine)   │ tick/ptr │ SceneManager │   only    │ menu/cards │   │
/// │    └─────────────┘          └──────┬───────┘           │ words/fire │   │
/// │                                    │                   └─────┬──────┘   │
/// │                              ┌─────┴──────┐                  │          │
/// │                              │  Registry  │◄─────────────────┘          │
/// │                              │ Resources  │  shared services            │
/// │                              │ Audio, API │                             │
/// │                              └────────────┘                             │
/// │                                                                         │
/// ├──────────────────────── Boot Sequence ──────────────────────────────────┤
/// │                                                                         │
/// │  1. config.json (defaults when absent)                                  │
/// │  2. asset manifest → Resources, dialogue prefetch in parallel           │
/// │  3. registry: Resources, AudioManager, MagicWordsService                │
/// │  4. scenes registered, mainMenu shown                                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum PlayableShell {
    /// Nothing fetched yet
    Loading,

    /// Assets loaded, scenes registered
    Loaded(Shell),
}

pub struct Shell {
    events: Rc<EventBus>,
    viewport: Size,
    scenes: SceneManager,
    config: Rc<GameConfig>,
    _first_click: Subscription,
}

impl PlayableShell {
    const CONFIG_PATH: &'static str = "config.json";

    pub fn new() -> Self {
        PlayableShell::Loading
    }

    async fn load_config() -> GameConfig {
        let loaded = browser::fetch_json::<serde_json::Value>(Self::CONFIG_PATH)
            .await
            .and_then(GameConfig::from_value);
        match loaded {
            Ok(config) => config,
            Err(err) => {
                warn!("PlayableShell: using default config : {:#}", err);
                GameConfig::default()
            }
        }
    }

    async fn load_manifest(path: &str) -> Vec<AssetSource> {
        match browser::fetch_json::<Vec<AssetSource>>(path)
            .await
            .with_context(|| format!("Failed to load asset manifest from : {}", path))
        {
            Ok(sources) => sources,
            Err(err) => {
                warn!("PlayableShell: no assets : {:#}", err);
                Vec::new()
            }
        }
    }
}

impl Default for PlayableShell {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers every scene against the shared services and shows the menu.
pub fn build_scenes(shared: &Shared, measure: Rc<dyn TextMeasure>) -> Result<SceneManager> {
    let mut manager = SceneManager::new();
    manager.register(scenes::MAIN_MENU, Box::new(MainMenuScene::new(shared)));
    manager.register(
        scenes::ACE_OF_SHADOWS,
        Box::new(AceOfShadowsScene::new(shared)),
    );
    manager.register(
        scenes::MAGIC_WORDS,
        Box::new(MagicWordsScene::new(shared, measure)),
    );
    manager.register(
        scenes::PHOENIX_FLAME,
        Box::new(PhoenixFlameScene::new(shared)),
    );
    manager.switch_to(scenes::MAIN_MENU)?;
    Ok(manager)
}

/// Canvas pixels (top-left origin) → scene space (centre origin).
pub fn to_scene_space(point: Point, viewport: Size) -> Point {
    Point::new(
        point.x - viewport.width * 0.5,
        point.y - viewport.height * 0.5,
    )
}

#[async_trait(?Send)]
impl Game for PlayableShell {
    async fn initialize(&self, events: Rc<EventBus>, viewport: Size) -> Result<Box<dyn Game>> {
        match self {
            PlayableShell::Loading => {
                let config = Rc::new(Self::load_config().await);
                let sources = Self::load_manifest(&config.assets.manifest).await;

                // the dialogue payload does not depend on any asset, warm the
                // service cache while the manifest loads
                let service = Rc::new(MagicWordsService::new(&config.magic_words.endpoint));
                let (resources, _) = join!(Resources::load(sources), service.fetch());

                let registry = Rc::new(Registry::new());
                let audio = registry.instance::<AudioManager>();
                audio.set_audios(&resources);
                let loaded = resources.loaded();
                registry.insert(Rc::new(resources));
                registry.insert(service);

                let unlock = Rc::clone(&audio);
                let first_click = events.on(names::FIRST_CLICK, move |_| unlock.activate());

                let shared = Shared {
                    config: Rc::clone(&config),
                    registry,
                };
                let measure: Rc<dyn TextMeasure> = Rc::new(Renderer::new(browser::context()?));
                let scenes = build_scenes(&shared, measure)?;
                info!("PlayableShell: ready with {} assets", loaded);

                Ok(Box::new(PlayableShell::Loaded(Shell {
                    events,
                    viewport,
                    scenes,
                    config,
                    _first_click: first_click,
                })))
            }
            PlayableShell::Loaded(_) => Err(anyhow!("PlayableShell is already initialized")),
        }
    }

    fn time_config(&self) -> TimeConfig {
        match self {
            PlayableShell::Loaded(shell) => shell.config.time.clone(),
            PlayableShell::Loading => TimeConfig::default(),
        }
    }

    fn fixed_update(&mut self) {
        if let PlayableShell::Loaded(shell) = self {
            let step_ms = time::step_ms(&shell.config.time);
            let mut ctx = SceneContext::new(step_ms, &shell.events, shell.viewport);
            shell.scenes.fixed_update(&mut ctx);
        }
    }

    fn update(&mut self, delta_ms: f64) {
        if let PlayableShell::Loaded(shell) = self {
            let mut ctx = SceneContext::new(delta_ms, &shell.events, shell.viewport);
            shell.scenes.update(&mut ctx);
        }
    }

    fn resize(&mut self, viewport: Size) {
        if let PlayableShell::Loaded(shell) = self {
            shell.viewport = viewport;
        }
    }

    fn pointer_down(&mut self, point: Point) {
        if let PlayableShell::Loaded(shell) = self {
            let point = to_scene_space(point, shell.viewport);
            let mut ctx = SceneContext::new(0.0, &shell.events, shell.viewport);
            shell.scenes.pointer_down(point, &mut ctx);
        }
    }

    fn pointer_move(&mut self, point: Point) {
        if let PlayableShell::Loaded(shell) = self {
            shell
                .scenes
                .pointer_move(to_scene_space(point, shell.viewport));
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let PlayableShell::Loaded(shell) = self {
            shell.scenes.draw(renderer);
        }
    }
}
