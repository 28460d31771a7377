// ==================== Imports ====================
use log::{error, LevelFilter};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

mod browser;
mod config;
mod engine;
mod game;
mod sprite;

use engine::GameLoop;
use game::PlayableShell;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs panic hook and console logger
/// - boots the shell : config → assets → scenes
/// - hands it to the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    browser::init_logging(if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(PlayableShell::new()).await {
            error!("main_js: could not start : {:#}", err);
        }
    });

    Ok(())
}
