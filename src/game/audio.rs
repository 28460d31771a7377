use crate::engine::resources::Resources;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use web_sys::HtmlAudioElement;

pub const BACKGROUND: &str = "backgroundAudio";
pub const MESSAGE: &str = "message";

/// Every loaded audio asset by name. Browsers refuse playback before a user
/// gesture, so nothing plays until `activate` runs on the first click.
#[derive(Default)]
pub struct AudioManager {
    sounds: RefCell<HashMap<String, HtmlAudioElement>>,
    muted: Cell<bool>,
    active: Cell<bool>,
}

impl AudioManager {
    pub fn set_audios(&self, resources: &Resources) {
        let mut sounds = self.sounds.borrow_mut();
        sounds.clear();
        for (name, audio) in resources.audios() {
            sounds.insert(name.to_string(), audio.clone());
        }
        debug!("AudioManager: {} sounds", sounds.len());
    }

    /// First user gesture: unmute and start the background loop.
    pub fn activate(&self) {
        if self.active.replace(true) {
            return;
        }
        info!("AudioManager: audio unlocked");
        self.unmute();
        self.play_loop(BACKGROUND, 0.5);
    }

    pub fn play(&self, name: &str, volume: f64) {
        self.start(name, volume, false);
    }

    pub fn play_loop(&self, name: &str, volume: f64) {
        self.start(name, volume, true);
    }

    fn start(&self, name: &str, volume: f64, looping: bool) {
        if !self.active.get() {
            return;
        }
        let sounds = self.sounds.borrow();
        let Some(audio) = sounds.get(name) else {
            debug!("AudioManager: no sound '{}'", name);
            return;
        };
        audio.set_volume(volume.clamp(0.0, 1.0));
        audio.set_current_time(0.0);
        audio.set_loop(looping);
        if let Err(err) = audio.play() {
            warn!("AudioManager: could not play '{}' : {:#?}", name, err);
        }
    }

    pub fn stop(&self, name: &str) {
        if let Some(audio) = self.sounds.borrow().get(name) {
            if let Err(err) = audio.pause() {
                warn!("AudioManager: could not pause '{}' : {:#?}", name, err);
            }
            audio.set_current_time(0.0);
        }
    }

    pub fn mute(&self) {
        self.set_muted(true);
    }

    pub fn unmute(&self) {
        self.set_muted(false);
    }

    pub fn toggle_mute(&self) {
        self.set_muted(!self.muted.get());
    }

    fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
        for audio in self.sounds.borrow().values() {
            audio.set_muted(muted);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}
