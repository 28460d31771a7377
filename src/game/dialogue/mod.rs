// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                 Magic Words: payload → bubbles on screen                 │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ service.rs        │ fetch the JSON payload (cached after the first hit)  │
// │ parser.rs         │ JSON → emojis, avatars, ordered lines                │
// │ rich_text.rs      │ "{emoji} *bold*" → tokens → wrapped, aligned lines   │
// │ bubble.rs         │ one line → avatar + text + name, pop-in, typewriter  │
// │ sequencer.rs      │ timed playback, one line per interval                │
// │ history.rs        │ stacking, fading and pruning of older bubbles        │
// │ container.rs      │ wires all of the above for one payload               │
// └───────────────────┴──────────────────────────────────────────────────────┘
use crate::browser;
use crate::engine::load_image;
use log::error;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::HtmlImageElement;

pub mod bubble;
pub mod container;
pub mod history;
pub mod parser;
pub mod rich_text;
pub mod sequencer;
pub mod service;

/// Avatars and emojis by url. Loads start on first request and show up once
/// they finish, a failed url stays empty.
#[derive(Default)]
pub struct ImageCache {
    images: RefCell<HashMap<String, Option<HtmlImageElement>>>,
}

impl ImageCache {
    pub fn request(self: &Rc<Self>, url: &str) {
        if self.images.borrow().contains_key(url) {
            return;
        }
        self.images.borrow_mut().insert(url.to_string(), None);

        let cache = Rc::clone(self);
        let url = url.to_string();
        browser::spawn_local(async move {
            match load_image(&url).await {
                Ok(image) => {
                    cache.images.borrow_mut().insert(url, Some(image));
                }
                Err(err) => error!("ImageCache: {:#}", err),
            }
        });
    }

    pub fn get(&self, url: &str) -> Option<HtmlImageElement> {
        self.images.borrow().get(url).cloned().flatten()
    }
}
