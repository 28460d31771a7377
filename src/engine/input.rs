use crate::browser;
use crate::engine::event::{names, EventBus, EventPayload};
use crate::engine::Point;
use anyhow::{anyhow, Result};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Point),
    Up(Point),
    Move(Point),
}

/// Pointer events captured by the DOM listeners, held until the next frame so
/// every bit of game logic still runs inside the render loop.
#[derive(Default)]
pub struct InputState {
    queue: RefCell<VecDeque<PointerInput>>,
    first_click_sent: Cell<bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, input: PointerInput) {
        self.queue.borrow_mut().push_back(input);
    }

    /// Forwards queued input onto the bus and hands it back for direct use.
    /// The very first pointer down also raises `firstClick`, once per run.
    pub fn drain(&self, events: &EventBus) -> Vec<PointerInput> {
        let drained: Vec<PointerInput> = self.queue.borrow_mut().drain(..).collect();
        for input in &drained {
            match *input {
                PointerInput::Down(point) => {
                    if !self.first_click_sent.replace(true) {
                        events.trigger(names::FIRST_CLICK, Some(&EventPayload::Pointer(point)));
                    }
                    events.trigger(names::POINTER_DOWN, Some(&EventPayload::Pointer(point)));
                }
                PointerInput::Up(point) => {
                    events.trigger(names::POINTER_UP, Some(&EventPayload::Pointer(point)));
                }
                PointerInput::Move(point) => {
                    events.trigger(names::POINTER_MOVE, Some(&EventPayload::Pointer(point)));
                }
            }
        }
        drained
    }
}

/// Hooks pointer listeners onto the canvas. Coordinates are converted to
/// canvas space so scenes can hit test against what they draw.
pub fn attach_pointer_listeners(canvas: &HtmlCanvasElement, input: Rc<InputState>) -> Result<()> {
    let listeners: [(&str, fn(Point) -> PointerInput); 3] = [
        ("pointerdown", PointerInput::Down),
        ("pointerup", PointerInput::Up),
        ("pointermove", PointerInput::Move),
    ];

    for (event_name, wrap) in listeners {
        let input = Rc::clone(&input);
        let target = canvas.clone();
        let on_event = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            input.push(wrap(browser::canvas_point(&target, event.client_x(), event.client_y())));
        });
        canvas
            .add_event_listener_with_callback(event_name, on_event.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not attach {} listener : {:#?}", event_name, err))?;
        // listeners live as long as the page
        on_event.forget();
    }
    Ok(())
}
