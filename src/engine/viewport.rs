use crate::engine::event::{names, EventBus, EventPayload, Orientation};
use crate::engine::Size;

/// Tracks the host window size and announces changes on the bus.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    orientation: Orientation,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Viewport {
            width,
            height,
            pixel_ratio,
            orientation: orientation_of(width, height),
        }
    }

    /// Returns true when anything changed. `resize` fires on every change,
    /// `orientationChange` only when portrait/landscape flips.
    pub fn update(&mut self, width: f64, height: f64, pixel_ratio: f64, events: &EventBus) -> bool {
        if width == self.width && height == self.height && pixel_ratio == self.pixel_ratio {
            return false;
        }
        let previous = self.orientation;
        self.width = width;
        self.height = height;
        self.pixel_ratio = pixel_ratio;
        self.orientation = orientation_of(width, height);

        events.trigger(
            names::RESIZE,
            Some(&EventPayload::Resize {
                width,
                height,
                pixel_ratio,
            }),
        );
        if previous != self.orientation {
            events.trigger(
                names::ORIENTATION_CHANGE,
                Some(&EventPayload::Orientation(self.orientation)),
            );
        }
        true
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_portrait(&self) -> bool {
        self.orientation == Orientation::Portrait
    }
}

fn orientation_of(width: f64, height: f64) -> Orientation {
    if width > height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}
