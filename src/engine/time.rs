use crate::config::TimeConfig;
use crate::engine::event::{names, EventBus, EventPayload};
use log::debug;

// first frame must not report a zero delta
const INITIAL_DELTA_MS: f64 = 16.0;

/// What one host frame produced: the raw delta and how many fixed steps were
/// drained from the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub delta_ms: f64,
    pub fixed_steps: u32,
}

/// Frame clock with a fixed-step accumulator.
///
/// ┌────────── one host frame ───────────┐
/// │ delta   = now - last                │
/// │ acc    += delta                     │
/// │ while acc >= step:                  │
/// │     fixedUpdateTick ; acc -= step   │
/// │ tick(delta)                         │
/// └─────────────────────────────────────┘
/// A slow frame drains several fixed steps, bounded by `max_catch_up_steps`.
/// Backlog above that bound is dropped, only the sub-step remainder is kept.
#[derive(Debug, Clone)]
pub struct Time {
    start_ms: f64,
    current_ms: f64,
    elapsed_ms: f64,
    delta_ms: f64,
    accumulator_ms: f64,
    fixed_step_ms: f64,
    max_catch_up_steps: u32,
}

/// Length of one fixed step. A rate below 1 Hz is treated as 1 Hz.
pub fn step_ms(config: &TimeConfig) -> f64 {
    1000.0 / config.fixed_rate_hz.max(1.0)
}

impl Time {
    pub fn new(start_ms: f64, config: &TimeConfig) -> Self {
        Time {
            start_ms,
            current_ms: start_ms,
            elapsed_ms: 0.0,
            delta_ms: INITIAL_DELTA_MS,
            accumulator_ms: 0.0,
            fixed_step_ms: step_ms(config),
            max_catch_up_steps: config.max_catch_up_steps,
        }
    }

    pub fn advance(&mut self, now_ms: f64) -> FrameStep {
        // clock skew must never drive the accumulator negative
        self.delta_ms = (now_ms - self.current_ms).max(0.0);
        self.current_ms = now_ms.max(self.current_ms);
        self.elapsed_ms = self.current_ms - self.start_ms;

        self.accumulator_ms += self.delta_ms;
        let mut fixed_steps = 0;
        while self.accumulator_ms >= self.fixed_step_ms {
            if fixed_steps == self.max_catch_up_steps {
                debug!(
                    "Time: dropping {:.1}ms of fixed-step backlog",
                    self.accumulator_ms - self.accumulator_ms % self.fixed_step_ms
                );
                self.accumulator_ms %= self.fixed_step_ms;
                break;
            }
            self.accumulator_ms -= self.fixed_step_ms;
            fixed_steps += 1;
        }

        FrameStep {
            delta_ms: self.delta_ms,
            fixed_steps,
        }
    }

    /// Advances the clock and publishes the frame: every fixed step first,
    /// then one variable `tick` carrying the raw delta.
    pub fn tick(&mut self, now_ms: f64, events: &EventBus) -> FrameStep {
        let step = self.advance(now_ms);
        for _ in 0..step.fixed_steps {
            events.trigger(names::FIXED_UPDATE_TICK, None);
        }
        events.trigger(
            names::TICK,
            Some(&EventPayload::Delta {
                delta_ms: step.delta_ms,
            }),
        );
        step
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn time_s(&self) -> f64 {
        self.elapsed_ms * 0.001
    }

    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    pub fn delta_s(&self) -> f64 {
        self.delta_ms * 0.001
    }

    pub fn fixed_delta_s(&self) -> f64 {
        self.fixed_step_ms * 0.001
    }

    pub fn fixed_step_ms(&self) -> f64 {
        self.fixed_step_ms
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn time() -> Time {
        Time::new(0.0, &TimeConfig::default())
    }

    #[test]
    fn fifty_hertz_step_is_twenty_ms() {
        let time = time();
        assert_relative_eq!(time.fixed_step_ms(), 20.0);
        assert_relative_eq!(time.fixed_delta_s(), 0.02);
        assert_relative_eq!(time.delta_ms(), INITIAL_DELTA_MS);
    }

    #[test]
    fn zero_rate_falls_back_to_one_step_per_second() {
        let config = TimeConfig {
            fixed_rate_hz: 0.0,
            ..TimeConfig::default()
        };
        assert_relative_eq!(step_ms(&config), 1000.0);
        assert_relative_eq!(Time::new(0.0, &config).fixed_step_ms(), step_ms(&config));
    }

    #[test]
    fn slow_frame_drains_several_fixed_steps() {
        let mut time = time();
        let step = time.advance(65.0);
        assert_eq!(step.fixed_steps, 3);
        assert_relative_eq!(time.accumulator_ms(), 5.0);
        assert_relative_eq!(time.time_s(), 0.065);

        // remainder carries into the next frame
        let step = time.advance(80.0);
        assert_eq!(step.fixed_steps, 1);
        assert_relative_eq!(time.accumulator_ms(), 0.0);
    }

    #[test]
    fn clock_going_backwards_counts_as_zero_delta() {
        let mut time = time();
        time.advance(100.0);
        let step = time.advance(50.0);
        assert_relative_eq!(step.delta_ms, 0.0);
        assert!(time.accumulator_ms() >= 0.0);
    }

    #[test]
    fn stall_is_bounded_by_catch_up_limit() {
        let mut time = time();
        let step = time.advance(10_007.0);
        assert_eq!(step.fixed_steps, TimeConfig::default().max_catch_up_steps);
        assert_relative_eq!(time.accumulator_ms(), 7.0);
    }

    #[test]
    fn tick_emits_fixed_steps_before_the_variable_tick() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let fixed = Rc::clone(&order);
        bus.on(names::FIXED_UPDATE_TICK, move |_| fixed.borrow_mut().push("fixed".to_string()));
        let variable = Rc::clone(&order);
        bus.on(names::TICK, move |payload| {
            if let Some(EventPayload::Delta { delta_ms }) = payload {
                variable.borrow_mut().push(format!("tick {}", delta_ms));
            }
        });

        let mut time = time();
        time.tick(45.0, &bus);

        assert_eq!(*order.borrow(), vec!["fixed", "fixed", "tick 45"]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // integer millisecond deltas keep the arithmetic exact
            #[test]
            fn fixed_steps_match_floor_of_accumulated_delta(deltas in prop::collection::vec(0u32..400, 1..40)) {
                let mut time = time();
                let mut now = 0.0;
                let mut carried = 0.0;
                for delta in deltas {
                    now += f64::from(delta);
                    let total = carried + f64::from(delta);
                    let step = time.advance(now);
                    prop_assert_eq!(step.fixed_steps, (total / 20.0).floor() as u32);
                    prop_assert_eq!(time.accumulator_ms(), total % 20.0);
                    prop_assert!(time.accumulator_ms() >= 0.0);
                    carried = time.accumulator_ms();
                }
            }
        }
    }
}
