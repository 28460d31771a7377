use super::parser::DialogueItem;
use log::debug;
use std::collections::VecDeque;

pub const START_MESSAGE: &str = "... Conversation starting ...";
pub const END_MESSAGE: &str = "... Conversation ended ...";

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent {
    SystemMessage(String),
    RemoveStartMessage,
    Bubble(DialogueItem),
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceState {
    Idle,
    Starting { remaining_ms: f64 },
    Playing { remaining_ms: f64 },
    Finished,
}

/// Plays a script one line per interval.
///
/// ELI5:
/// start  : "starting" message ── interval/2 ──▶ remove it, line 1
///          ── interval ──▶ line 2 ── ... ──▶ line N ── interval ──▶ "ended", Ended
/// stop   : back to Idle right away, nothing else is emitted
pub struct DialogueSequencer {
    queue: VecDeque<DialogueItem>,
    state: SequenceState,
    interval_ms: f64,
}

impl DialogueSequencer {
    pub fn new(interval_ms: f64) -> Self {
        DialogueSequencer {
            queue: VecDeque::new(),
            state: SequenceState::Idle,
            interval_ms: interval_ms.max(0.0),
        }
    }

    /// An empty script leaves the sequencer idle and emits nothing.
    pub fn start(&mut self, items: &[DialogueItem]) -> Vec<SequenceEvent> {
        self.queue = items.iter().cloned().collect();
        if self.queue.is_empty() {
            self.state = SequenceState::Idle;
            return Vec::new();
        }
        debug!("DialogueSequencer: starting {} lines", self.queue.len());
        self.state = SequenceState::Starting {
            remaining_ms: self.interval_ms / 2.0,
        };
        vec![SequenceEvent::SystemMessage(START_MESSAGE.to_string())]
    }

    pub fn stop(&mut self) {
        self.queue.clear();
        self.state = SequenceState::Idle;
    }

    /// Every step that falls due within `dt_ms`, in order.
    pub fn update(&mut self, dt_ms: f64) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        let mut budget = dt_ms.max(0.0);
        loop {
            let (starting, remaining_ms) = match self.state {
                SequenceState::Starting { remaining_ms } => (true, remaining_ms),
                SequenceState::Playing { remaining_ms } => (false, remaining_ms),
                SequenceState::Idle | SequenceState::Finished => break,
            };
            if budget < remaining_ms {
                let remaining_ms = remaining_ms - budget;
                self.state = if starting {
                    SequenceState::Starting { remaining_ms }
                } else {
                    SequenceState::Playing { remaining_ms }
                };
                break;
            }
            budget -= remaining_ms;
            if starting {
                events.push(SequenceEvent::RemoveStartMessage);
            }
            self.show_next(&mut events);
        }
        events
    }

    fn show_next(&mut self, events: &mut Vec<SequenceEvent>) {
        match self.queue.pop_front() {
            Some(item) => {
                events.push(SequenceEvent::Bubble(item));
                self.state = SequenceState::Playing {
                    remaining_ms: self.interval_ms,
                };
            }
            None => {
                debug!("DialogueSequencer: finished");
                events.push(SequenceEvent::SystemMessage(END_MESSAGE.to_string()));
                events.push(SequenceEvent::Ended);
                self.state = SequenceState::Finished;
            }
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            SequenceState::Starting { .. } | SequenceState::Playing { .. }
        )
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: &[&str]) -> Vec<DialogueItem> {
        lines
            .iter()
            .map(|text| DialogueItem {
                name: "Unknown".into(),
                text: text.to_string(),
            })
            .collect()
    }

    fn bubble(text: &str) -> SequenceEvent {
        SequenceEvent::Bubble(DialogueItem {
            name: "Unknown".into(),
            text: text.into(),
        })
    }

    #[test]
    fn plays_lines_on_schedule() {
        let mut sequencer = DialogueSequencer::new(3000.0);
        assert_eq!(
            sequencer.start(&script(&["a", "b"])),
            vec![SequenceEvent::SystemMessage(START_MESSAGE.into())]
        );

        assert!(sequencer.update(1499.0).is_empty());
        assert_eq!(
            sequencer.update(1.0),
            vec![SequenceEvent::RemoveStartMessage, bubble("a")]
        );
        assert!(sequencer.update(2999.0).is_empty());
        assert_eq!(sequencer.update(1.0), vec![bubble("b")]);
        assert_eq!(
            sequencer.update(3000.0),
            vec![
                SequenceEvent::SystemMessage(END_MESSAGE.into()),
                SequenceEvent::Ended
            ]
        );
        assert_eq!(sequencer.state(), SequenceState::Finished);
        assert!(sequencer.update(10_000.0).is_empty());
    }

    #[test]
    fn a_long_frame_catches_up_in_order() {
        let mut sequencer = DialogueSequencer::new(1000.0);
        sequencer.start(&script(&["a", "b"]));
        assert_eq!(
            sequencer.update(1600.0),
            vec![SequenceEvent::RemoveStartMessage, bubble("a"), bubble("b")]
        );
        assert_eq!(sequencer.state(), SequenceState::Playing { remaining_ms: 900.0 });
    }

    #[test]
    fn empty_script_stays_idle() {
        let mut sequencer = DialogueSequencer::new(3000.0);
        assert!(sequencer.start(&[]).is_empty());
        assert_eq!(sequencer.state(), SequenceState::Idle);
        assert!(sequencer.update(5000.0).is_empty());
    }

    #[test]
    fn stop_is_immediate_and_idempotent() {
        let mut sequencer = DialogueSequencer::new(3000.0);
        sequencer.start(&script(&["a", "b", "c"]));
        sequencer.update(1500.0);
        sequencer.stop();
        sequencer.stop();
        assert!(!sequencer.is_running());
        assert_eq!(sequencer.remaining(), 0);
        assert!(sequencer.update(100_000.0).is_empty());
    }

    #[test]
    fn restart_replaces_the_queue() {
        let mut sequencer = DialogueSequencer::new(1000.0);
        sequencer.start(&script(&["a", "b", "c"]));
        sequencer.update(500.0);
        sequencer.start(&script(&["z"]));
        assert_eq!(sequencer.remaining(), 1);
        assert_eq!(
            sequencer.update(500.0),
            vec![SequenceEvent::RemoveStartMessage, bubble("z")]
        );
    }
}
