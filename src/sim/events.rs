//! Run events
//!
//! Fired synchronously from inside the run controller. Presentation,
//! score submission and the like subscribe here rather than being
//! called directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{RunSummary, TerminationCause};

/// Outbound notification from the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// The agent turned; `heading` is the new unit forward vector
    TurnApplied { heading: Vec3 },
    /// Fired every live tick with the truncated score
    ScoreChanged { score: u32 },
    /// Fired exactly once per run
    GameOver {
        score: u32,
        cause: TerminationCause,
        summary: RunSummary,
    },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&RunEvent)>;

/// Listener registry, called in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RunEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &RunEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_order_and_unsubscribe() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let l1 = log.clone();
        let first = bus.subscribe(move |e| {
            if let RunEvent::ScoreChanged { score } = e {
                l1.borrow_mut().push(("first", *score));
            }
        });
        let l2 = log.clone();
        bus.subscribe(move |e| {
            if let RunEvent::ScoreChanged { score } = e {
                l2.borrow_mut().push(("second", *score));
            }
        });

        bus.emit(&RunEvent::ScoreChanged { score: 3 });
        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.emit(&RunEvent::ScoreChanged { score: 4 });

        assert_eq!(
            *log.borrow(),
            vec![("first", 3), ("second", 3), ("second", 4)]
        );
        assert_eq!(bus.len(), 1);
    }
}
