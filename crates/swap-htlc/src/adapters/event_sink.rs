//! Recording Event Sink
//!
//! Keeps every emitted event in memory so tests can assert on them.

use parking_lot::Mutex;
use swap_types::{EmittedEvent, EventSink, SwapEvent, SwapId};

/// Event sink that remembers what it saw.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<EmittedEvent>>,
}

impl RecordingEventSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().clone()
    }

    /// Events for one swap id, in emission order.
    pub fn events_for(&self, id: SwapId) -> Vec<SwapEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event.swap_id() == id)
            .map(|e| e.event.clone())
            .collect()
    }

    /// Names of all events, in emission order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.event.name()).collect()
    }

    /// Drop everything recorded.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: EmittedEvent) {
        self.events.lock().push(event);
    }
}
