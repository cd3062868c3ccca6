//! Assessment event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::AssessmentEvent;

/// Receiver of assessment notices.
///
/// `emit()` must be fast and non-blocking. Failure to deliver an event never
/// affects the assessment itself.
pub trait AssessmentEventSink: Send + Sync {
    fn emit(&self, event: AssessmentEvent);

    /// Default implementation calls `emit()` for each event.
    fn emit_batch(&self, events: Vec<AssessmentEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpAssessmentEventSink;

impl AssessmentEventSink for NoOpAssessmentEventSink {
    fn emit(&self, _event: AssessmentEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockAssessmentEventSink {
    events: Arc<Mutex<Vec<AssessmentEvent>>>,
}

impl MockAssessmentEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<AssessmentEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of collected events matching `predicate`.
    pub fn count_matching(&self, predicate: impl Fn(&AssessmentEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssessmentEventSink for MockAssessmentEventSink {
    fn emit(&self, event: AssessmentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
