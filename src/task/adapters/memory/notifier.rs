//! In-memory notifier capturing events for test inspection.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::ports::{TaskEvent, TaskNotifier};

/// Notifier that records every published event.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<RwLock<Vec<TaskEvent>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskNotifier for RecordingNotifier {
    async fn publish(&self, event: &TaskEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
        }
    }
}
