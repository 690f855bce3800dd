//! Observer that captures every emitted event for later assertions.

use habitsim_core::observer::{Attempt, AttemptObserver, AttemptOutcome, FinalOutcome};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum ObservedEvent {
    Start { key_rank: usize, model: String },
    Result { accepted: bool },
    Final(FinalOutcome),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn final_outcome(&self) -> Option<FinalOutcome> {
        self.events().into_iter().rev().find_map(|e| match e {
            ObservedEvent::Final(outcome) => Some(outcome),
            _ => None,
        })
    }
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt_start(&self, attempt: &Attempt) {
        self.events.lock().unwrap().push(ObservedEvent::Start {
            key_rank: attempt.key_rank,
            model: attempt.model.clone(),
        });
    }

    fn on_attempt_result(&self, _attempt: &Attempt, outcome: &AttemptOutcome) {
        self.events.lock().unwrap().push(ObservedEvent::Result {
            accepted: matches!(outcome, AttemptOutcome::Accepted),
        });
    }

    fn on_final_outcome(&self, outcome: &FinalOutcome) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Final(outcome.clone()));
    }
}
