use crate::GameId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of analytics events retained.
pub const ANALYTICS_CAP: usize = 1000;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalyticsKind {
    GameStart,
    HintUsed,
    LevelComplete,
    Restart,
    Quit,
}

/// One coarse analytics record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub kind: AnalyticsKind,
    pub game_id: GameId,
    pub level: u32,
    /// Free-form detail, e.g. score or mastery outcome.
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A capped ring buffer of the most recent analytics events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsLog {
    events: VecDeque<AnalyticsEvent>,
}

impl AnalyticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, dropping the oldest past the cap.
    pub fn push(&mut self, event: AnalyticsEvent) {
        if self.events.len() == ANALYTICS_CAP {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &AnalyticsEvent> {
        self.events.iter()
    }
}
