//! State types for tracking poll progress
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for all trigger instances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-trigger state, keyed by trigger ID
    #[serde(default)]
    pub triggers: HashMap<String, TriggerState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a trigger
    pub fn get_trigger(&self, trigger_id: &str) -> Option<&TriggerState> {
        self.triggers.get(trigger_id)
    }

    /// Get the watermark for a trigger
    pub fn get_watermark(&self, trigger_id: &str) -> Option<&str> {
        self.triggers.get(trigger_id)?.watermark.as_deref()
    }

    /// Overwrite the watermark for a trigger
    pub fn set_watermark(&mut self, trigger_id: &str, watermark: String) {
        let entry = self.triggers.entry(trigger_id.to_string()).or_default();
        entry.watermark = Some(watermark);
        entry.updated_at = Some(Utc::now());
    }

    /// Forget a trigger, returning it to the uninitialized state
    pub fn remove_trigger(&mut self, trigger_id: &str) -> Option<TriggerState> {
        self.triggers.remove(trigger_id)
    }
}

/// State for a single trigger instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerState {
    /// Newest time-field value seen, in Zoho's native format
    #[serde(default)]
    pub watermark: Option<String>,

    /// When the watermark was last written
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TriggerState {
    /// Whether a baseline has been recorded
    pub fn is_armed(&self) -> bool {
        self.watermark.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.triggers.is_empty());
    }

    #[test]
    fn test_state_watermark() {
        let mut state = State::new();
        assert!(state.get_watermark("itemCreated").is_none());

        state.set_watermark("itemCreated", "2024-01-15T10:30:00+0000".to_string());
        assert_eq!(
            state.get_watermark("itemCreated"),
            Some("2024-01-15T10:30:00+0000")
        );

        let trigger = state.get_trigger("itemCreated").unwrap();
        assert!(trigger.is_armed());
        assert!(trigger.updated_at.is_some());
    }

    #[test]
    fn test_state_remove_trigger() {
        let mut state = State::new();
        state.set_watermark("invoiceUpdated", "2024-02-01T00:00:00+0000".to_string());
        assert!(state.remove_trigger("invoiceUpdated").is_some());
        assert!(state.get_watermark("invoiceUpdated").is_none());
    }

    #[test]
    fn test_state_deserializes_without_timestamps() {
        let state: State =
            serde_json::from_str(r#"{"triggers":{"itemCreated":{"watermark":"2024-01-01T00:00:00+0000"}}}"#)
                .unwrap();
        let trigger = state.get_trigger("itemCreated").unwrap();
        assert!(trigger.is_armed());
        assert!(trigger.updated_at.is_none());
    }

    #[test]
    fn test_state_serialization_roundtrip() {
        let mut state = State::new();
        state.set_watermark("contactCreated", "2024-03-01T08:00:00+0530".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: State = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
