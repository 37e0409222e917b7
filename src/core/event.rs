//! Events consumed and raised by the interpreter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A named event, optionally carrying a payload.
///
/// The interpreter matches events against transitions by name only; the
/// payload is opaque to the core and is handed through to guard and action
/// evaluation untouched.
///
/// # Example
///
/// ```rust
/// use strata::Event;
/// use serde_json::json;
///
/// let plain = Event::new("door_open");
/// let with_payload = Event::with_data("floor_request", json!({ "floor": 3 }));
///
/// assert_eq!(plain.name, "door_open");
/// assert!(with_payload.data.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Name matched against transition event names.
    pub name: String,
    /// Opaque payload, available to guards and actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Event {
    /// Create an event with no payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
        }
    }

    /// Create an event carrying a payload.
    pub fn with_data(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data: Some(data),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_match_by_name() {
        let a = Event::new("tick");
        let b = Event::with_data("tick", json!(1));
        assert_eq!(a.name, b.name);
        assert_ne!(a, b);
    }

    #[test]
    fn event_serializes_without_empty_payload() {
        let event = Event::new("tick");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"name":"tick"}"#);

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
