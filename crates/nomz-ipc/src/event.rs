use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// What happened to the window in a `window` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChange {
    New,
    Close,
    Focus,
    Title,
    FullscreenMode,
    Move,
    Floating,
    Urgent,
    Mark,
    #[serde(other)]
    Unknown,
}

/// Payload of a `window` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEvent {
    pub change: WindowChange,
    pub container: Node,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_window_event() {
        let event: WindowEvent = serde_json::from_str(
            r#"{"change": "new", "container": {"id": 42, "pid": 1234, "app_id": "imv"}}"#,
        )
        .unwrap();

        assert_eq!(event.change, WindowChange::New);
        assert_eq!(event.container.id, 42);
        assert_eq!(event.container.pid, Some(1234));
        assert_eq!(event.container.app_id(), Some("imv"));
    }

    #[test]
    fn test_unknown_change_tolerated() {
        let event: WindowEvent = serde_json::from_str(
            r#"{"change": "something_new", "container": {"id": 1}}"#,
        )
        .unwrap();
        assert_eq!(event.change, WindowChange::Unknown);
    }
}
