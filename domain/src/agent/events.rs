//! Agent lifecycle notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentEventType {
    Start,
    Analyzing,
    Generating,
    Building,
    Testing,
    Fixing,
    Success,
    Error,
    Complete,
}

impl AgentEventType {
    pub fn as_str(&self) -> &str {
        match self {
            AgentEventType::Start => "start",
            AgentEventType::Analyzing => "analyzing",
            AgentEventType::Generating => "generating",
            AgentEventType::Building => "building",
            AgentEventType::Testing => "testing",
            AgentEventType::Fixing => "fixing",
            AgentEventType::Success => "success",
            AgentEventType::Error => "error",
            AgentEventType::Complete => "complete",
        }
    }

    /// Whether no further events follow this one in a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentEventType::Complete)
    }
}

impl std::fmt::Display for AgentEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEvent {
    pub event_type: AgentEventType,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl AgentEvent {
    pub fn new(event_type: AgentEventType, message: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
