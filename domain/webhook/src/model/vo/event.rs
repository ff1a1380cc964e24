use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Kind of an event sent by a runner.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebHookEventType {
    RunnerHeartbeat,
    RunnerClusterCreate,
    RunnerServiceCreate,
    RunnerServiceChange,
    RunnerServiceStop,
    RunnerBuilderChange,
    RunnerWorkflowCreate,
    RunnerWorkflowChange,
}

impl WebHookEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebHookEventType::RunnerHeartbeat => "runner_heartbeat",
            WebHookEventType::RunnerClusterCreate => "runner_cluster_create",
            WebHookEventType::RunnerServiceCreate => "runner_service_create",
            WebHookEventType::RunnerServiceChange => "runner_service_change",
            WebHookEventType::RunnerServiceStop => "runner_service_stop",
            WebHookEventType::RunnerBuilderChange => "runner_builder_change",
            WebHookEventType::RunnerWorkflowCreate => "runner_workflow_create",
            WebHookEventType::RunnerWorkflowChange => "runner_workflow_change",
        }
    }
}

impl fmt::Display for WebHookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebHookDataType {
    #[default]
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHookHeader {
    pub event_type: WebHookEventType,
    /// Unix seconds.
    pub event_time: i64,
    #[serde(default)]
    pub cluster_id: String,
    #[serde(default)]
    pub data_type: WebHookDataType,
}

/// Event as received from a runner, header fields sit next to `data` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHookRecvEvent {
    #[serde(flatten)]
    pub header: WebHookHeader,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebHookRecvEvent {
    pub fn event_type(&self) -> WebHookEventType {
        self.header.event_type
    }

    /// Decode the payload into the type matching the event kind.
    pub fn parse_data<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.data)
    }
}
