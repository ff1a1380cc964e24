use chrono::{DateTime, Utc};
use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

use crate::model::vo::WorkflowPhase;

/// Workflow run on a cluster, e.g. an evaluation.
///
/// Runner events carry the same shape without `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AggregateRoot)]
pub struct ArgoWorkflow {
    #[serde(default)]
    pub id: i64,
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub user_uuid: String,
    #[serde(default)]
    pub cluster_id: String,
    #[serde(default)]
    pub status: WorkflowPhase,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub results: Vec<String>,
    #[serde(default)]
    pub submit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl ArgoWorkflow {
    /// Take the progress reported by a runner, keeping identity and submission data.
    pub fn apply_progress(&mut self, event: &ArgoWorkflow) {
        self.status = event.status;
        self.reason = event.reason.clone();
        if !event.results.is_empty() {
            self.results = event.results.clone();
        }
        if event.start_time.is_some() {
            self.start_time = event.start_time;
        }
        if event.end_time.is_some() {
            self.end_time = event.end_time;
        }
        if self.cluster_id.is_empty() {
            self.cluster_id = event.cluster_id.clone();
        }
    }
}
