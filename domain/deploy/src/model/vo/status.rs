use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Persisted lifecycle status of a deploy.
#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Default, Debug, Hash, PartialEq, Eq,
)]
#[serde(into = "i32", try_from = "i32")]
pub enum DeployStatus {
    #[default]
    Pending = 0,
    BuildPending = 10,
    BuildInProgress = 11,
    BuildFailed = 12,
    BuildSucceed = 13,
    BuildSkip = 14,
    PrepareToRun = 20,
    StartUp = 21,
    Running = 22,
    RunTimeError = 23,
    Sleeping = 25,
    Stopped = 26,
    Deleted = 27,
    ResourceUnhealthy = 28,
}

impl DeployStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_i32(code)
    }

    /// Display name shown to users.
    pub fn display_name(self) -> &'static str {
        use DeployStatus::*;
        match self {
            Pending => "Pending",
            BuildPending | BuildInProgress => "Building",
            BuildFailed => "BuildingFailed",
            BuildSucceed | BuildSkip | PrepareToRun | StartUp => "Deploying",
            Running => "Running",
            RunTimeError => "RuntimeError",
            Sleeping => "Sleeping",
            Stopped => "Stopped",
            Deleted => "Deleted",
            ResourceUnhealthy => "ResourceUnhealthy",
        }
    }

    /// Image build still going on, build results may be applied.
    pub fn is_building(self) -> bool {
        matches!(
            self,
            DeployStatus::Pending | DeployStatus::BuildPending | DeployStatus::BuildInProgress
        )
    }
}

impl From<DeployStatus> for i32 {
    fn from(value: DeployStatus) -> Self {
        value.code()
    }
}

impl TryFrom<i32> for DeployStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or_else(|| format!("unknown deploy status code: {value}"))
    }
}

/// Total mapping from a persisted status code to its display name.
pub fn deploy_status_code_to_string(code: i32) -> &'static str {
    DeployStatus::from_code(code).map_or(DeployStatus::Stopped.display_name(), |s| s.display_name())
}

/// Status a live code from the runner stands for.
pub fn live_status(code: i32) -> Option<DeployStatus> {
    if is_running_code(code) {
        Some(DeployStatus::Running)
    } else {
        DeployStatus::from_code(code)
    }
}

/// Status codes reported by a runner for a service.
#[derive(FromPrimitive, ToPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerStatus {
    Pending = 0,
    Deploying = 1,
    Failed = 2,
    StartUp = 3,
    Running = 4,
    RunTimeError = 5,
}

/// Whether a status code from the runner means the service is up.
///
/// Runners may answer either in their own code space or with deploy statuses,
/// the two spaces do not overlap on these values.
pub fn is_running_code(code: i32) -> bool {
    code == RunnerStatus::Running as i32 || code == DeployStatus::Running.code()
}
