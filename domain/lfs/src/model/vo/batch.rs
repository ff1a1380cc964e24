use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use domain_repo::model::vo::RepositoryType;
use serde::{Deserialize, Serialize};

use super::{LfsRepoReq, Pointer};

pub const LFS_MEDIA_TYPE: &str = "application/vnd.git-lfs+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    Upload,
    Download,
}

impl BatchOperation {
    pub fn parse(operation: &str) -> Option<Self> {
        match operation {
            "upload" => Some(BatchOperation::Upload),
            "download" => Some(BatchOperation::Download),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
}

/// Body of a batch API call plus the repository and caller it targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub operation: String,
    #[serde(default)]
    pub transfers: Vec<String>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<Reference>,
    pub objects: Vec<Pointer>,
    /// Forwarded to upload and verify actions.
    #[serde(default)]
    pub authorization: String,
    pub namespace: String,
    pub name: String,
    pub repo_type: RepositoryType,
    #[serde(default)]
    pub current_user: String,
}

impl BatchRequest {
    pub fn wants_multipart(&self) -> bool {
        self.transfers.iter().any(|t| t == "multipart")
    }

    pub fn repo(&self) -> LfsRepoReq {
        LfsRepoReq {
            repo_type: self.repo_type,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            current_user: self.current_user.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectError {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectResponse {
    #[serde(flatten)]
    pub pointer: Pointer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ObjectError>,
}

impl ObjectResponse {
    /// Object the server already has, no action needed.
    pub fn present(pointer: Pointer) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    pub fn failed(pointer: Pointer, code: u16, message: impl Into<String>) -> Self {
        Self {
            pointer,
            actions: None,
            error: Some(ObjectError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn with_actions(pointer: Pointer, actions: BTreeMap<String, Link>) -> Self {
        Self {
            pointer,
            actions: Some(actions),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer: Option<String>,
    pub objects: Vec<ObjectResponse>,
}
