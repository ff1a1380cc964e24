use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

use crate::model::vo::HardWare;

/// Purchasable hardware flavour on a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct SpaceResource {
    pub id: i64,
    pub name: String,
    pub cluster_id: String,
    /// JSON encoded `HardWare`.
    pub resources: String,
}

impl SpaceResource {
    pub fn hardware(&self) -> serde_json::Result<HardWare> {
        serde_json::from_str(&self.resources)
    }
}
