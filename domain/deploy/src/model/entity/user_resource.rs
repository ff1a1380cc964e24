use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Resource reserved by a user through an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct UserResource {
    pub id: i64,
    pub user_uid: String,
    pub order_detail_id: i64,
    /// Deploy currently using the resource, `0` when free.
    pub deploy_id: i64,
    pub resource_id: i64,
}
