use hub_architecture::repository::ReadOnlyRepository;

use crate::model::entity::SpaceResource;

pub trait SpaceResourceRepo: ReadOnlyRepository<SpaceResource> + Send + Sync {}
