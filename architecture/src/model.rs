/// Marker for entities that are stored through a repository.
pub trait AggregateRoot {}

pub mod derive {
    pub use hub_architecture_macro::AggregateRoot;
}
