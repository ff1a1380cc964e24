mod namespace;
mod repository;
mod user;

#[rustfmt::skip]
pub use {
    namespace::{Namespace, NamespaceType},
    repository::Repository,
    user::User,
};
