mod namespace;
mod organization;
mod repository;
mod user;

#[rustfmt::skip]
pub use {
    namespace::NamespaceRepo,
    organization::OrganizationRepo,
    repository::RepositoryRepo,
    user::UserRepo,
};
