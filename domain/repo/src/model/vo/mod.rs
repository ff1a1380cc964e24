mod permission;
mod repo_type;

#[rustfmt::skip]
pub use {
    permission::{MemberRole, RepoPermission},
    repo_type::RepositoryType,
};
