mod permission;

#[rustfmt::skip]
pub use {
    permission::RepoPermissionServiceImpl,
};
