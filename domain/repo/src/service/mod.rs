mod permission;

pub use permission::RepoPermissionService;
