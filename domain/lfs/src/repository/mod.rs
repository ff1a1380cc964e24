mod lfs_lock;
mod lfs_meta_object;

#[rustfmt::skip]
pub use {
    lfs_lock::LfsLockRepo,
    lfs_meta_object::LfsMetaObjectRepo,
};
