mod lfs_lock;
mod lfs_meta_object;

#[rustfmt::skip]
pub use {
    lfs_lock::LfsLock,
    lfs_meta_object::LfsMetaObject,
};
