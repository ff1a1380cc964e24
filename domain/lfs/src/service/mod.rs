mod lfs;
mod object_storage;

#[rustfmt::skip]
pub use {
    lfs::LfsService,
    object_storage::{ObjectStat, ObjectStorageService},
};
