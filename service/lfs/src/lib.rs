mod lfs;

#[rustfmt::skip]
pub use {
    lfs::{LfsServiceImpl, MAX_SINGLE_UPLOAD_SIZE},
};
