//! Hub component: deploy lifecycle, runner webhooks and git LFS over redis,
//! a cluster runner and an S3 bucket.
pub mod infrastructure;
pub mod server;
