mod internal;
mod redis_pubsub;

#[rustfmt::skip]
pub use {
    internal::InternalMessageQueue,
    redis_pubsub::RedisMessageQueue,
};
