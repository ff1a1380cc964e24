mod executor;
mod registry;
mod web_hook;

#[rustfmt::skip]
pub use {
    executor::WebHookExecutor,
    registry::ExecutorRegistry,
    web_hook::WebHookService,
};
