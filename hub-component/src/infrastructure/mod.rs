pub mod config;
pub mod database;
pub mod message_queue;
pub mod repository;
pub mod service;
pub mod service_provider;
pub mod telemetry;

pub use service_provider::ServiceProvider;
