use std::sync::Arc;

use colored::Colorize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::infrastructure::{config::build_config, telemetry::initialize_telemetry, ServiceProvider};

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build runtime".red(), e);
        }
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };

    let service_provider = match ServiceProvider::build(config).await {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry(&service_provider.config.telemetry) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };

    let handles = service_provider
        .background_services
        .iter()
        .cloned()
        .map(|x| tokio::spawn(async move { x.run().await }))
        .collect::<Vec<JoinHandle<()>>>();
    info!(services = handles.len(), "Hub component started.");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Stoping Services (ctrl-c handling)."),
        Err(e) => error!("Unable to listen for shutdown signal: {e}"),
    }
    for handle in handles {
        handle.abort()
    }
}
