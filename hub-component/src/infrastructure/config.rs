use serde::Deserialize;

use super::telemetry::TelemetryConfig;

/// Settings of the whole component, one section per collaborator.
#[derive(Default, Deserialize, Clone, Debug)]
pub struct HubConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub message_queue: MessageQueueConfig,
    #[serde(default)]
    pub webhook: WebHookConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub lfs: LfsConfig,
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RedisConfig {
    /// One url connects a single node, more connect a cluster.
    #[serde(default = "RedisConfig::default_urls")]
    pub urls: Vec<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            urls: Self::default_urls(),
        }
    }
}

impl RedisConfig {
    fn default_urls() -> Vec<String> {
        vec!["redis://localhost:6379".to_string()]
    }
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageQueueKind {
    /// In-process queue, events are lost with the process.
    #[default]
    Internal,
    Redis,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MessageQueueConfig {
    #[serde(default)]
    pub kind: MessageQueueKind,
    #[serde(default = "MessageQueueConfig::default_webhook_topic")]
    pub webhook_topic: String,
    #[serde(default = "MessageQueueConfig::default_notification_topic")]
    pub notification_topic: String,
    #[serde(default = "MessageQueueConfig::default_group")]
    pub group: String,
}

impl Default for MessageQueueConfig {
    fn default() -> Self {
        Self {
            kind: Default::default(),
            webhook_topic: Self::default_webhook_topic(),
            notification_topic: Self::default_notification_topic(),
            group: Self::default_group(),
        }
    }
}

impl MessageQueueConfig {
    fn default_webhook_topic() -> String {
        "webhook_event".to_string()
    }
    fn default_notification_topic() -> String {
        "deploy_notification".to_string()
    }
    fn default_group() -> String {
        "hub-component".to_string()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebHookConfig {
    #[serde(default = "WebHookConfig::default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "WebHookConfig::default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "WebHookConfig::default_executor_timeout_secs")]
    pub executor_timeout_secs: u64,
}

impl Default for WebHookConfig {
    fn default() -> Self {
        Self {
            retry_count: Self::default_retry_count(),
            retry_delay_secs: Self::default_retry_delay_secs(),
            executor_timeout_secs: Self::default_executor_timeout_secs(),
        }
    }
}

impl WebHookConfig {
    fn default_retry_count() -> u32 {
        3
    }
    fn default_retry_delay_secs() -> u64 {
        1
    }
    fn default_executor_timeout_secs() -> u64 {
        30
    }
}

#[derive(Default, Deserialize, Clone, Debug)]
pub struct DeployConfig {
    /// Domain services are exposed under, e.g. `app.example.com`.
    #[serde(default)]
    pub public_root_domain: String,
    #[serde(default)]
    pub server_base_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RunnerConfig {
    /// Runner used for clusters that don't report an endpoint.
    #[serde(default = "RunnerConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "RunnerConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            api_key: Default::default(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl RunnerConfig {
    fn default_endpoint() -> String {
        "http://localhost:8082".to_string()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct LfsConfig {
    /// Base url git clients reach the hub on.
    #[serde(default = "LfsConfig::default_public_domain")]
    pub public_domain: String,
    #[serde(default = "LfsConfig::default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,
    /// Largest object accepted without the multipart transfer.
    #[serde(default = "LfsConfig::default_max_single_upload_size")]
    pub max_single_upload_size: i64,
    /// Upload actions point at presigned bucket urls instead of the hub.
    #[serde(default)]
    pub presign_upload: bool,
}

impl Default for LfsConfig {
    fn default() -> Self {
        Self {
            public_domain: Self::default_public_domain(),
            presign_expiry_secs: Self::default_presign_expiry_secs(),
            max_single_upload_size: Self::default_max_single_upload_size(),
            presign_upload: false,
        }
    }
}

impl LfsConfig {
    fn default_public_domain() -> String {
        "http://localhost:8080".to_string()
    }
    fn default_presign_expiry_secs() -> u64 {
        3600
    }
    fn default_max_single_upload_size() -> i64 {
        service_lfs::MAX_SINGLE_UPLOAD_SIZE
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct S3Config {
    #[serde(default = "S3Config::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "S3Config::default_region")]
    pub region: String,
    #[serde(default = "S3Config::default_bucket")]
    pub bucket: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            region: Self::default_region(),
            bucket: Self::default_bucket(),
            access_key_id: Default::default(),
            secret_access_key: Default::default(),
        }
    }
}

impl S3Config {
    fn default_endpoint() -> String {
        "http://localhost:9000".to_string()
    }
    fn default_region() -> String {
        "us-east-1".to_string()
    }
    fn default_bucket() -> String {
        "hub-lfs".to_string()
    }
}

/// Layered configuration: optional `config.yaml`, yaml files given as
/// arguments, then `HUB__SECTION__KEY` environment variables.
pub fn build_config() -> anyhow::Result<config::Config> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for arg in args {
        if arg.ends_with("yaml") || arg.ends_with("yml") {
            config = config.add_source(
                config::File::from(std::path::Path::new(arg.as_str()))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
    }
    config = config.add_source(
        config::Environment::with_prefix("HUB")
            .separator("__")
            .try_parsing(true)
            .list_separator(";")
            .with_list_parse_key("redis.urls"),
    );
    Ok(config.build()?)
}
