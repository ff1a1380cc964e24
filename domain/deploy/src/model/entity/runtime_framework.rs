use hub_architecture::model::derive::AggregateRoot;
use serde::{Deserialize, Serialize};

/// Inference or training engine image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, AggregateRoot)]
pub struct RuntimeFramework {
    pub id: i64,
    pub frame_name: String,
    pub frame_version: String,
    pub frame_image: String,
    pub container_port: i32,
    pub enabled: bool,
    /// Default engine arguments, JSON map.
    #[serde(default)]
    pub engine_args: String,
}

impl RuntimeFramework {
    pub fn is_llama_cpp(&self) -> bool {
        self.frame_name.to_lowercase().contains("llama.cpp")
    }
}
