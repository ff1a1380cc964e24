use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hardware requested by a deploy, as stored in `SpaceResource::resources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardWare {
    #[serde(default)]
    pub gpu: Processor,
    #[serde(default)]
    pub npu: Processor,
    #[serde(default)]
    pub cpu: Cpu,
    /// e.g. `16Gi`.
    #[serde(default)]
    pub memory: String,
    #[serde(default)]
    pub replicas: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Processor {
    #[serde(default)]
    pub num: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cpu {
    #[serde(default)]
    pub num: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl HardWare {
    /// Requested memory in Gi, `0` when unset.
    pub fn memory_gi(&self) -> anyhow::Result<f32> {
        let memory = self.memory.trim().trim_end_matches("Gi");
        if memory.is_empty() {
            return Ok(0.0);
        }
        Ok(memory.parse()?)
    }

    pub fn cpu_num(&self) -> anyhow::Result<f64> {
        parse_num(&self.cpu.num).map(|n| n.unwrap_or_default())
    }

    /// Accelerator request, gpu taking precedence over npu.
    pub fn xpu(&self) -> anyhow::Result<Option<(i64, &str)>> {
        for processor in [&self.gpu, &self.npu] {
            if let Some(num) = parse_num::<i64>(&processor.num)? {
                if num > 0 {
                    return Ok(Some((num, processor.kind.as_str())));
                }
            }
        }
        Ok(None)
    }
}

fn parse_num<T: std::str::FromStr>(num: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let num = num.trim();
    if num.is_empty() {
        return Ok(None);
    }
    Ok(Some(num.parse()?))
}
