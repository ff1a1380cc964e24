use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Default, Debug, Hash, PartialEq, Eq,
)]
#[serde(into = "i32", try_from = "i32")]
pub enum DeployType {
    #[default]
    Space = 0,
    Inference = 1,
    Finetune = 2,
    Serverless = 3,
    Evaluation = 4,
    Notebook = 5,
}

impl From<DeployType> for i32 {
    fn from(value: DeployType) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for DeployType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value).ok_or_else(|| format!("unknown deploy type: {value}"))
    }
}

#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Default, Debug, PartialEq, Eq,
)]
#[serde(into = "i32", try_from = "i32")]
pub enum SecureLevel {
    #[default]
    Public = 1,
    Private = 2,
}

impl From<SecureLevel> for i32 {
    fn from(value: SecureLevel) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for SecureLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_i32(value).ok_or_else(|| format!("unknown secure level: {value}"))
    }
}
