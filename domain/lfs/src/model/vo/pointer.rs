use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static OID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-f\d]{64}$").unwrap());

/// Identifies an LFS object by its sha256 and size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    pub oid: String,
    pub size: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub download_url: String,
}

impl Pointer {
    pub fn new(oid: impl Into<String>, size: i64) -> Self {
        Self {
            oid: oid.into(),
            size,
            download_url: String::new(),
        }
    }

    pub fn valid(&self) -> bool {
        OID_PATTERN.is_match(&self.oid) && self.size >= 0
    }

    /// `aa/bb/rest` of the oid, or the oid itself when too short to split.
    pub fn relative_path(&self) -> String {
        if self.oid.len() < 5 || !self.oid.is_ascii() {
            return self.oid.clone();
        }
        format!("{}/{}/{}", &self.oid[0..2], &self.oid[2..4], &self.oid[4..])
    }

    /// Key of the object content in object storage.
    pub fn object_key(&self) -> String {
        format!("lfs/{}", self.relative_path())
    }
}
