use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{OrnagenError, Result};
use crate::models::DailyQuota;
use crate::quota::traits::QuotaStore;

/// Fixed namespace key; also the default file stem of the JSON record.
pub const QUOTA_NAMESPACE: &str = "noel_atelier_daily";

/// Single-record JSON store. A corrupted or missing file resets to a fresh
/// day record.
pub struct FileQuotaStore {
    path: PathBuf,
}

impl FileQuotaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(format!("{}.json", QUOTA_NAMESPACE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, today: &str) -> DailyQuota {
        let stored = fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<DailyQuota>(&raw).ok());

        match stored {
            Some(quota) => quota.rolled_over(today),
            None => DailyQuota::new(today),
        }
    }

    fn save(&self, quota: &DailyQuota) -> Result<()> {
        let raw = serde_json::to_string(quota)
            .map_err(|e| OrnagenError::InternalError(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| {
            OrnagenError::InternalError(format!(
                "Failed to persist quota record {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl QuotaStore for FileQuotaStore {
    async fn get(&self, date: &str) -> Result<u32> {
        Ok(self.load(date).count)
    }

    async fn increment(&self, date: &str) -> Result<u32> {
        let mut quota = self.load(date);
        quota.count += 1;
        self.save(&quota)?;
        Ok(quota.count)
    }
}
