use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::DailyQuota;
use crate::quota::traits::QuotaStore;

/// Volatile store used by tests and one-shot runs.
pub struct MemoryQuotaStore {
    record: Mutex<Option<DailyQuota>>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(None),
        }
    }
}

impl Default for MemoryQuotaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn get(&self, date: &str) -> Result<u32> {
        let record = self.record.lock().await;
        Ok(record
            .as_ref()
            .filter(|quota| quota.date == date)
            .map(|quota| quota.count)
            .unwrap_or(0))
    }

    async fn increment(&self, date: &str) -> Result<u32> {
        let mut record = self.record.lock().await;
        let mut quota = record
            .take()
            .map(|quota| quota.rolled_over(date))
            .unwrap_or_else(|| DailyQuota::new(date));
        quota.count += 1;
        let count = quota.count;
        *record = Some(quota);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_per_day_and_rolls_over() {
        let store = MemoryQuotaStore::new();
        assert_eq!(store.get("2025-12-24").await.unwrap(), 0);
        assert_eq!(store.increment("2025-12-24").await.unwrap(), 1);
        assert_eq!(store.increment("2025-12-24").await.unwrap(), 2);
        assert_eq!(store.get("2025-12-25").await.unwrap(), 0);
        assert_eq!(store.increment("2025-12-25").await.unwrap(), 1);
    }
}
