pub mod file;
pub mod memory;
pub mod traits;

use std::sync::Arc;

use crate::config::QuotaConfig;
use crate::error::{OrnagenError, Result};

pub use file::{FileQuotaStore, QUOTA_NAMESPACE};
pub use memory::MemoryQuotaStore;
pub use traits::QuotaStore;

/// Policy layer over a [`QuotaStore`]: owns the per-day maximum and the
/// calendar-day key.
pub struct QuotaManager {
    store: Arc<dyn QuotaStore>,
    max_per_day: u32,
}

impl QuotaManager {
    pub fn new(store: Arc<dyn QuotaStore>, max_per_day: u32) -> Self {
        Self { store, max_per_day }
    }

    pub fn from_config(config: QuotaConfig) -> Self {
        let path = config
            .store_path
            .unwrap_or_else(FileQuotaStore::default_path);
        Self::new(Arc::new(FileQuotaStore::new(path)), config.max_per_day)
    }

    /// Local calendar day, matching what the user perceives as "today".
    pub fn today() -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }

    pub fn max_per_day(&self) -> u32 {
        self.max_per_day
    }

    pub async fn remaining(&self) -> Result<u32> {
        self.remaining_on(&Self::today()).await
    }

    /// Remaining batches on the given day, clamped at zero.
    pub async fn remaining_on(&self, date: &str) -> Result<u32> {
        let count = self.store.get(date).await?;
        Ok(self.max_per_day.saturating_sub(count))
    }

    pub async fn check(&self) -> Result<()> {
        if self.remaining().await? == 0 {
            return Err(OrnagenError::QuotaExceeded);
        }
        Ok(())
    }

    /// Records one successful batch and returns the remaining count.
    pub async fn record_batch(&self) -> Result<u32> {
        let count = self.store.increment(&Self::today()).await?;
        Ok(self.max_per_day.saturating_sub(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(max: u32) -> QuotaManager {
        QuotaManager::new(Arc::new(MemoryQuotaStore::new()), max)
    }

    #[tokio::test]
    async fn remaining_counts_down_and_clamps_at_zero() {
        let quota = manager(2);
        let today = QuotaManager::today();

        assert_eq!(quota.remaining_on(&today).await.unwrap(), 2);
        quota.record_batch().await.unwrap();
        assert_eq!(quota.remaining_on(&today).await.unwrap(), 1);
        quota.record_batch().await.unwrap();
        assert_eq!(quota.remaining_on(&today).await.unwrap(), 0);

        // Over-recording never drives the displayed count negative.
        quota.record_batch().await.unwrap();
        assert_eq!(quota.remaining_on(&today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn check_rejects_only_when_exhausted() {
        let quota = manager(1);
        assert!(quota.check().await.is_ok());
        quota.record_batch().await.unwrap();
        assert!(matches!(
            quota.check().await,
            Err(OrnagenError::QuotaExceeded)
        ));
    }

    #[tokio::test]
    async fn other_days_do_not_consume_today() {
        let quota = manager(5);
        // A record from another day reads as a full allowance.
        assert_eq!(quota.remaining_on("2020-01-01").await.unwrap(), 5);
    }
}
