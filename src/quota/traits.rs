use async_trait::async_trait;

use crate::error::Result;

/// Key-value persistence seam for the day counter. `date` is always a
/// `YYYY-MM-DD` calendar day.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Batches recorded on the given day; 0 for any other stored day.
    async fn get(&self, date: &str) -> Result<u32>;

    /// Records one more batch on the given day, rolling the stored record
    /// over first if it belongs to an earlier day. Returns the new count.
    async fn increment(&self, date: &str) -> Result<u32>;
}
