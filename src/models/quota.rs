use serde::{Deserialize, Serialize};

/// Persisted day counter. One record per namespace; replaced wholesale when
/// the stored date differs from today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuota {
    pub date: String,
    pub count: u32,
}

impl DailyQuota {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            count: 0,
        }
    }

    /// Resets to a fresh record when `today` has rolled past the stored day.
    pub fn rolled_over(self, today: &str) -> Self {
        if self.date == today {
            self
        } else {
            DailyQuota::new(today)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollover_resets_count() {
        let quota = DailyQuota {
            date: "2025-12-24".into(),
            count: 4,
        };
        let rolled = quota.clone().rolled_over("2025-12-25");
        assert_eq!(rolled, DailyQuota::new("2025-12-25"));
        assert_eq!(quota.rolled_over("2025-12-24").count, 4);
    }
}
