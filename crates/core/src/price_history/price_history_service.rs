use std::sync::Arc;

use chrono::{Duration, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::{PriceHistoryRecord, PriceHistoryRepositoryTrait, PriceStatistics, PriceTrend};
use crate::errors::Result;
use crate::materials::MaterialRepositoryTrait;

/// Relative deadband for trend detection: mean moves within ±2% count
/// as stable.
fn trend_deadband() -> Decimal {
    Decimal::new(2, 2)
}

/// Tracks material price movement over time.
pub struct PriceHistoryService {
    history: Arc<dyn PriceHistoryRepositoryTrait>,
    materials: Arc<dyn MaterialRepositoryTrait>,
}

impl PriceHistoryService {
    pub fn new(
        history: Arc<dyn PriceHistoryRepositoryTrait>,
        materials: Arc<dyn MaterialRepositoryTrait>,
    ) -> Self {
        Self { history, materials }
    }

    /// Unconditionally append an observation.
    pub async fn record(
        &self,
        material_id: &str,
        price: Decimal,
        source: &str,
    ) -> Result<PriceHistoryRecord> {
        let record = PriceHistoryRecord::new(material_id, price, source);
        self.history.append(&record).await?;
        Ok(record)
    }

    /// Append only when the price differs from the latest record (or
    /// none exists). Returns whether a row was written.
    pub async fn record_if_changed(
        &self,
        material_id: &str,
        price: Decimal,
        source: &str,
    ) -> Result<bool> {
        if let Some(latest) = self.history.latest(material_id).await? {
            if latest.price == price {
                return Ok(false);
            }
        }
        self.record(material_id, price, source).await?;
        Ok(true)
    }

    /// In-window records ascending. When the window holds more than
    /// `limit` records, the oldest are dropped first: callers charting
    /// recent movement want the tail of the series, not the head.
    pub async fn history(
        &self,
        material_id: &str,
        window_days: i64,
        limit: usize,
    ) -> Result<Vec<PriceHistoryRecord>> {
        let since = Utc::now() - Duration::days(window_days);
        let mut records = self.history.in_window(material_id, since).await?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }

    /// Windowed min/max/avg plus change from the oldest in-window
    /// record to the current price. Zero-shaped when the window is
    /// empty.
    pub async fn statistics(
        &self,
        material_id: &str,
        window_days: i64,
    ) -> Result<PriceStatistics> {
        let since = Utc::now() - Duration::days(window_days);
        let records = self.history.in_window(material_id, since).await?;
        let current = self
            .history
            .latest(material_id)
            .await?
            .map(|record| record.price);

        if records.is_empty() {
            return Ok(PriceStatistics {
                current,
                ..PriceStatistics::default()
            });
        }

        let prices: Vec<Decimal> = records.iter().map(|record| record.price).collect();
        let sum: Decimal = prices.iter().sum();
        let oldest = prices[0];
        let latest = current.unwrap_or(oldest);
        let change = latest - oldest;
        let percent_change = if oldest.is_zero() {
            Decimal::ZERO
        } else {
            (change / oldest * Decimal::from(100)).round_dp(2)
        };

        Ok(PriceStatistics {
            min: prices.iter().copied().min().unwrap_or_default(),
            max: prices.iter().copied().max().unwrap_or_default(),
            avg: (sum / Decimal::from(prices.len() as u64)).round_dp(2),
            count: prices.len(),
            current,
            change: change.round_dp(2),
            percent_change,
        })
    }

    /// Direction of movement inside the window: the in-window records
    /// are split in half by count and the half-means compared with an
    /// exclusive ±2% relative deadband.
    pub async fn trend(&self, material_id: &str, window_days: i64) -> Result<PriceTrend> {
        let since = Utc::now() - Duration::days(window_days);
        let records = self.history.in_window(material_id, since).await?;
        if records.len() < 2 {
            return Ok(PriceTrend::InsufficientData);
        }

        let mid = records.len() / 2;
        let first_avg = mean(&records[..mid]);
        let second_avg = mean(&records[mid..]);
        if first_avg.is_zero() {
            return Ok(PriceTrend::Stable);
        }

        let ratio = (second_avg - first_avg) / first_avg;
        Ok(if ratio > trend_deadband() {
            PriceTrend::Increasing
        } else if ratio < -trend_deadband() {
            PriceTrend::Decreasing
        } else {
            PriceTrend::Stable
        })
    }

    /// Snapshot every priced catalog material, deduplicating against
    /// the latest record. Returns how many rows were written.
    pub async fn bulk_snapshot(&self, source: &str) -> Result<usize> {
        let materials = self.materials.list_priced().await?;
        let mut written = 0usize;
        for material in materials {
            let Some(price) = material.price else {
                continue;
            };
            if self.record_if_changed(&material.id, price, source).await? {
                written += 1;
            }
        }
        debug!("bulk snapshot wrote {written} records");
        Ok(written)
    }
}

fn mean(records: &[PriceHistoryRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = records.iter().map(|record| record.price).sum();
    sum / Decimal::from(records.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{material_named, InMemoryMaterialRepository, InMemoryPriceHistory};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn service(
        history: Arc<InMemoryPriceHistory>,
        materials: Arc<InMemoryMaterialRepository>,
    ) -> PriceHistoryService {
        PriceHistoryService::new(history, materials)
    }

    fn backdated(material_id: &str, price: Decimal, days_ago: i64) -> PriceHistoryRecord {
        let mut record = PriceHistoryRecord::new(material_id, price, "test");
        record.recorded_at = Utc::now() - Duration::days(days_ago);
        record
    }

    #[tokio::test]
    async fn test_record_if_changed_dedupes() {
        let history = Arc::new(InMemoryPriceHistory::default());
        let service = service(history.clone(), Arc::new(InMemoryMaterialRepository::default()));

        assert!(service.record_if_changed("m-1", dec!(10), "sync").await.unwrap());
        assert!(!service.record_if_changed("m-1", dec!(10), "sync").await.unwrap());
        assert!(service.record_if_changed("m-1", dec!(11), "sync").await.unwrap());
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_statistics_over_window() {
        let history = Arc::new(InMemoryPriceHistory::default());
        history.seed(backdated("m-1", dec!(100), 40)); // outside a 30-day window
        history.seed(backdated("m-1", dec!(10), 20));
        history.seed(backdated("m-1", dec!(20), 10));
        history.seed(backdated("m-1", dec!(15), 1));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        let stats = service.statistics("m-1", 30).await.unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, dec!(10));
        assert_eq!(stats.max, dec!(20));
        assert_eq!(stats.avg, dec!(15));
        assert_eq!(stats.current, Some(dec!(15)));
        assert_eq!(stats.change, dec!(5));
        assert_eq!(stats.percent_change, dec!(50));
    }

    #[tokio::test]
    async fn test_statistics_empty_window_is_zero_shaped() {
        let history = Arc::new(InMemoryPriceHistory::default());
        history.seed(backdated("m-1", dec!(42), 90));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        let stats = service.statistics("m-1", 30).await.unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, Decimal::ZERO);
        // current still reflects the latest record overall
        assert_eq!(stats.current, Some(dec!(42)));
    }

    #[tokio::test]
    async fn test_history_caps_to_most_recent() {
        let history = Arc::new(InMemoryPriceHistory::default());
        for days_ago in (1..=5).rev() {
            history.seed(backdated("m-1", Decimal::from(days_ago), days_ago));
        }
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        let records = service.history("m-1", 30, 2).await.unwrap();
        assert_eq!(records.len(), 2);
        // ascending, most recent kept
        assert_eq!(records[0].price, dec!(2));
        assert_eq!(records[1].price, dec!(1));
    }

    #[tokio::test]
    async fn test_trend_increasing() {
        let history = Arc::new(InMemoryPriceHistory::default());
        history.seed(backdated("m-1", dec!(10), 20));
        history.seed(backdated("m-1", dec!(10), 15));
        history.seed(backdated("m-1", dec!(12), 10));
        history.seed(backdated("m-1", dec!(13), 5));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        assert_eq!(service.trend("m-1", 30).await.unwrap(), PriceTrend::Increasing);
    }

    #[tokio::test]
    async fn test_trend_decreasing() {
        let history = Arc::new(InMemoryPriceHistory::default());
        history.seed(backdated("m-1", dec!(20), 20));
        history.seed(backdated("m-1", dec!(20), 15));
        history.seed(backdated("m-1", dec!(15), 10));
        history.seed(backdated("m-1", dec!(14), 5));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        assert_eq!(service.trend("m-1", 30).await.unwrap(), PriceTrend::Decreasing);
    }

    #[tokio::test]
    async fn test_trend_exact_deadband_is_stable() {
        let history = Arc::new(InMemoryPriceHistory::default());
        // halves average 100 and 102: exactly +2%, inside the
        // exclusive deadband
        history.seed(backdated("m-1", dec!(100), 20));
        history.seed(backdated("m-1", dec!(102), 5));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        assert_eq!(service.trend("m-1", 30).await.unwrap(), PriceTrend::Stable);
    }

    #[tokio::test]
    async fn test_trend_needs_two_points() {
        let history = Arc::new(InMemoryPriceHistory::default());
        history.seed(backdated("m-1", dec!(10), 5));
        let service = service(history, Arc::new(InMemoryMaterialRepository::default()));

        assert_eq!(
            service.trend("m-1", 30).await.unwrap(),
            PriceTrend::InsufficientData
        );
    }

    #[tokio::test]
    async fn test_bulk_snapshot_dedupes() {
        let history = Arc::new(InMemoryPriceHistory::default());
        let materials = InMemoryMaterialRepository::default();
        let mut a = material_named("a");
        a.price = Some(dec!(10));
        materials.insert(a);
        let mut b = material_named("b");
        b.price = Some(dec!(20));
        materials.insert(b);
        materials.insert(material_named("unpriced"));
        let service = service(history.clone(), Arc::new(materials));

        assert_eq!(service.bulk_snapshot("nightly").await.unwrap(), 2);
        // unchanged prices write nothing on the second pass
        assert_eq!(service.bulk_snapshot("nightly").await.unwrap(), 0);
        assert_eq!(history.len(), 2);
    }
}
