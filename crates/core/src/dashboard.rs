//! Dashboard metrics over a user's full product set.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::product::{FIXED_LOW_STOCK_THRESHOLD, Product};

/// Number of trailing weeks in the creation histogram.
pub const HISTORY_WEEKS: u64 = 12;

/// Units added in one seven-day window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sum of `quantity` over products created inside the window.
    pub units: i64,
}

impl WeekBucket {
    /// `YYYY-MM-DD - YYYY-MM-DD`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Unit or product counts per stock band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockBands {
    /// Quantity above the fixed threshold.
    pub in_stock: i64,
    /// Quantity in `1..=threshold`.
    pub low_stock: i64,
    pub out_of_stock: i64,
}

/// Share of each stock band, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StockPercentages {
    pub in_stock: f64,
    pub low_stock: f64,
    pub out_of_stock: f64,
}

/// Everything the dashboard shows about a user's catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub total_products: usize,
    /// Sum of `price * quantity`.
    pub total_value: Decimal,
    pub total_units: i64,
    /// Units per band, using the fixed threshold.
    pub units: StockBands,
    pub percentages: StockPercentages,
    /// Products with a threshold set and quantity at or below the fixed
    /// threshold. Differs from the inventory page's per-product rule.
    pub low_stock_products: usize,
    /// Oldest week first.
    pub weekly_units: Vec<WeekBucket>,
}

impl DashboardMetrics {
    /// Compute metrics for `products` as of `today` (UTC calendar day).
    #[must_use]
    pub fn compute(products: &[Product], today: NaiveDate) -> Self {
        let total_products = products.len();
        let total_value = products.iter().map(Product::stock_value).sum();

        let units = products.iter().fold(StockBands::default(), |mut bands, p| {
            let quantity = i64::from(p.quantity);
            if p.quantity > FIXED_LOW_STOCK_THRESHOLD {
                bands.in_stock += quantity;
            } else if p.quantity > 0 {
                bands.low_stock += quantity;
            }
            bands
        });
        let total_units: i64 = products.iter().map(|p| i64::from(p.quantity)).sum();
        let units = StockBands {
            out_of_stock: (total_units - units.in_stock - units.low_stock).max(0),
            ..units
        };

        let percentages = if total_units > 0 {
            percentages_of(units, total_units)
        } else {
            let counts = products.iter().fold(StockBands::default(), |mut bands, p| {
                if p.quantity > FIXED_LOW_STOCK_THRESHOLD {
                    bands.in_stock += 1;
                } else if p.quantity > 0 {
                    bands.low_stock += 1;
                } else {
                    bands.out_of_stock += 1;
                }
                bands
            });
            percentages_of(counts, i64::try_from(total_products).unwrap_or(i64::MAX))
        };

        let low_stock_products = products
            .iter()
            .filter(|p| p.low_stock_at.is_some() && p.quantity <= FIXED_LOW_STOCK_THRESHOLD)
            .count();

        Self {
            total_products,
            total_value,
            total_units,
            units,
            percentages,
            low_stock_products,
            weekly_units: weekly_units(products, today),
        }
    }
}

fn percentages_of(bands: StockBands, total: i64) -> StockPercentages {
    if total <= 0 {
        return StockPercentages::default();
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = |part: i64| part as f64 / total as f64 * 100.0;
    StockPercentages {
        in_stock: pct(bands.in_stock),
        low_stock: pct(bands.low_stock),
        out_of_stock: pct(bands.out_of_stock),
    }
}

/// Twelve contiguous seven-day buckets; the last one starts on `today`.
fn weekly_units(products: &[Product], today: NaiveDate) -> Vec<WeekBucket> {
    let mut buckets: Vec<WeekBucket> = (0..HISTORY_WEEKS)
        .rev()
        .filter_map(|weeks_back| {
            let start = today.checked_sub_days(Days::new(weeks_back * 7))?;
            let end = start.checked_add_days(Days::new(6))?;
            Some(WeekBucket {
                start,
                end,
                units: 0,
            })
        })
        .collect();

    for product in products {
        let created = product.created_at.date_naive();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(created)) {
            bucket.units += i64::from(product.quantity);
        }
    }

    buckets
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{ProductId, UserId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    fn product(price: i64, quantity: i32, low: Option<i32>, days_ago: u64) -> Product {
        let date = today().checked_sub_days(Days::new(days_ago)).unwrap();
        Product {
            id: ProductId::generate(),
            user_id: UserId::generate(),
            name: "p".to_owned(),
            sku: None,
            price: Decimal::new(price, 2),
            quantity,
            low_stock_at: low,
            created_at: Utc
                .from_utc_datetime(&date.and_hms_opt(23, 59, 59).unwrap()),
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_empty_catalogue() {
        let metrics = DashboardMetrics::compute(&[], today());
        assert_eq!(metrics.total_products, 0);
        assert_eq!(metrics.total_value, Decimal::ZERO);
        assert_eq!(metrics.percentages, StockPercentages::default());
        assert_eq!(metrics.weekly_units.len(), 12);
        assert!(metrics.weekly_units.iter().all(|b| b.units == 0));
    }

    #[test]
    fn test_totals_and_unit_bands() {
        let products = [
            product(1000, 10, None, 0),
            product(250, 4, Some(5), 0),
            product(99, 0, Some(3), 0),
        ];
        let metrics = DashboardMetrics::compute(&products, today());

        assert_eq!(metrics.total_value, Decimal::new(11_000, 2));
        assert_eq!(metrics.total_units, 14);
        assert_eq!(
            metrics.units,
            StockBands {
                in_stock: 10,
                low_stock: 4,
                out_of_stock: 0,
            }
        );
        assert_close(metrics.percentages.in_stock, 10.0 / 14.0 * 100.0);
        assert_close(metrics.percentages.low_stock, 4.0 / 14.0 * 100.0);
        assert_close(metrics.percentages.out_of_stock, 0.0);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let products = [
            product(100, 7, None, 1),
            product(100, 3, None, 2),
            product(100, 1, None, 3),
            product(100, 40, None, 4),
        ];
        let p = DashboardMetrics::compute(&products, today()).percentages;
        assert_close(p.in_stock + p.low_stock + p.out_of_stock, 100.0);
    }

    #[test]
    fn test_zero_units_falls_back_to_product_counts() {
        let products = [product(100, 0, None, 0), product(100, 0, Some(2), 0)];
        let p = DashboardMetrics::compute(&products, today()).percentages;
        assert_close(p.in_stock, 0.0);
        assert_close(p.low_stock, 0.0);
        assert_close(p.out_of_stock, 100.0);
    }

    #[test]
    fn test_low_stock_products_use_fixed_threshold() {
        let products = [
            product(100, 4, Some(2), 0),
            product(100, 8, Some(10), 0),
            product(100, 1, None, 0),
        ];
        let metrics = DashboardMetrics::compute(&products, today());
        assert_eq!(metrics.low_stock_products, 1);
        assert_eq!(products.iter().filter(|p| p.is_low()).count(), 1);
        assert!(products[1].is_low());
    }

    #[test]
    fn test_weekly_buckets_are_contiguous() {
        let buckets = DashboardMetrics::compute(&[], today()).weekly_units;
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets.last().unwrap().start, today());
        assert_eq!(
            buckets.first().unwrap().start,
            today().checked_sub_days(Days::new(77)).unwrap()
        );
        for bucket in &buckets {
            assert_eq!((bucket.end - bucket.start).num_days(), 6);
        }
        for pair in buckets.windows(2) {
            assert_eq!((pair[1].start - pair[0].end).num_days(), 1);
        }
    }

    #[test]
    fn test_weekly_buckets_sum_created_quantity() {
        let products = [
            product(100, 5, None, 0),
            product(100, 2, None, 3),
            product(100, 7, None, 6),
            product(100, 9, None, 200),
        ];
        let buckets = DashboardMetrics::compute(&products, today()).weekly_units;
        assert_eq!(buckets[11].units, 5);
        assert_eq!(buckets[10].units, 2 + 7);
        assert_eq!(buckets.iter().map(|b| b.units).sum::<i64>(), 14);
    }

    #[test]
    fn test_week_label() {
        let bucket = WeekBucket {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            units: 3,
        };
        assert_eq!(bucket.label(), "2025-01-01 - 2025-01-07");
    }
}
