//! Report Repository
//!
//! Dashboard and chart queries. Bucketed metrics issue one aggregate query
//! per bucket; business-day boundaries follow the configured report
//! timezone.

use super::{RepoError, RepoResult};
use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use shared::models::{
    DashboardSummary, ExpenseByCategory, PaymentMethodBreakdown, RevenuePoint, TopService,
};
use sqlx::SqlitePool;

/// Revenue bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl std::str::FromStr for Granularity {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            other => Err(RepoError::Validation(format!(
                "Unknown granularity: {other} (expected day or month)"
            ))),
        }
    }
}

/// Largest allowed day-bucket range (inclusive)
const MAX_DAY_BUCKETS: i64 = 370;
/// Largest allowed month-bucket range
const MAX_MONTH_BUCKETS: usize = 36;

/// Start of a business day in the report timezone, as UTC millis.
fn day_start_millis(tz: Tz, date: NaiveDate) -> i64 {
    let local = date.and_hms_opt(0, 0, 0).expect("midnight always exists");
    // earliest() resolves DST gaps to the first valid instant
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| local.and_utc().timestamp_millis())
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month always exists")
}

fn validate_range(from: NaiveDate, to: NaiveDate) -> RepoResult<()> {
    if from > to {
        return Err(RepoError::Validation(format!(
            "from ({from}) must not be after to ({to})"
        )));
    }
    Ok(())
}

/// Revenue, collected and order count for one [start, end) millis window
async fn order_aggregates(
    pool: &SqlitePool,
    start: i64,
    end: i64,
    branch_id: Option<i64>,
) -> RepoResult<(f64, f64, i64)> {
    let (revenue, order_count): (f64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_amount), 0.0), COUNT(*) FROM orders \
         WHERE created_at >= ?1 AND created_at < ?2 AND status != 'CANCELLED' \
         AND (?3 IS NULL OR branch_id = ?3)",
    )
    .bind(start)
    .bind(end)
    .bind(branch_id)
    .fetch_one(pool)
    .await?;

    let collected: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(p.amount), 0.0) FROM payment p \
         JOIN orders o ON p.order_id = o.id \
         WHERE p.created_at >= ?1 AND p.created_at < ?2 AND o.status != 'CANCELLED' \
         AND (?3 IS NULL OR o.branch_id = ?3)",
    )
    .bind(start)
    .bind(end)
    .bind(branch_id)
    .fetch_one(pool)
    .await?;

    Ok((revenue, collected, order_count))
}

/// Dashboard summary for an inclusive date range
pub async fn dashboard(
    pool: &SqlitePool,
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
    branch_id: Option<i64>,
) -> RepoResult<DashboardSummary> {
    validate_range(from, to)?;
    let start = day_start_millis(tz, from);
    let end = day_start_millis(tz, to + Duration::days(1));

    let (revenue, collected, order_count) = order_aggregates(pool, start, end, branch_id).await?;

    let outstanding: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_due), 0.0) FROM orders \
         WHERE created_at >= ?1 AND created_at < ?2 AND status != 'CANCELLED' \
         AND (?3 IS NULL OR branch_id = ?3)",
    )
    .bind(start)
    .bind(end)
    .bind(branch_id)
    .fetch_one(pool)
    .await?;

    let expense_total: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0.0) FROM expense \
         WHERE incurred_on >= ?1 AND incurred_on <= ?2 AND (?3 IS NULL OR branch_id = ?3)",
    )
    .bind(from.format("%Y-%m-%d").to_string())
    .bind(to.format("%Y-%m-%d").to_string())
    .bind(branch_id)
    .fetch_one(pool)
    .await?;

    Ok(DashboardSummary {
        revenue,
        collected,
        outstanding,
        order_count,
        expense_total,
        net: crate::orders::money::round2(collected - expense_total),
    })
}

/// Revenue series, one aggregate query per bucket
pub async fn revenue_buckets(
    pool: &SqlitePool,
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
    branch_id: Option<i64>,
) -> RepoResult<Vec<RevenuePoint>> {
    validate_range(from, to)?;

    let mut points = Vec::new();
    match granularity {
        Granularity::Day => {
            let days = (to - from).num_days() + 1;
            if days > MAX_DAY_BUCKETS {
                return Err(RepoError::Validation(format!(
                    "Date range too wide: {days} days (max {MAX_DAY_BUCKETS})"
                )));
            }
            let mut day = from;
            while day <= to {
                let start = day_start_millis(tz, day);
                let end = day_start_millis(tz, day + Duration::days(1));
                let (revenue, collected, order_count) =
                    order_aggregates(pool, start, end, branch_id).await?;
                points.push(RevenuePoint {
                    bucket: day.format("%Y-%m-%d").to_string(),
                    revenue,
                    collected,
                    order_count,
                });
                day = day.succ_opt().expect("date overflow");
            }
        }
        Granularity::Month => {
            let mut month =
                NaiveDate::from_ymd_opt(from.year(), from.month(), 1).expect("valid month start");
            let last = NaiveDate::from_ymd_opt(to.year(), to.month(), 1).expect("valid month start");
            while month <= last {
                if points.len() >= MAX_MONTH_BUCKETS {
                    return Err(RepoError::Validation(format!(
                        "Date range too wide: more than {MAX_MONTH_BUCKETS} months"
                    )));
                }
                let next = first_of_next_month(month);
                let start = day_start_millis(tz, month);
                let end = day_start_millis(tz, next);
                let (revenue, collected, order_count) =
                    order_aggregates(pool, start, end, branch_id).await?;
                points.push(RevenuePoint {
                    bucket: month.format("%Y-%m").to_string(),
                    revenue,
                    collected,
                    order_count,
                });
                month = next;
            }
        }
    }

    Ok(points)
}

/// Expense totals grouped by category for an inclusive date range
pub async fn expenses_by_category(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
    branch_id: Option<i64>,
) -> RepoResult<Vec<ExpenseByCategory>> {
    validate_range(from, to)?;
    let rows = sqlx::query_as::<_, ExpenseByCategory>(
        "SELECT ec.name AS category_name, COALESCE(SUM(e.amount), 0.0) AS total, COUNT(*) AS count \
         FROM expense e JOIN expense_category ec ON e.expense_category_id = ec.id \
         WHERE e.incurred_on >= ?1 AND e.incurred_on <= ?2 AND (?3 IS NULL OR e.branch_id = ?3) \
         GROUP BY ec.id, ec.name ORDER BY total DESC",
    )
    .bind(from.format("%Y-%m-%d").to_string())
    .bind(to.format("%Y-%m-%d").to_string())
    .bind(branch_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Payment totals grouped by method
pub async fn payment_methods(
    pool: &SqlitePool,
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
    branch_id: Option<i64>,
) -> RepoResult<Vec<PaymentMethodBreakdown>> {
    validate_range(from, to)?;
    let start = day_start_millis(tz, from);
    let end = day_start_millis(tz, to + Duration::days(1));
    let rows = sqlx::query_as::<_, PaymentMethodBreakdown>(
        "SELECT p.method AS method, COALESCE(SUM(p.amount), 0.0) AS total, COUNT(*) AS count \
         FROM payment p JOIN orders o ON p.order_id = o.id \
         WHERE p.created_at >= ?1 AND p.created_at < ?2 AND o.status != 'CANCELLED' \
         AND (?3 IS NULL OR o.branch_id = ?3) \
         GROUP BY p.method ORDER BY total DESC",
    )
    .bind(start)
    .bind(end)
    .bind(branch_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Revenue and quantity per service type, highest revenue first
pub async fn top_services(
    pool: &SqlitePool,
    tz: Tz,
    from: NaiveDate,
    to: NaiveDate,
    branch_id: Option<i64>,
) -> RepoResult<Vec<TopService>> {
    validate_range(from, to)?;
    let start = day_start_millis(tz, from);
    let end = day_start_millis(tz, to + Duration::days(1));
    let rows = sqlx::query_as::<_, TopService>(
        "SELECT oi.service_type_id AS service_type_id, st.name AS service_name, \
         COALESCE(SUM(oi.line_total), 0.0) AS revenue, COALESCE(SUM(oi.quantity), 0.0) AS quantity \
         FROM order_item oi \
         JOIN orders o ON oi.order_id = o.id \
         JOIN service_type st ON oi.service_type_id = st.id \
         WHERE o.created_at >= ?1 AND o.created_at < ?2 AND o.status != 'CANCELLED' \
         AND (?3 IS NULL OR o.branch_id = ?3) \
         GROUP BY oi.service_type_id, st.name ORDER BY revenue DESC LIMIT 10",
    )
    .bind(start)
    .bind(end)
    .bind(branch_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parsing() {
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert!("week".parse::<Granularity>().is_err());
    }

    #[test]
    fn month_rollover() {
        let dec = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(
            first_of_next_month(dec),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        let jan = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            first_of_next_month(jan),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
    }

    #[test]
    fn day_start_is_midnight_utc_for_utc_tz() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let millis = day_start_millis(chrono_tz::UTC, date);
        assert_eq!(millis % 86_400_000, 0);
    }
}
