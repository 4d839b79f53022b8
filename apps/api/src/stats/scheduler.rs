use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::stats::aggregate::aggregate_day;

/// Minutes past UTC midnight before rolling up the finished day, leaving
/// room for writes that straddle the boundary.
const ROLLUP_DELAY_MINS: i64 = 5;

/// Spawns the daily rollup loop: shortly after each UTC midnight the
/// previous day is aggregated. Failures warn and the loop continues.
pub fn spawn_daily_rollup(pool: PgPool) {
    tokio::spawn(async move {
        loop {
            let sleep_for = until_next_rollup();
            tokio::time::sleep(sleep_for).await;

            let yesterday = match Utc::now().date_naive().pred_opt() {
                Some(d) => d,
                None => continue,
            };
            match aggregate_day(&pool, yesterday).await {
                Ok(()) => info!("Daily stats rolled up for {yesterday}"),
                Err(e) => warn!("Daily stats rollup failed for {yesterday}: {e}"),
            }
        }
    });
}

fn until_next_rollup() -> std::time::Duration {
    let now = Utc::now();
    let next = NaiveDateTime::new(now.date_naive(), NaiveTime::MIN)
        + ChronoDuration::days(1)
        + ChronoDuration::minutes(ROLLUP_DELAY_MINS);
    (next.and_utc() - now)
        .to_std()
        .unwrap_or_else(|_| std::time::Duration::from_secs(60))
}
