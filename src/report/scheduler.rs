use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Utc, Weekday};
use tokio::time::sleep;
use tracing::{error, info};

use crate::AppState;

use super::{ReportOutcome, generate_weekly_report};

const SEND_WEEKDAY: Weekday = Weekday::Sat;
const SEND_HOUR: u32 = 8;

/// Run the weekly report in-process, every Saturday 08:00 local time.
pub fn spawn(state: AppState) {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let offset = state.config().report.utc_offset;
            let next = next_run(now.with_timezone(&offset));
            let wait = (next.with_timezone(&Utc) - now)
                .to_std()
                .unwrap_or_default();
            info!(next_run = %next, "weekly report scheduled");
            sleep(wait).await;

            match generate_weekly_report(&state, Utc::now()).await {
                Ok(ReportOutcome::Sent { count }) => info!(count, "scheduled weekly report sent"),
                Ok(ReportOutcome::Skipped) => info!("scheduled weekly report skipped"),
                Err(err) => error!(?err, "scheduled weekly report failed"),
            }
        }
    });
}

/// First send slot strictly after `now`, in `now`'s offset.
pub fn next_run(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let offset = *now.offset();
    let days_ahead = (7 + SEND_WEEKDAY.num_days_from_monday() as i64
        - now.weekday().num_days_from_monday() as i64)
        % 7;
    let send_time = NaiveTime::from_hms_opt(SEND_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let local = (now.date_naive() + Duration::days(days_ahead)).and_time(send_time);
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    let candidate = DateTime::from_naive_utc_and_offset(utc, offset);

    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(7)
    }
}
