use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::survey::{Department, MoodLabel, SubmissionRecord, round_one_decimal};

pub const RECENT_LIMIT: usize = 10;
pub const TREND_BUCKETS: usize = 7;
const WEEK: Duration = Duration::days(7);

/// Aggregate figures rendered by the dashboard and the weekly report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_count: usize,
    pub average_mood: f64,
    pub weekly_total: usize,
    pub weekly_average_mood: f64,
    pub week_start: DateTime<FixedOffset>,
    pub next_reset_at: DateTime<FixedOffset>,
    pub by_dept: Vec<DepartmentScore>,
    pub weekly_trend: Vec<TrendPoint>,
    pub recent: Vec<RecentEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentScore {
    pub name: &'static str,
    pub score: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub week: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub name: String,
    pub department: String,
    pub mood_label: MoodLabel,
    pub feedback: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    total: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn rounded_mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round_one_decimal(self.total / self.count as f64)
    }
}

/// Summarise `records` (most recent first) as seen from `now`.
///
/// `now`'s offset is the local zone used for week and day boundaries.
pub fn compute_stats(records: &[SubmissionRecord], now: DateTime<FixedOffset>) -> StatsSnapshot {
    let offset = *now.offset();
    let week_start = week_start(now);
    let week_start_utc = week_start.with_timezone(&Utc);

    let mut overall = MeanAccumulator::default();
    let mut weekly = MeanAccumulator::default();
    let mut weekly_total = 0_usize;
    let mut departments: HashMap<Department, MeanAccumulator> = HashMap::new();
    let mut days: BTreeMap<NaiveDate, MeanAccumulator> = BTreeMap::new();

    for record in records {
        let in_week = record.created_at >= week_start_utc;
        if in_week {
            weekly_total += 1;
        }

        let Some(avg) = record.average_score() else {
            continue;
        };

        overall.push(avg);
        if in_week {
            weekly.push(avg);
        }
        if let Some(dept) = record.known_department() {
            departments.entry(dept).or_default().push(avg);
        }
        let day = record.created_at.with_timezone(&offset).date_naive();
        days.entry(day).or_default().push(avg);
    }

    let by_dept = Department::ALL
        .into_iter()
        .map(|dept| {
            let acc = departments.get(&dept).copied().unwrap_or_default();
            DepartmentScore {
                name: dept.as_str(),
                score: acc.rounded_mean(),
                count: acc.count,
            }
        })
        .collect();

    let skip = days.len().saturating_sub(TREND_BUCKETS);
    let weekly_trend = days
        .iter()
        .skip(skip)
        .map(|(day, acc)| TrendPoint {
            week: day.format("%b %-d").to_string(),
            score: acc.rounded_mean(),
        })
        .collect();

    let recent = records
        .iter()
        .take(RECENT_LIMIT)
        .map(|record| RecentEntry {
            name: record.name.clone(),
            department: record.department.clone(),
            mood_label: record.mood_label(),
            feedback: record.feedback.clone(),
            created_at: record
                .created_at
                .with_timezone(&offset)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        })
        .collect();

    StatsSnapshot {
        total_count: records.len(),
        average_mood: overall.rounded_mean(),
        weekly_total,
        weekly_average_mood: weekly.rounded_mean(),
        week_start,
        next_reset_at: week_start + WEEK,
        by_dept,
        weekly_trend,
        recent,
    }
}

/// Most recent Sunday 00:00 in `now`'s offset.
pub fn week_start(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let offset = *now.offset();
    let days_back = i64::from(now.weekday().num_days_from_sunday());
    let midnight = (now.date_naive() - Duration::days(days_back)).and_time(NaiveTime::MIN);
    let utc = midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}
