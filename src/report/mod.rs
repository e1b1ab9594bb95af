pub mod attachments;
pub mod mailer;
pub mod scheduler;
pub mod summary;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::{
    AppState,
    stats::compute_stats,
    store::{self, RecordQuery},
};

use attachments::{CSV_CONTENT_TYPE, XLSX_CONTENT_TYPE, render_csv, render_xlsx};
use mailer::{EmailAttachment, OutgoingEmail};
use summary::{ReportWindow, render_html, render_text};

pub const REPORT_WINDOW: Duration = Duration::days(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent { count: usize },
    Skipped,
}

/// Email the trailing seven days of check-ins to the configured recipient.
///
/// Sends nothing when the window is empty.
pub async fn generate_weekly_report(state: &AppState, now: DateTime<Utc>) -> Result<ReportOutcome> {
    let settings = &state.config().report;
    let offset = settings.utc_offset;
    let since = now - REPORT_WINDOW;

    let records = store::bounded(
        state.config().store_timeout,
        "weekly_report",
        state.store().find_recent(RecordQuery::since(since)),
    )
    .await?;

    if records.is_empty() {
        info!(%since, "weekly report skipped; no check-ins in window");
        return Ok(ReportOutcome::Skipped);
    }

    let local_now = now.with_timezone(&offset);
    let snapshot = compute_stats(&records, local_now);
    let window = ReportWindow {
        start: since.with_timezone(&offset),
        end: local_now,
    };

    let csv = render_csv(&records, offset).context("failed to render report CSV")?;
    let xlsx = render_xlsx(&records, offset).context("failed to render report workbook")?;
    let stamp = local_now.format("%Y-%m-%d");

    let email = OutgoingEmail {
        from: settings.sender.clone(),
        to: vec![settings.recipient.clone()],
        subject: format!("Happy Meter Weekly Report - {stamp}"),
        html: render_html(&snapshot, &window),
        text: render_text(&snapshot, &window),
        attachments: vec![
            EmailAttachment::new(format!("Mood_Report_{stamp}.csv"), CSV_CONTENT_TYPE, csv),
            EmailAttachment::new(format!("Mood_Report_{stamp}.xlsx"), XLSX_CONTENT_TYPE, xlsx),
        ],
    };

    state
        .mailer()
        .send(email)
        .await
        .context("failed to send weekly report email")?;

    info!(count = records.len(), recipient = %settings.recipient, "weekly report sent");
    Ok(ReportOutcome::Sent {
        count: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::{
        report::mailer::testing::RecordingMailer,
        store::MemoryStore,
        survey::{ScoreMap, SubmissionRecord},
        web::test_support::test_state,
    };

    fn record(name: &str, created_at: DateTime<Utc>) -> SubmissionRecord {
        SubmissionRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            department: "Corp".into(),
            scores: ScoreMap::from([("q1".to_string(), 4), ("q2".to_string(), 5)]),
            feedback: String::new(),
            created_at,
        }
    }

    #[tokio::test]
    async fn empty_window_sends_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let now = Utc.with_ymd_and_hms(2024, 10, 19, 8, 0, 0).unwrap();
        store
            .push_record(record("stale", now - Duration::days(8)))
            .await;

        let state = test_state(store, mailer.clone());
        let outcome = generate_weekly_report(&state, now).await.unwrap();

        assert_eq!(outcome, ReportOutcome::Skipped);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn sends_one_email_for_the_trailing_week() {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let now = Utc.with_ymd_and_hms(2024, 10, 19, 8, 0, 0).unwrap();
        store
            .push_record(record("stale", now - Duration::days(9)))
            .await;
        store
            .push_record(record("fresh", now - Duration::days(2)))
            .await;
        store
            .push_record(record("today", now - Duration::hours(1)))
            .await;

        let state = test_state(store, mailer.clone());
        let outcome = generate_weekly_report(&state, now).await.unwrap();
        assert_eq!(outcome, ReportOutcome::Sent { count: 2 });

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        let email = &sent[0];
        assert_eq!(email.to, vec![state.config().report.recipient.clone()]);
        assert_eq!(email.subject, "Happy Meter Weekly Report - 2024-10-19");
        assert_eq!(email.attachments.len(), 2);

        let csv = String::from_utf8(email.attachments[0].bytes.clone()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("today"));
        assert!(!csv.contains("stale"));
        assert!(email.text.contains("Total submissions: 2"));
    }
}
