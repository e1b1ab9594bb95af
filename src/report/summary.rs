use std::fmt::Write;

use chrono::{DateTime, FixedOffset};

use crate::{
    stats::StatsSnapshot,
    web::{escape_html, render_footer},
};

const SUMMARY_STYLES: &str = r#"
        body { font-family: "Helvetica Neue", Arial, sans-serif; background: #f8fafc; color: #0f172a; margin: 0; padding: 1.5rem; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; max-width: 640px; margin: 0 auto; }
        h1 { font-size: 1.35rem; margin-top: 0; }
        .metrics { display: flex; gap: 1rem; margin: 1rem 0 1.5rem; }
        .metric { flex: 1; background: #f1f5f9; border-radius: 10px; padding: 0.85rem 1rem; }
        .metric .value { font-size: 1.6rem; font-weight: 700; }
        .metric .label { font-size: 0.85rem; color: #475569; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 0.55rem 0.75rem; border-bottom: 1px solid #e2e8f0; text-align: left; font-size: 0.92rem; }
        th { background: #f1f5f9; }
        td.num { text-align: right; }
        .note { color: #475569; font-size: 0.85rem; margin-top: 1.25rem; }
        .app-footer { margin-top: 1.5rem; text-align: center; font-size: 0.8rem; color: #94a3b8; }
"#;

/// Date range covered by a report, in the report's local offset.
pub struct ReportWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ReportWindow {
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

pub fn render_html(snapshot: &StatsSnapshot, window: &ReportWindow) -> String {
    let mut dept_rows = String::new();
    for dept in &snapshot.by_dept {
        let score = if dept.count == 0 {
            "&ndash;".to_string()
        } else {
            format!("{:.1}", dept.score)
        };
        let _ = write!(
            dept_rows,
            "<tr><td>{name}</td><td class=\"num\">{count}</td><td class=\"num\">{score}</td></tr>",
            name = escape_html(dept.name),
            count = dept.count,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Happy Meter Weekly Report</title>
    <style>
{styles}
    </style>
</head>
<body>
    <div class="panel">
        <h1>Happy Meter Weekly Report</h1>
        <p>{window}</p>
        <div class="metrics">
            <div class="metric"><div class="value">{total}</div><div class="label">Check-ins</div></div>
            <div class="metric"><div class="value">{average:.1}</div><div class="label">Average mood (1-5)</div></div>
        </div>
        <table>
            <thead><tr><th>Department</th><th>Check-ins</th><th>Average</th></tr></thead>
            <tbody>{dept_rows}</tbody>
        </table>
        <p class="note">The full list of responses is attached as CSV and XLSX.</p>
    </div>
    {footer}
</body>
</html>"#,
        styles = SUMMARY_STYLES,
        window = escape_html(&window.label()),
        total = snapshot.total_count,
        average = snapshot.average_mood,
        footer = render_footer(),
    )
}

pub fn render_text(snapshot: &StatsSnapshot, window: &ReportWindow) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Happy Meter weekly report ({})", window.label());
    let _ = writeln!(output, "Total submissions: {}", snapshot.total_count);
    let _ = writeln!(output, "Average mood: {:.1}", snapshot.average_mood);
    let _ = writeln!(output);
    let _ = writeln!(output, "By department:");
    for dept in snapshot.by_dept.iter().filter(|d| d.count > 0) {
        let _ = writeln!(
            output,
            "- {}: {:.1} across {} check-ins",
            dept.name, dept.score, dept.count
        );
    }
    output
}
