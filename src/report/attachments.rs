use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use rust_xlsxwriter::{Format, Workbook};

use crate::survey::{QUESTIONS, SubmissionRecord, round_one_decimal};

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// One exported record, flattened for tabular output.
struct ExportRow {
    date: String,
    name: String,
    department: String,
    scores: Vec<Option<i16>>,
    average: Option<f64>,
    mood: &'static str,
    feedback: String,
}

impl ExportRow {
    fn from_record(record: &SubmissionRecord, offset: FixedOffset) -> Self {
        Self {
            date: record
                .created_at
                .with_timezone(&offset)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            name: record.name.clone(),
            department: record.department.clone(),
            scores: QUESTIONS
                .iter()
                .map(|q| record.scores.get(q.id).copied())
                .collect(),
            average: record.average_score().map(round_one_decimal),
            mood: record.mood_label().as_str(),
            feedback: record.feedback.clone(),
        }
    }
}

fn header_row() -> Vec<String> {
    let mut header = vec!["Date".to_string(), "Name".into(), "Department".into()];
    header.extend(QUESTIONS.iter().map(|q| format!("{} ({})", q.id, q.category)));
    header.extend(["Average".into(), "Mood".into(), "Feedback".into()]);
    header
}

/// CSV with one row per record, per-question scores and the row average.
pub fn render_csv(records: &[SubmissionRecord], offset: FixedOffset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header_row())
        .context("failed to write CSV header")?;

    for record in records {
        let row = ExportRow::from_record(record, offset);
        let mut fields = vec![row.date, row.name, row.department];
        fields.extend(
            row.scores
                .iter()
                .map(|score| score.map(|v| v.to_string()).unwrap_or_default()),
        );
        fields.push(row.average.map(|v| format!("{v:.1}")).unwrap_or_default());
        fields.push(row.mood.to_string());
        fields.push(row.feedback);
        writer
            .write_record(&fields)
            .context("failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush CSV buffer: {}", err.error()))
}

/// Same rows as [`render_csv`], as a single-sheet workbook.
pub fn render_xlsx(records: &[SubmissionRecord], offset: FixedOffset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Weekly Moods")
        .context("failed to name worksheet")?;

    for (col, title) in header_row().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, title, &bold)
            .context("failed to write header cell")?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row_idx = (idx + 1) as u32;
        let row = ExportRow::from_record(record, offset);

        worksheet
            .write_string(row_idx, 0, &row.date)
            .context("failed to write date cell")?;
        worksheet
            .write_string(row_idx, 1, &row.name)
            .context("failed to write name cell")?;
        worksheet
            .write_string(row_idx, 2, &row.department)
            .context("failed to write department cell")?;

        let mut col: u16 = 3;
        for score in &row.scores {
            if let Some(value) = score {
                worksheet
                    .write_number(row_idx, col, f64::from(*value))
                    .context("failed to write score cell")?;
            }
            col += 1;
        }

        if let Some(average) = row.average {
            worksheet
                .write_number(row_idx, col, average)
                .context("failed to write average cell")?;
        }
        worksheet
            .write_string(row_idx, col + 1, row.mood)
            .context("failed to write mood cell")?;
        worksheet
            .write_string(row_idx, col + 2, &row.feedback)
            .context("failed to write feedback cell")?;
    }

    workbook
        .save_to_buffer()
        .context("failed to serialise workbook")
}
