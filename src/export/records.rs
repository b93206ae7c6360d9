//! Text and JSON Lines record writers.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputFormat;

/// Writes `records` to `writer`, one per line.
///
/// `Text` uses each record's `Display` form; `Jsonl` serializes each record as
/// a single JSON object.
///
/// # Returns
///
/// Returns the number of records written.
pub fn write_records<W, R>(writer: &mut W, records: &[R], format: OutputFormat) -> Result<usize>
where
    W: Write,
    R: Serialize + Display,
{
    for record in records {
        let written = match format {
            OutputFormat::Text => writeln!(writer, "{}", record),
            OutputFormat::Jsonl => {
                let line = serde_json::to_string(record).context("Failed to serialize record")?;
                writeln!(writer, "{}", line)
            }
        };
        written.context("Failed to write record")?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::models::{AssignmentRecord, AssignmentStatus, CalendarEvent, ClassRecord, Link};

    fn classes() -> Vec<ClassRecord> {
        vec![
            ClassRecord {
                course_id: "4821".to_string(),
                course_name: "Algebra II".to_string(),
                grade: Some("B+".to_string()),
            },
            ClassRecord {
                course_id: "17".to_string(),
                course_name: "Chemistry".to_string(),
                grade: None,
            },
        ]
    }

    #[test]
    fn test_text_lines() {
        let mut out = Vec::new();
        let written = write_records(&mut out, &classes(), OutputFormat::Text).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "4821\tAlgebra II\tB+\n17\tChemistry\t\n"
        );
    }

    #[test]
    fn test_jsonl_lines() {
        let mut out = Vec::new();
        write_records(&mut out, &classes(), OutputFormat::Jsonl).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["course_id"], "4821");
        assert_eq!(lines[0]["grade"], "B+");
        assert!(lines[1]["grade"].is_null());
    }

    #[test]
    fn test_jsonl_dates_and_status() {
        let assignment = AssignmentRecord {
            status: AssignmentStatus::Due,
            title: Link {
                url: "/assignment?id=31".to_string(),
                title: "Essay".to_string(),
            },
            class_name: "English 10".to_string(),
            due: NaiveDate::from_ymd_opt(2012, 11, 5).unwrap(),
        };
        let mut out = Vec::new();
        write_records(&mut out, &[assignment], OutputFormat::Jsonl).unwrap();
        let line: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(line["status"], "due");
        assert_eq!(line["due"], "2012-11-05");
        assert_eq!(line["title"]["url"], "/assignment?id=31");
    }

    #[test]
    fn test_empty_output() {
        let mut out = Vec::new();
        let written =
            write_records::<_, CalendarEvent>(&mut out, &[], OutputFormat::Text).unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }
}
