//! Writers for projection results
//!
//! CSV is written in long format (one row per series per week) so any number of
//! streams fits a fixed header.

use std::io::Write;

use chrono::DateTime;
use serde::Serialize;

use crate::projection::ProjectionResult;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    series: &'a str,
    stream_id: &'a str,
    week: usize,
    timestamp_ms: i64,
    value: f64,
}

/// Write every point of every series as `series,stream_id,week,timestamp_ms,value`
pub fn write_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for series in result.series() {
        let stream_id = series.stream_id.as_deref().unwrap_or("");
        for (week, point) in series.points.iter().enumerate() {
            wtr.serialize(CsvRow {
                series: &series.label,
                stream_id,
                week,
                timestamp_ms: point.timestamp,
                value: point.value,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(result: &ProjectionResult, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, result)
}

/// Human-readable end state of each series, compared against `goal`
pub fn write_summary<W: Write>(result: &ProjectionResult, goal: f64, mut writer: W) -> std::io::Result<()> {
    let weeks = result.steps();
    let last_timestamp = result.aggregate().points.last().map(|p| p.timestamp);
    let end_date = last_timestamp
        .and_then(DateTime::from_timestamp_millis)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    writeln!(writer, "Goal:          {:.2}", goal)?;
    writeln!(
        writer,
        "Goal reached:  {}",
        if result.reaches(goal) { "yes" } else { "no" }
    )?;
    writeln!(writer, "Weeks:         {} (ending {})", weeks, end_date)?;
    writeln!(writer)?;
    writeln!(writer, "{:<32} {:>16}", "Series", "Final balance")?;
    for series in result.series() {
        writeln!(
            writer,
            "{:<32} {:>16.2}",
            series.label,
            series.last_value().unwrap_or(0.0)
        )?;
    }
    Ok(())
}
