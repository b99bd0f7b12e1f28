//! Load stream definitions from CSV
//!
//! Expected header (optional columns may be omitted or left blank):
//! `id,label,kind,amount,frequency,apply_tax,tax_rate,active,interest_rate,interest_frequency`

use super::{StreamDefinition, StreamKind};
use crate::error::LoadError;
use crate::frequency::Frequency;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw CSV row before tokens are interpreted
#[derive(Debug, Deserialize)]
struct StreamRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
    kind: String,
    amount: f64,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    apply_tax: Option<String>,
    #[serde(default)]
    tax_rate: Option<f64>,
    #[serde(default)]
    active: Option<String>,
    #[serde(default)]
    interest_rate: Option<f64>,
    #[serde(default)]
    interest_frequency: Option<String>,
}

impl StreamRecord {
    /// `row` is the 1-based data row, used for generated ids
    fn into_definition(self, row: usize) -> Result<StreamDefinition, LoadError> {
        let kind: StreamKind = self.kind.parse()?;

        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => format!("row-{}", row),
        };

        let frequency = self
            .frequency
            .as_deref()
            .map(Frequency::parse_lenient)
            .unwrap_or_default();
        let interest_frequency = self
            .interest_frequency
            .as_deref()
            .map(Frequency::parse_lenient)
            .unwrap_or(Frequency::Yearly);

        Ok(StreamDefinition {
            id,
            label: self.label.unwrap_or_default(),
            kind,
            amount: self.amount,
            frequency,
            apply_tax: parse_flag(self.apply_tax.as_deref(), false)?,
            tax_rate_percent: self.tax_rate.unwrap_or(0.0),
            is_active: parse_flag(self.active.as_deref(), true)?,
            interest_rate_percent: self.interest_rate.unwrap_or(0.0),
            interest_frequency,
        })
    }
}

/// Interpret a yes/no cell; blank cells take `default`
fn parse_flag(value: Option<&str>, default: bool) -> Result<bool, LoadError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(LoadError::InvalidFlag(raw.to_string())),
    }
}

/// Load streams from a CSV file
pub fn load_streams<P: AsRef<Path>>(path: P) -> Result<Vec<StreamDefinition>, LoadError> {
    let file = File::open(path)?;
    load_streams_from_reader(file)
}

/// Load streams from any CSV source, preserving row order
pub fn load_streams_from_reader<R: Read>(reader: R) -> Result<Vec<StreamDefinition>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut streams = Vec::new();
    for (idx, result) in rdr.deserialize::<StreamRecord>().enumerate() {
        let row = idx + 1;
        let stream = result
            .map_err(LoadError::from)
            .and_then(|record| record.into_definition(row))
            .map_err(|e| LoadError::Row { row, source: Box::new(e) })?;
        streams.push(stream);
    }

    log::debug!("loaded {} stream definitions", streams.len());
    Ok(streams)
}
