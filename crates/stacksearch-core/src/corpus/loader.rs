//! CSV readers for the metadata table and the title-embedding matrix

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use super::{CorpusError, MetadataRecord};

/// Read the metadata table from a CSV file with a header row
pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRecord>, CorpusError> {
    let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    collect_metadata(reader)
}

/// Read the metadata table from any reader
pub fn read_metadata_from<R: Read>(reader: R) -> Result<Vec<MetadataRecord>, CorpusError> {
    collect_metadata(ReaderBuilder::new().has_headers(true).from_reader(reader))
}

fn collect_metadata<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<MetadataRecord>, CorpusError> {
    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<MetadataRecord>().enumerate() {
        let record = result?;
        for (column, value) in [
            ("overall_scores", record.votes),
            ("overall_scores_norm", f64::from(record.popularity_norm)),
            ("sentiment_polarity", f64::from(record.sentiment_polarity)),
        ] {
            if !value.is_finite() {
                return Err(CorpusError::InvalidValue {
                    row,
                    column: column.to_string(),
                    value: value.to_string(),
                });
            }
        }
        records.push(record);
    }
    Ok(records)
}

/// Read the title-embedding matrix: one header row, then one row per item
pub fn read_title_embeddings(path: &Path) -> Result<Vec<Vec<f32>>, CorpusError> {
    let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    collect_embeddings(reader)
}

/// Read the title-embedding matrix from any reader
pub fn read_title_embeddings_from<R: Read>(reader: R) -> Result<Vec<Vec<f32>>, CorpusError> {
    collect_embeddings(ReaderBuilder::new().has_headers(true).from_reader(reader))
}

fn collect_embeddings<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Vec<f32>>, CorpusError> {
    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let mut vector = Vec::with_capacity(record.len());
        for (column, cell) in record.iter().enumerate() {
            let value = cell
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CorpusError::InvalidValue {
                    row,
                    column: column.to_string(),
                    value: cell.to_string(),
                })?;
            vector.push(value);
        }
        rows.push(vector);
    }
    Ok(rows)
}
