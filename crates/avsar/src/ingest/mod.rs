//! CSV catalog import. Collaborators export verified opportunity listings as
//! CSV; this adapter turns them into domain [`Opportunity`] values, skipping
//! malformed rows instead of failing the whole import.
//!
//! [`Opportunity`]: crate::matching::Opportunity

mod normalizer;
mod parser;

use std::io::Read;

use crate::matching::domain::Opportunity;

/// Parsed catalog export plus the count of rows that had to be skipped.
#[derive(Debug)]
pub struct CatalogImport {
    pub opportunities: Vec<Opportunity>,
    pub skipped: usize,
}

/// Error raised when an export cannot be read at all; row-level problems are
/// logged and counted instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("catalog csv could not be read: {0}")]
    Csv(#[from] csv::Error),
}

pub struct OpportunityCsvImporter;

impl OpportunityCsvImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<CatalogImport, CatalogImportError> {
        parser::parse_records(reader)
    }
}
