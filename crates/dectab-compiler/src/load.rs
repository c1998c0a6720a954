//! CSV row loader.
//!
//! Rows come in three kinds, decided by the first cell:
//! - `#...` - comment, the row is skipped
//! - `@...` - header: the remaining cells name the columns (the `@` is
//!   stripped from the first cell); the column map stays in effect for
//!   subsequent rows and files until replaced
//! - anything else - data: cell 0 is the conclusion value under the
//!   column-0 name, cells 1.. are condition values under their columns
//!
//! Empty cells inside a data row are ignored. Cells are decoded by the
//! CSV codec before interning, so quoted commas and doubled quotes
//! arrive as raw bytes.

use thiserror::Error;

use crate::table::{Inference, NameId, SourceId, Table, ValueId};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv parse fail on {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("empty @name @{path}:{row}:{col}")]
    EmptyHeaderIntro { path: String, row: u64, col: usize },

    #[error("empty name in '@' row @{path}:{row}:{col}")]
    EmptyHeaderName { path: String, row: u64, col: usize },

    #[error("duplicate name @{path}:{row}:{col}({cell})")]
    DuplicateName {
        path: String,
        row: u64,
        col: usize,
        cell: String,
    },

    #[error("empty value @{path}:{row}:{col}")]
    EmptyValue { path: String, row: u64, col: usize },

    #[error("excess value @{path}:{row}:{col}({cell})")]
    ExcessValue {
        path: String,
        row: u64,
        col: usize,
        cell: String,
    },

    #[error("duplicate value @{path}:{row}:{col}({cell})")]
    DuplicateCondition {
        path: String,
        row: u64,
        col: usize,
        cell: String,
    },

    #[error("duplicate inf @{prior_path}:{prior_row} @{path}:{row}")]
    DuplicateInference {
        prior_path: String,
        prior_row: u64,
        path: String,
        row: u64,
    },
}

/// Feeds decoded CSV rows into a [`Table`]. One loader instance is
/// driven over every input file so the header column map carries over.
#[derive(Default)]
pub struct Loader {
    /// Column index to name, from the most recent header row.
    columns: Vec<NameId>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one file's rows into `table`.
    pub fn load(&mut self, table: &mut Table, path: &str, data: &[u8]) -> Result<(), LoadError> {
        let source = table.add_source(path);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(data);

        for record in reader.byte_records() {
            let record = record.map_err(|source| LoadError::Csv {
                path: path.to_owned(),
                source,
            })?;
            let row = record.position().map_or(0, |p| p.line());
            self.row(table, path, source, row, &record)?;
        }
        Ok(())
    }

    fn row(
        &mut self,
        table: &mut Table,
        path: &str,
        source: SourceId,
        row: u64,
        record: &csv::ByteRecord,
    ) -> Result<(), LoadError> {
        let first = record.get(0).unwrap_or_default();
        if first.first() == Some(&b'#') {
            return Ok(());
        }
        if first.first() == Some(&b'@') {
            return self.header_row(table, path, row, record);
        }
        self.data_row(table, path, source, row, record)
    }

    fn header_row(
        &mut self,
        table: &mut Table,
        path: &str,
        row: u64,
        record: &csv::ByteRecord,
    ) -> Result<(), LoadError> {
        let mut columns = Vec::with_capacity(record.len());
        for (col, cell) in record.iter().enumerate() {
            // Strip the `@` introducer from the first cell.
            let cell = if col == 0 { &cell[1..] } else { cell };
            if cell.is_empty() {
                return Err(if col == 0 {
                    LoadError::EmptyHeaderIntro {
                        path: path.to_owned(),
                        row,
                        col,
                    }
                } else {
                    LoadError::EmptyHeaderName {
                        path: path.to_owned(),
                        row,
                        col,
                    }
                });
            }
            let sym = table.interner.intern(cell);
            let name = table.intern_name(sym);
            if columns.contains(&name) {
                return Err(LoadError::DuplicateName {
                    path: path.to_owned(),
                    row,
                    col,
                    cell: String::from_utf8_lossy(cell).into_owned(),
                });
            }
            columns.push(name);
        }
        self.columns = columns;
        Ok(())
    }

    fn data_row(
        &mut self,
        table: &mut Table,
        path: &str,
        source: SourceId,
        row: u64,
        record: &csv::ByteRecord,
    ) -> Result<(), LoadError> {
        let mut conclusion: Option<ValueId> = None;
        let mut conditions: Vec<ValueId> = Vec::new();

        for (col, cell) in record.iter().enumerate() {
            if cell.is_empty() {
                if col == 0 {
                    return Err(LoadError::EmptyValue {
                        path: path.to_owned(),
                        row,
                        col,
                    });
                }
                continue;
            }
            if col >= self.columns.len() {
                return Err(LoadError::ExcessValue {
                    path: path.to_owned(),
                    row,
                    col,
                    cell: String::from_utf8_lossy(cell).into_owned(),
                });
            }
            let sym = table.interner.intern(cell);
            let value = table.intern_value(self.columns[col], sym);
            if col == 0 {
                conclusion = Some(value);
            } else {
                self.condition(table, &mut conditions, value).map_err(|()| {
                    LoadError::DuplicateCondition {
                        path: path.to_owned(),
                        row,
                        col,
                        cell: String::from_utf8_lossy(cell).into_owned(),
                    }
                })?;
            }
        }

        let Some(conclusion) = conclusion else {
            return Ok(()); // blank record
        };
        let inf = Inference {
            conclusion,
            conditions,
            source,
            row,
        };
        if let Err(prior) = table.intern_inference(inf) {
            let prior = table.inference(prior);
            return Err(LoadError::DuplicateInference {
                prior_path: table.source_path(prior.source).to_owned(),
                prior_row: prior.row,
                path: path.to_owned(),
                row,
            });
        }
        Ok(())
    }

    /// Add a condition value. A repeat of the same value is a no-op; a
    /// different value under an already-present name is an error.
    pub(crate) fn condition(
        &self,
        table: &Table,
        conditions: &mut Vec<ValueId>,
        value: ValueId,
    ) -> Result<(), ()> {
        let name = table.value(value).name;
        let probe =
            conditions.binary_search_by(|&c| table.name_cmp(table.value(c).name, name));
        match probe {
            Ok(i) if conditions[i] == value => Ok(()),
            Ok(_) => Err(()),
            Err(_) => {
                table.add_value(conditions, value);
                Ok(())
            }
        }
    }
}
