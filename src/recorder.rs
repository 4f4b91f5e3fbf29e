//! Appends result records as rows of a CSV file.

use crate::data_structs::ResultRecord;
use crate::error::*;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// What to do when the output file already has a header that differs from
/// the columns of the record being appended (a party appeared or vanished,
/// a label changed).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Append the record's values in its own order without looking at the
    /// header. Rows may end up misaligned with it.
    Ragged,
    /// Refuse to append; the file is left untouched.
    Reject,
    /// Rewrite the file under the union of both column sets, realigning the
    /// existing rows by column name. New columns go last.
    Rewrite
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        HeaderPolicy::Ragged
    }
}

/// Writes `ResultRecord`s to one CSV file, one row per record.
///
/// A missing (or empty) file gets a header made of the record's field names.
/// Nothing is locked; concurrent writers may interleave rows.
#[derive(Debug, Clone)]
pub struct CsvRecorder {
    path: PathBuf,
    policy: HeaderPolicy
}

impl CsvRecorder {
    pub fn new<P: Into<PathBuf>>(path: P, policy: HeaderPolicy) -> Self {
        CsvRecorder {
            path: path.into(),
            policy
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` as one row, creating the file with a header first if
    /// there isn't one yet.
    pub fn record(&self, record: &ResultRecord) -> Result<()> {
        let columns = record.field_names();

        if !self.has_content() {
            debug!(path = %self.path.display(), "creating output file");
            return self.append(Some(columns.as_slice()), &record.values())
                       .chain_err(|| self.write_failed());
        }

        match self.policy {
            HeaderPolicy::Ragged => {
                self.append(None, &record.values()).chain_err(|| self.write_failed())
            }
            HeaderPolicy::Reject => {
                let existing = self.existing_header().chain_err(|| self.write_failed())?;

                if existing != columns {
                    bail!(ErrorKind::HeaderMismatch(existing, columns));
                }

                self.append(None, &record.values()).chain_err(|| self.write_failed())
            }
            HeaderPolicy::Rewrite => self.rewrite_with(record)
        }
    }

    fn write_failed(&self) -> ErrorKind {
        ErrorKind::WriteFailed(self.path.display().to_string())
    }

    fn has_content(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false)
    }

    fn append(&self, header: Option<&[String]>, row: &[String]) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        if let Some(header) = header {
            writer.write_record(header)?;
        }
        writer.write_record(row)?;
        writer.flush()?;

        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<File>> {
        Ok(ReaderBuilder::new().flexible(true).from_path(&self.path)?)
    }

    fn existing_header(&self) -> Result<Vec<String>> {
        let mut reader = self.reader()?;
        Ok(reader.headers()?.iter().map(String::from).collect())
    }

    fn rewrite_with(&self, record: &ResultRecord) -> Result<()> {
        let existing = self.existing_header().chain_err(|| self.write_failed())?;
        let columns = record.field_names();

        if existing == columns {
            return self.append(None, &record.values()).chain_err(|| self.write_failed());
        }

        let rows = self.existing_rows().chain_err(|| self.write_failed())?;

        // Cells past the header have no column name to realign them under
        if let Some(row) = rows.iter().find(|row| row.len() > existing.len()) {
            let line = row.position().map(|pos| pos.line()).unwrap_or(0);
            bail!(ErrorKind::RaggedRows(self.path.display().to_string(), line));
        }

        let mut union = existing.clone();
        for name in &columns {
            if !union.contains(name) {
                union.push(name.clone());
            }
        }

        info!(
            path = %self.path.display(),
            old = existing.len(),
            new = union.len(),
            "header changed, rewriting output file"
        );

        let tmp_path = self.path.with_extension("csv.tmp");
        let written = write_realigned(&tmp_path, &existing, &union, &rows, record)
            .and_then(|()| Ok(fs::rename(&tmp_path, &self.path)?));

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        written.chain_err(|| self.write_failed())
    }

    fn existing_rows(&self) -> Result<Vec<StringRecord>> {
        let mut reader = self.reader()?;
        let mut rows = vec![];

        for row in reader.records() {
            rows.push(row?);
        }

        Ok(rows)
    }
}

/// Writes `union` as the header, then `rows` realigned from `header`, then
/// `record`.
fn write_realigned(
    path: &Path,
    header: &[String],
    union: &[String],
    rows: &[StringRecord],
    record: &ResultRecord
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    writer.write_record(union)?;

    for row in rows {
        writer.write_record(&realign(row, header, union))?;
    }

    let new_row: Vec<String> = union.iter()
        .map(|name| record.value_of(name).unwrap_or_default())
        .collect();
    writer.write_record(&new_row)?;
    writer.flush()?;

    Ok(())
}

/// Lays out `row`, read under `header`, along the columns of `union`.
///
/// `row` must not be longer than `header`; short rows get empty cells.
fn realign(row: &StringRecord, header: &[String], union: &[String]) -> Vec<String> {
    union.iter()
         .map(|name| {
             header.iter()
                   .position(|h| h == name)
                   .and_then(|i| row.get(i))
                   .unwrap_or("")
                   .to_string()
         })
         .collect()
}
