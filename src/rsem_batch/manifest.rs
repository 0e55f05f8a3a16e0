use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::{BatchError, RowError};

/// One (sample, control, feature) triple from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    line: u64,
    sample_path: String,
    control_path: String,
    feature: String,
}

impl ManifestRow {
    pub fn new(line: u64, sample_path: &str, control_path: &str, feature: &str) -> Self {
        ManifestRow {
            line,
            sample_path: sample_path.to_string(),
            control_path: control_path.to_string(),
            feature: feature.to_string(),
        }
    }

    /// Parses one data line. Only the first three tab-delimited fields are
    /// used; each is trimmed of surrounding whitespace.
    pub fn parse(line_no: u64, line: &str) -> Result<Self, RowError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return Err(RowError::TooFewFields {
                line: line_no,
                found: fields.len(),
            });
        }

        Ok(ManifestRow::new(
            line_no,
            fields[0].trim(),
            fields[1].trim(),
            fields[2].trim(),
        ))
    }

    pub fn line(&self) -> u64 { self.line }
    pub fn sample_path(&self) -> &str { &self.sample_path }
    pub fn control_path(&self) -> &str { &self.control_path }
    pub fn feature(&self) -> &str { &self.feature }
}

/// Lazy reader over the data rows of a manifest.
///
/// The first line must be a field-header line starting with `#`. After it,
/// lines starting with `#` are comments and empty lines are ignored.
pub struct Manifest<R: BufRead> {
    lines: std::iter::Enumerate<io::Lines<R>>,
}

impl Manifest<BufReader<File>> {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let filename = filename.as_ref();
        let file = File::open(filename)
            .with_context(|| format!("opening manifest {:?}", filename))?;
        Self::read(BufReader::new(file))
            .with_context(|| format!("reading manifest {:?}", filename))
    }
}

impl<R: BufRead> Manifest<R> {
    pub fn read(mut input: R) -> Result<Self> {
        let mut header = String::new();
        input.read_line(&mut header)?;
        if !header.starts_with('#') {
            return Err(BatchError::MissingHeader.into());
        }

        Ok(Manifest {
            lines: input.lines().enumerate(),
        })
    }
}

impl<R: Read> Manifest<BufReader<R>> {
    pub fn from_reader(input: R) -> Result<Self> {
        Self::read(BufReader::new(input))
    }
}

impl<R: BufRead> Iterator for Manifest<R> {
    type Item = Result<ManifestRow, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, line_res) = self.lines.next()?;
            // header is line 1
            let line_no = idx as u64 + 2;

            let line = match line_res {
                Ok(line) => line,
                Err(e) => return Some(Err(RowError::Read { line: line_no, source: e })),
            };

            if line.starts_with('#') || line.is_empty() {
                continue;
            }

            return Some(ManifestRow::parse(line_no, &line));
        }
    }
}
