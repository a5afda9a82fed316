//! Run records and the CSV sink they are written to.
//!
//! The column layout is shared with the other language implementations
//! and must not change:
//!
//! ```text
//! language,n,run,seconds,memory_mb,cpu_percent
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BenchError, Result};
use crate::metrics::Sample;

pub const HEADER: &str = "language,n,run,seconds,memory_mb,cpu_percent";

const SECONDS_DIGITS: usize = 6;

/// One measured kernel invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    pub language: String,
    pub n: usize,
    /// 1-based.
    pub run: usize,
    pub seconds: f64,
    pub memory_mb: Sample,
    pub cpu_percent: Sample,
}

impl RunRecord {
    /// The CSV row, without a line terminator.
    ///
    /// ```
    /// use matbench::{RunRecord, Sample};
    ///
    /// let record = RunRecord {
    ///     language: "rust".into(),
    ///     n: 512,
    ///     run: 1,
    ///     seconds: 0.1234567,
    ///     memory_mb: Sample::Available(10.5),
    ///     cpu_percent: Sample::Unavailable,
    /// };
    /// assert_eq!(record.to_row(), "rust,512,1,0.123457,10.50,-1.0");
    /// ```
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{},{},{:.2},{:.1}",
            self.language,
            self.n,
            self.run,
            format_seconds(self.seconds),
            self.memory_mb.value(),
            self.cpu_percent.value()
        )
    }
}

/// Formats elapsed seconds with 6 decimal places.
///
/// Timings that would round to `0.000000` (tiny `n`) get more decimals so
/// that 6 significant digits survive instead of a misleading zero.
///
/// ```
/// use matbench::report::format_seconds;
///
/// assert_eq!(format_seconds(1.5), "1.500000");
/// assert_eq!(format_seconds(0.05), "0.050000");
/// assert_eq!(format_seconds(0.000000123456789), "0.000000123457");
/// ```
pub fn format_seconds(seconds: f64) -> String {
    let mut decimals = SECONDS_DIGITS;
    if seconds > 0.0 && seconds < 1e-6 {
        let leading_zeros = (-seconds.log10()).floor() as usize;
        decimals = leading_zeros + SECONDS_DIGITS;
    }
    format!("{:.*}", decimals, seconds)
}

/// Line-oriented CSV writer.
///
/// Every row is formatted in full, written with one call and flushed, so
/// an abort after row N leaves exactly N complete rows behind. Dropping
/// the sink flushes whatever is buffered.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) `path`, creating missing parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        let create_err = |err| BenchError::CreateOutput {
            path: path.to_path_buf(),
            err,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create_err)?;
        }
        let file = File::create(path).map_err(create_err)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.write_line(HEADER)
    }

    pub fn write_record(&mut self, record: &RunRecord) -> Result<()> {
        self.write_line(&record.to_row())
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush().map_err(|err| BenchError::Write { err })?;
        Ok(self.writer)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        self.writer
            .write_all(buf.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|err| BenchError::Write { err })
    }
}
