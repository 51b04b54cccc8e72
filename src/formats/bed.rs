//! BED interval input
//!
//! Reads valued intervals from BED-like files with zero-copy line parsing
//! and groups them into per-chromosome units of work.
//!
//! Records must be grouped by chromosome and sorted by start within each
//! chromosome. Header lines (`#`, `track`, `browser`) and blank lines are
//! skipped; any other malformed line is an error carrying its line number.

use crate::core::io::{open_input, ByteLineIterator, InputReader};
use crate::core::{ConfigResult, ConfigurationError, Interval};
use log::warn;
use memchr::memchr_iter;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Column holding the value to correlate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    /// 0-based index from the start of the line
    Index(usize),
    /// 1-based position from the end of the line (1 = last field)
    FromEnd(usize),
}

impl ValueColumn {
    /// Build from a command-line column number.
    ///
    /// Positive numbers are 1-based, negative numbers count from the end.
    ///
    /// # Examples
    /// ```
    /// use fast_acf::formats::ValueColumn;
    /// assert_eq!(ValueColumn::from_arg(4).unwrap(), ValueColumn::Index(3));
    /// assert_eq!(ValueColumn::from_arg(-1).unwrap(), ValueColumn::FromEnd(1));
    /// assert!(ValueColumn::from_arg(0).is_err());
    /// ```
    pub fn from_arg(column: i64) -> ConfigResult<Self> {
        match column {
            0 => Err(ConfigurationError::InvalidColumn(
                "column numbers start at 1".to_string(),
            )),
            1 => Err(ConfigurationError::InvalidColumn(
                "column 1 holds the chromosome".to_string(),
            )),
            c if c > 0 => Ok(ValueColumn::Index((c - 1) as usize)),
            c => Ok(ValueColumn::FromEnd(c.unsigned_abs() as usize)),
        }
    }

    /// Resolve to a 0-based field index for a line with `field_count` fields
    pub fn resolve(&self, field_count: usize) -> Option<usize> {
        match *self {
            ValueColumn::Index(i) if i < field_count => Some(i),
            ValueColumn::FromEnd(k) if k >= 1 && k <= field_count => Some(field_count - k),
            _ => None,
        }
    }
}

impl Default for ValueColumn {
    /// The fourth column, as in `chrom start end p`
    fn default() -> Self {
        ValueColumn::Index(3)
    }
}

/// Errors reading interval records
#[derive(Debug, thiserror::Error)]
pub enum BedParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),

    #[error("Start {start} is greater than end {end}")]
    InvalidCoordinates { start: u64, end: u64 },

    #[error("Missing value column ({field_count} fields)")]
    MissingValue { field_count: usize },

    #[error("Invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        source: Box<BedParseError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One BED line split into tab-separated fields without copying.
/// Coordinates are parsed eagerly; the value column on demand.
pub struct BedRecordView<'a> {
    line: &'a [u8],
    pub chrom: &'a str,
    /// 0-based start
    pub start: u64,
    pub end: u64,
    fields: Vec<(usize, usize)>,
}

impl<'a> BedRecordView<'a> {
    pub fn parse(line: &'a [u8]) -> Result<Self, BedParseError> {
        if line.is_empty() {
            return Err(BedParseError::EmptyLine);
        }

        let mut fields = Vec::with_capacity(8);
        let mut from = 0;
        for tab in memchr_iter(b'\t', line) {
            fields.push((from, tab));
            from = tab + 1;
        }
        fields.push((from, line.len()));

        if fields.len() < 3 {
            return Err(BedParseError::TooFewFields {
                expected: 3,
                found: fields.len(),
            });
        }

        let slice = |i: usize| &line[fields[i].0..fields[i].1];
        let chrom =
            std::str::from_utf8(slice(0)).map_err(|_| BedParseError::InvalidUtf8("chrom"))?;
        let start = parse_coord(slice(1), "start")?;
        let end = parse_coord(slice(2), "end")?;
        if start > end {
            return Err(BedParseError::InvalidCoordinates { start, end });
        }

        Ok(Self {
            line,
            chrom,
            start,
            end,
            fields,
        })
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field `index` (0-based) as text, if present and valid UTF-8
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields
            .get(index)
            .and_then(|(start, end)| std::str::from_utf8(&self.line[*start..*end]).ok())
    }

    /// Parse the value column as a finite float
    pub fn value(&self, column: ValueColumn) -> Result<f64, BedParseError> {
        let field_count = self.field_count();
        let idx = column
            .resolve(field_count)
            .ok_or(BedParseError::MissingValue { field_count })?;
        let raw = self.field(idx).ok_or(BedParseError::InvalidUtf8("value"))?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(BedParseError::InvalidNumber("value", raw.to_string())),
        }
    }
}

fn parse_coord(bytes: &[u8], name: &'static str) -> Result<u64, BedParseError> {
    let s = std::str::from_utf8(bytes).map_err(|_| BedParseError::InvalidUtf8(name))?;
    s.parse()
        .map_err(|_| BedParseError::InvalidNumber(name, s.to_string()))
}

/// Check for lines that carry no record
fn is_header(line: &[u8]) -> bool {
    line.is_empty()
        || line.starts_with(b"#")
        || line.starts_with(b"track")
        || line.starts_with(b"browser")
}

/// Lazy stream of valued intervals from a BED-like source
pub struct BedIntervalReader<R: BufRead> {
    lines: ByteLineIterator<R>,
    column: ValueColumn,
    /// Last chromosome name, reused while consecutive records share it
    chrom: Option<Arc<str>>,
}

impl<R: BufRead> BedIntervalReader<R> {
    pub fn new(reader: R, column: ValueColumn) -> Self {
        Self {
            lines: ByteLineIterator::new(reader),
            column,
            chrom: None,
        }
    }
}

/// Reuse the cached chromosome name while consecutive records share it
fn share_chrom(cache: &mut Option<Arc<str>>, name: &str) -> Arc<str> {
    if let Some(c) = cache {
        if c.as_ref() == name {
            return Arc::clone(c);
        }
    }
    let c: Arc<str> = Arc::from(name);
    *cache = Some(Arc::clone(&c));
    c
}

impl BedIntervalReader<InputReader> {
    /// Open a (possibly compressed) file
    pub fn from_path<P: AsRef<Path>>(path: P, column: ValueColumn) -> std::io::Result<Self> {
        Ok(Self::new(open_input(path)?, column))
    }
}

impl<R: BufRead> Iterator for BedIntervalReader<R> {
    type Item = Result<Interval, BedParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.column;
        loop {
            let line = match self.lines.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if is_header(line) {
                continue;
            }

            let parsed = BedRecordView::parse(line).and_then(|view| {
                let value = view.value(column)?;
                Ok(Interval {
                    chrom: share_chrom(&mut self.chrom, view.chrom),
                    start: view.start,
                    end: view.end,
                    value,
                })
            });
            return Some(parsed.map_err(|e| BedParseError::InvalidRecord {
                line: self.lines.line_number(),
                source: Box::new(e),
            }));
        }
    }
}

/// All intervals of one contiguous chromosome block
#[derive(Debug, Clone, PartialEq)]
pub struct ChromGroup {
    pub chrom: Arc<str>,
    pub intervals: Vec<Interval>,
}

/// Groups a record stream into contiguous per-chromosome blocks
pub struct ChromGroups<I> {
    records: I,
    pending: Option<Interval>,
    seen: HashSet<Arc<str>>,
    done: bool,
}

impl<I> ChromGroups<I>
where
    I: Iterator<Item = Result<Interval, BedParseError>>,
{
    pub fn new(records: I) -> Self {
        Self {
            records,
            pending: None,
            seen: HashSet::new(),
            done: false,
        }
    }
}

impl<I> Iterator for ChromGroups<I>
where
    I: Iterator<Item = Result<Interval, BedParseError>>,
{
    type Item = Result<ChromGroup, BedParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let first = match self.pending.take() {
            Some(iv) => iv,
            None => match self.records.next() {
                Some(Ok(iv)) => iv,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            },
        };

        let chrom = Arc::clone(&first.chrom);
        if !self.seen.insert(Arc::clone(&chrom)) {
            warn!(
                "{} appears in more than one block; input is not grouped by chromosome",
                chrom
            );
        }

        let mut intervals = vec![first];
        loop {
            match self.records.next() {
                Some(Ok(iv)) if iv.chrom == chrom => intervals.push(iv),
                Some(Ok(iv)) => {
                    self.pending = Some(iv);
                    break;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        Some(Ok(ChromGroup { chrom, intervals }))
    }
}

/// Open a file and iterate its chromosome groups
pub fn read_chrom_groups<P: AsRef<Path>>(
    path: P,
    column: ValueColumn,
) -> std::io::Result<ChromGroups<BedIntervalReader<InputReader>>> {
    Ok(ChromGroups::new(BedIntervalReader::from_path(path, column)?))
}
