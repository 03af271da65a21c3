//! A GTF file reader.

use std::io;
use std::io::BufRead;
use std::iter;
use std::str::FromStr;

use crate::feature;
use crate::feature::Record;
use crate::reader::read_line;

/// The prefix for a comment line.
pub const COMMENT_PREFIX: char = '#';

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// An invalid feature record, along with its 1-based line number and the
    /// offending line.
    InvalidRecord(feature::ParseError, usize, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::InvalidRecord(err, number, line) => {
                write!(f, "invalid feature record at line {number}: {err}\n\nline: {line}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A line within a GTF file.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,
    /// A comment or directive line (starting with `#`).
    Comment(String),
    /// A feature record.
    Record(Record),
}

impl FromStr for Line {
    type Err = feature::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Ok(Self::Empty)
        } else if s.starts_with(COMMENT_PREFIX) {
            Ok(Self::Comment(s.into()))
        } else {
            s.parse().map(Self::Record)
        }
    }
}

/// A GTF file reader.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,
    /// The number of lines read so far.
    line_number: usize,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a GTF file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";";
    /// let reader = gtfpos::feature::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            line_number: 0,
        }
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads a raw, textual line from the underlying reader.
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        let read = read_line(&mut self.inner, buffer)?;

        if read > 0 {
            self.line_number += 1;
        }

        Ok(read)
    }

    /// Attempts to read a [`Line`] from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::reader::Line;
    ///
    /// let data = b"#!genome-build GRCh38\nchr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";";
    /// let mut reader = gtfpos::feature::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Comment(_))));
    /// assert!(matches!(reader.read_line(&mut buffer)?, Some(Line::Record(_))));
    /// assert!(matches!(reader.read_line(&mut buffer)?, None));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        let read = self.read_line_raw(buffer).map_err(Error::Io)?;

        match read {
            0 => Ok(None),
            _ => buffer
                .parse::<Line>()
                .map(Some)
                .map_err(|e| Error::InvalidRecord(e, self.line_number, buffer.clone())),
        }
    }

    /// Returns an iterator over the feature records in the underlying reader.
    ///
    /// Empty lines and comment lines are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";\n\n\
    ///              chr2\tsrc\tgene\t5\t50\t.\t-\t.\tgene_id \"XYZ\";\n";
    /// let mut reader = gtfpos::feature::Reader::new(&data[..]);
    ///
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[1].seqname(), "chr2");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record, Error>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || loop {
            match self.read_line(&mut buffer) {
                Ok(None) => return None,
                Ok(Some(Line::Record(record))) => return Some(Ok(record)),
                Ok(Some(_)) => continue,
                Err(e) => return Some(Err(e)),
            }
        })
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_from_str() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!("".parse::<Line>()?, Line::Empty);
        assert_eq!("  ".parse::<Line>()?, Line::Empty);
        assert_eq!(
            "##gff-version 2".parse::<Line>()?,
            Line::Comment(String::from("##gff-version 2"))
        );
        assert!(matches!(
            "chr1\tsrc\tgene\t1\t2\t.\t+\t.\tgene_id \"A\";".parse::<Line>()?,
            Line::Record(_)
        ));
        Ok(())
    }

    #[test]
    fn test_records_skip_blank_and_comment_lines() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"# header\r\n\
                     chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";\r\n\
                     \r\n\
                     chr1\tsrc\tgene\t300\t400\t.\t+\t.\tgene_id \"DEF\";";
        let mut reader = Reader::new(&data[..]);

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].start(), 100);
        assert_eq!(records[1].attributes().as_str(), "gene_id \"DEF\";");
        assert_eq!(reader.line_number(), 4);

        Ok(())
    }

    #[test]
    fn test_invalid_record_reports_line_number() {
        let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";\nchr1\t150\n";
        let mut reader = Reader::new(&data[..]);

        let err = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid feature record at line 2: invalid number of fields in feature: \
             expected at least 9 fields, found 2 fields\n\nline: chr1\t150"
        );
    }
}
