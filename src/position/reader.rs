//! A position file reader.

use std::io;
use std::io::BufRead;
use std::iter;

use tracing::warn;

use crate::position;
use crate::position::Position;
use crate::reader::read_line;

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// An invalid position, along with its 1-based line number and the
    /// offending line.
    InvalidPosition(position::ParseError, usize, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::InvalidPosition(err, number, line) => {
                write!(f, "invalid position at line {number}: {err}\n\nline: {line}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A line within a position file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// A line with too few fields to hold a position, or whose coordinate is
    /// negative and so can never fall inside a feature.
    Skipped,
    /// A position.
    Position(Position),
}

/// A position file reader.
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
    /// Creates a position file reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            line_number: 0,
        }
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Attempts to read a [`Line`] from the underlying reader.
    ///
    /// Lines with fewer than two fields or a negative coordinate are returned
    /// as [`Line::Skipped`] rather than as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::position::reader::Line;
    /// use gtfpos::position::Position;
    ///
    /// let data = b"chr1\t150\nchr1\n";
    /// let mut reader = gtfpos::position::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert_eq!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some(Line::Position(Position::new("chr1", 150)))
    /// );
    /// assert_eq!(reader.read_line(&mut buffer)?, Some(Line::Skipped));
    /// assert_eq!(reader.read_line(&mut buffer)?, None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<Line>, Error> {
        let read = read_line(&mut self.inner, buffer).map_err(Error::Io)?;

        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;

        match buffer.parse::<Position>() {
            Ok(position) => Ok(Some(Line::Position(position))),
            Err(position::ParseError::IncorrectNumberOfFields(_)) => Ok(Some(Line::Skipped)),
            Err(e @ position::ParseError::NegativeCoordinate(_)) => {
                warn!("skipping line {}: {}", self.line_number, e);
                Ok(Some(Line::Skipped))
            }
            Err(e) => Err(Error::InvalidPosition(
                e,
                self.line_number,
                buffer.clone(),
            )),
        }
    }

    /// Returns an iterator over the positions in the underlying reader.
    pub fn positions(&mut self) -> impl Iterator<Item = Result<Position, Error>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || loop {
            match self.read_line(&mut buffer) {
                Ok(None) => return None,
                Ok(Some(Line::Position(position))) => return Some(Ok(position)),
                Ok(Some(Line::Skipped)) => continue,
                Err(e) => return Some(Err(e)),
            }
        })
    }
}
