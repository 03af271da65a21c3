//! Query positions and their grouping by chromosome.

pub mod reader;

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::io::BufRead;
use std::num::ParseIntError;
use std::str::FromStr;

pub use reader::Reader;

/// The delimiter for a position record.
pub const POSITION_DELIMITER: char = '\t';

/// The minimum number of fields in a position record.
pub const NUM_POSITION_FIELDS: usize = 2;

/// An error associated with parsing a position record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the position line.
    IncorrectNumberOfFields(usize),
    /// An invalid coordinate.
    InvalidCoordinate(ParseIntError),
    /// A coordinate before the start of the chromosome.
    NegativeCoordinate(i64),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in position: expected at least {} fields, found {} \
                 fields",
                NUM_POSITION_FIELDS, n
            ),
            ParseError::InvalidCoordinate(err) => write!(f, "invalid coordinate: {}", err),
            ParseError::NegativeCoordinate(n) => write!(f, "negative coordinate: {}", n),
        }
    }
}

impl std::error::Error for ParseError {}

/// A single query position.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    /// The chromosome the position is located on.
    chromosome: String,
    /// The coordinate on the chromosome.
    coordinate: u64,
}

impl Position {
    /// Creates a new position.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::position::Position;
    ///
    /// let position = Position::new("chr1", 150);
    /// assert_eq!(position.chromosome(), "chr1");
    /// assert_eq!(position.coordinate(), 150);
    /// ```
    pub fn new(chromosome: impl Into<String>, coordinate: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            coordinate,
        }
    }

    /// Gets the chromosome.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the coordinate.
    pub fn coordinate(&self) -> u64 {
        self.coordinate
    }
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parses a `chromosome<TAB>coordinate` line. Any fields past the second
    /// are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.trim().split(POSITION_DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_POSITION_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let field = parts[1].trim();
        let coordinate = match field.parse::<u64>() {
            Ok(coordinate) => coordinate,
            Err(err) => match field.parse::<i64>() {
                Ok(n) if n < 0 => return Err(ParseError::NegativeCoordinate(n)),
                _ => return Err(ParseError::InvalidCoordinate(err)),
            },
        };

        Ok(Self::new(parts[0], coordinate))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.chromosome, self.coordinate)
    }
}

/// Query coordinates grouped by chromosome.
///
/// Chromosomes are kept in the order they were first seen. Within a
/// chromosome, coordinates are de-duplicated on insertion and iterate in
/// ascending order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Queries {
    /// The chromosomes, in first-seen order.
    order: Vec<String>,
    /// The distinct coordinates for each chromosome.
    coordinates: HashMap<String, BTreeSet<u64>>,
}

impl Queries {
    /// Reads every position from `reader` and groups them.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::position;
    ///
    /// let data = b"chr2\t10\nchr1\t150\nchr2\t10\nchr2\t5\n";
    /// let reader = position::Reader::new(&data[..]);
    /// let queries = position::Queries::try_from_reader(reader)?;
    ///
    /// let chromosomes = queries.iter().map(|(name, _)| name).collect::<Vec<_>>();
    /// assert_eq!(chromosomes, vec!["chr2", "chr1"]);
    /// assert_eq!(queries.get("chr2").unwrap().iter().copied().collect::<Vec<_>>(), vec![5, 10]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_from_reader<T>(mut reader: Reader<T>) -> Result<Self, reader::Error>
    where
        T: BufRead,
    {
        let mut queries = Self::default();

        for result in reader.positions() {
            queries.insert(result?);
        }

        Ok(queries)
    }

    /// Adds a position.
    ///
    /// This is where duplicate coordinates on the same chromosome are
    /// collapsed. Returns `false` if the position was already present.
    pub fn insert(&mut self, position: Position) -> bool {
        let Position {
            chromosome,
            coordinate,
        } = position;

        match self.coordinates.get_mut(&chromosome) {
            Some(set) => set.insert(coordinate),
            None => {
                self.order.push(chromosome.clone());
                self.coordinates
                    .entry(chromosome)
                    .or_default()
                    .insert(coordinate)
            }
        }
    }

    /// Gets the distinct coordinates queried on `chromosome`.
    pub fn get(&self, chromosome: &str) -> Option<&BTreeSet<u64>> {
        self.coordinates.get(chromosome)
    }

    /// Iterates over the chromosomes (in first-seen order) and their
    /// coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<u64>)> + '_ {
        self.order.iter().filter_map(|chromosome| {
            self.coordinates
                .get(chromosome)
                .map(|set| (chromosome.as_str(), set))
        })
    }

    /// Gets the number of chromosomes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether there are no queries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Gets the total number of distinct coordinates across all chromosomes.
    pub fn num_coordinates(&self) -> usize {
        self.coordinates.values().map(BTreeSet::len).sum()
    }
}

impl Extend<Position> for Queries {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        for position in iter {
            self.insert(position);
        }
    }
}

impl FromIterator<Position> for Queries {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut queries = Self::default();
        queries.extend(iter);
        queries
    }
}
