//! The strand column of a feature record.

use std::io;
use std::str::FromStr;

/// An error related to the parsing of a strand.
#[derive(Debug)]
pub struct ParseStrandError(io::Error);

impl std::fmt::Display for ParseStrandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse strand error: {}", self.0)
    }
}

impl std::error::Error for ParseStrandError {}

/// The strand of a feature record.
///
/// Strand is carried on each record but never consulted during resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strand {
    /// The positive strand (`+`).
    Positive,
    /// The negative strand (`-`).
    Negative,
    /// A feature that is not stranded (`.`).
    Unstranded,
    /// A stranded feature whose strand is not known (`?`).
    Unknown,
}

impl FromStr for Strand {
    type Err = ParseStrandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Positive),
            "-" => Ok(Self::Negative),
            "." => Ok(Self::Unstranded),
            "?" => Ok(Self::Unknown),
            c => Err(ParseStrandError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not a valid strand", c),
            ))),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Positive => write!(f, "+"),
            Strand::Negative => write!(f, "-"),
            Strand::Unstranded => write!(f, "."),
            Strand::Unknown => write!(f, "?"),
        }
    }
}
