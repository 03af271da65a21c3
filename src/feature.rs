//! Feature records within a GTF file.

pub mod attributes;
pub mod reader;

use std::num::ParseIntError;
use std::str::FromStr;

use tracing::warn;

pub use attributes::Attributes;
pub use reader::Reader;

use crate::core::Strand;

/// The delimiter for a feature record.
pub const FEATURE_DELIMITER: char = '\t';

/// The number of mandatory fields in a feature record.
pub const NUM_FEATURE_FIELDS: usize = 9;

/// The placeholder for an empty score or frame.
const MISSING: &str = ".";

/// The largest valid frame.
const MAX_FRAME: u8 = 2;

/// An error associated with parsing a feature record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the feature line.
    IncorrectNumberOfFields(usize),
    /// An invalid start position.
    InvalidStart(ParseIntError),
    /// An invalid end position.
    InvalidEnd(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in feature: expected at least {} fields, found {} \
                 fields",
                NUM_FEATURE_FIELDS, n
            ),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {}", err),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

/// A feature record within a GTF file.
///
/// Positions are kept exactly as written: the interval is `start..=end`.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The name of the sequence (chromosome) the feature is located on.
    seqname: String,
    /// The program or database that produced the feature.
    source: String,
    /// The feature type.
    feature: String,
    /// The first position of the feature.
    start: u64,
    /// The last position of the feature.
    end: u64,
    /// The score, if any.
    score: Option<f32>,
    /// The strand.
    strand: Strand,
    /// The reading frame, if any.
    frame: Option<u8>,
    /// The attribute column.
    attributes: Attributes,
    /// The trailing comment, if any.
    comment: Option<String>,
}

impl Record {
    /// Gets the sequence name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Record;
    ///
    /// let record = "chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";".parse::<Record>()?;
    /// assert_eq!(record.seqname(), "chr1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn seqname(&self) -> &str {
        &self.seqname
    }

    /// Gets the source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Gets the feature type.
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Gets the start position.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Record;
    ///
    /// let record = "chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";".parse::<Record>()?;
    /// assert_eq!(record.start(), 100);
    /// assert_eq!(record.end(), 200);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Gets the end position.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Gets the score.
    pub fn score(&self) -> Option<f32> {
        self.score
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the frame.
    pub fn frame(&self) -> Option<u8> {
        self.frame
    }

    /// Gets the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Gets the comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Consumes the record and returns the parts the index keeps.
    pub(crate) fn into_parts(self) -> (String, u64, u64, Attributes) {
        (self.seqname, self.start, self.end, self.attributes)
    }
}

/// Parses an optional column where `.` denotes a missing value.
///
/// Unparseable values are treated as missing.
fn parse_optional<T>(s: &str, column: &str) -> Option<T>
where
    T: FromStr,
{
    match s {
        MISSING => None,
        s => match s.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("treating unparseable {} \"{}\" as missing", column, s);
                None
            }
        },
    }
}

impl FromStr for Record {
    type Err = ParseError;

    /// Parses a feature line.
    ///
    /// Only the sequence name, start, end and attribute columns are required to
    /// be well formed. Surrounding whitespace is ignored and any fields past
    /// the attribute column make up the comment. An unrecognized score, strand
    /// or frame is kept as missing (or [`Strand::Unknown`]) rather than failing
    /// the line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.trim().split(FEATURE_DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_FEATURE_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let start = parts[3].trim().parse().map_err(ParseError::InvalidStart)?;
        let end = parts[4].trim().parse().map_err(ParseError::InvalidEnd)?;
        let score = parse_optional::<f32>(parts[5], "score");
        let strand = parts[6].parse::<Strand>().unwrap_or_else(|err| {
            warn!("treating strand as unknown: {}", err);
            Strand::Unknown
        });
        let frame = parse_optional::<u8>(parts[7], "frame").filter(|frame| {
            let valid = *frame <= MAX_FRAME;
            if !valid {
                warn!("treating out-of-range frame {} as missing", frame);
            }
            valid
        });

        let comment = parts[NUM_FEATURE_FIELDS..].join("\t");
        let comment = Some(comment.trim())
            .filter(|comment| !comment.is_empty())
            .map(String::from);

        Ok(Self {
            seqname: parts[0].into(),
            source: parts[1].into(),
            feature: parts[2].into(),
            start,
            end,
            score,
            strand,
            frame,
            attributes: Attributes::from(parts[8]),
            comment,
        })
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t",
            self.seqname, self.source, self.feature, self.start, self.end
        )?;

        match self.score {
            Some(score) => write!(f, "{}\t", score)?,
            None => write!(f, "{}\t", MISSING)?,
        }

        write!(f, "{}\t", self.strand)?;

        match self.frame {
            Some(frame) => write!(f, "{}\t", frame)?,
            None => write!(f, "{}\t", MISSING)?,
        }

        write!(f, "{}", self.attributes)?;

        if let Some(comment) = &self.comment {
            write!(f, "\t{}", comment)?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_valid_record() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";  "
            .parse::<Record>()?;

        assert_eq!(record.seqname(), "chr1");
        assert_eq!(record.source(), "src");
        assert_eq!(record.feature(), "gene");
        assert_eq!(record.start(), 100);
        assert_eq!(record.end(), 200);
        assert_eq!(record.score(), None);
        assert_eq!(record.strand(), Strand::Positive);
        assert_eq!(record.frame(), None);
        assert_eq!(record.attributes().as_str(), "gene_id \"ABC\";");
        assert_eq!(record.comment(), None);

        Ok(())
    }

    #[test]
    fn test_valid_record_with_score_frame_and_comment() -> Result<(), Box<dyn std::error::Error>>
    {
        let record = "chr2\tensembl\tCDS\t5\t10\t0.5\t-\t2\tgene_id \"X\";\tnote"
            .parse::<Record>()?;

        assert_eq!(record.score(), Some(0.5));
        assert_eq!(record.strand(), Strand::Negative);
        assert_eq!(record.frame(), Some(2));
        assert_eq!(record.comment(), Some("note"));
        assert_eq!(
            record.to_string(),
            "chr2\tensembl\tCDS\t5\t10\t0.5\t-\t2\tgene_id \"X\";\tnote"
        );

        Ok(())
    }

    #[test]
    fn test_trailing_tabs_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t1\t2\t.\t.\t.\tgene_id \"A\";\t\t".parse::<Record>()?;
        assert_eq!(record.comment(), None);
        assert_eq!(record.strand(), Strand::Unstranded);
        assert_eq!(record.attributes().as_str(), "gene_id \"A\";");
        Ok(())
    }

    #[test]
    fn test_extra_fields_join_the_comment() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t1\t2\t.\t+\t.\tgene_id \"A\";\tone\ttwo\tthree"
            .parse::<Record>()?;
        assert_eq!(record.comment(), Some("one\ttwo\tthree"));
        assert_eq!(record.attributes().display_name(), Some(String::from("A")));
        Ok(())
    }

    #[test]
    fn test_unparseable_score_is_missing() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t100\t200\tNA\t+\t.\tgene_id \"ABC\";"
            .parse::<Record>()?;
        assert_eq!(record.score(), None);
        assert_eq!(record.start(), 100);
        Ok(())
    }

    #[test]
    fn test_unrecognized_strand_is_unknown() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t100\t200\t.\t*\t.\tgene_id \"ABC\";"
            .parse::<Record>()?;
        assert_eq!(record.strand(), Strand::Unknown);
        Ok(())
    }

    #[test]
    fn test_out_of_range_frame_is_missing() -> Result<(), Box<dyn std::error::Error>> {
        let record = "chr1\tsrc\tgene\t100\t200\t.\t+\t3\tgene_id \"ABC\";"
            .parse::<Record>()?;
        assert_eq!(record.frame(), None);

        let record = "chr1\tsrc\tgene\t100\t200\t.\t+\tx\tgene_id \"ABC\";"
            .parse::<Record>()?;
        assert_eq!(record.frame(), None);

        Ok(())
    }

    #[test]
    fn test_invalid_number_of_fields() {
        let err = "chr1\t150".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in feature: expected at least 9 fields, found 2 fields"
        );
    }

    #[test]
    fn test_invalid_start() {
        let err = "chr1\tsrc\tgene\tone\t200\t.\t+\t.\tgene_id \"ABC\";"
            .parse::<Record>()
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid start: invalid digit found in string");
    }

    #[test]
    fn test_invalid_end() {
        let err = "chr1\tsrc\tgene\t100\t\t.\t+\t.\tgene_id \"ABC\";"
            .parse::<Record>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid end: cannot parse integer from empty string"
        );
    }
}
