//! Resolving a batch of queries and writing the results.
//!
//! Every coordinate that falls inside a feature produces one line on the
//! output stream:
//!
//! ```text
//! <coordinate>\tfound in <name> on <chromosome>
//! ```
//!
//! Coordinates that fall inside no feature produce nothing. A chromosome that
//! is queried but absent from the index produces exactly one line on the
//! diagnostic stream, as does each coordinate whose containing feature has no
//! extractable name. Neither stops the run.

use std::io;
use std::io::Write;

use tracing::warn;

use crate::position::Queries;
use crate::resolve::Resolver;

/// Counts of the outcomes of a batch run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of distinct coordinates queried.
    pub coordinates: usize,
    /// The number of coordinates found within a feature.
    pub found: usize,
    /// The number of coordinates on an indexed chromosome that lie within no
    /// feature.
    pub not_found: usize,
    /// The number of coordinates skipped because of a malformed annotation.
    pub malformed: usize,
    /// The number of queried chromosomes that are absent from the index.
    pub unknown_chromosomes: usize,
}

/// Resolves every query and writes the results.
///
/// Found coordinates are written to `output` and diagnostics to
/// `diagnostics`. Only I/O errors on either stream abort the run.
///
/// # Examples
///
/// ```
/// use gtfpos::position;
/// use gtfpos::report;
/// use gtfpos::resolve::Resolver;
///
/// let features = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";  ";
/// let index = gtfpos::index::Builder::default()
///     .try_build_from(gtfpos::feature::Reader::new(&features[..]))?;
///
/// let positions = b"chr1\t150\nchr1\t250\nchr2\t10\n";
/// let queries = position::Queries::try_from_reader(position::Reader::new(&positions[..]))?;
///
/// let mut output = Vec::new();
/// let mut diagnostics = Vec::new();
/// let summary = report::run(&Resolver::new(&index), &queries, &mut output, &mut diagnostics)?;
///
/// assert_eq!(String::from_utf8(output)?, "150\tfound in ABC on chr1\n");
/// assert_eq!(
///     String::from_utf8(diagnostics)?,
///     "Hey! Chromosome chr2 has positions in the input, but it does not occur in the GTF.\n"
/// );
/// assert_eq!(summary.found, 1);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<O, D>(
    resolver: &Resolver<'_>,
    queries: &Queries,
    mut output: O,
    mut diagnostics: D,
) -> io::Result<Summary>
where
    O: Write,
    D: Write,
{
    let mut summary = Summary::default();

    for (chromosome, coordinates) in queries.iter() {
        summary.coordinates += coordinates.len();

        let results = match resolver.resolve_all(chromosome, coordinates.iter().copied()) {
            Some(results) => results,
            None => {
                summary.unknown_chromosomes += 1;
                writeln!(
                    diagnostics,
                    "Hey! Chromosome {} has positions in the input, but it does not occur in the \
                     GTF.",
                    chromosome
                )?;
                continue;
            }
        };

        for (coordinate, result) in results {
            match result {
                Ok(Some(name)) => {
                    summary.found += 1;
                    writeln!(output, "{}\tfound in {} on {}", coordinate, name, chromosome)?;
                }
                Ok(None) => summary.not_found += 1,
                Err(err) => {
                    summary.malformed += 1;
                    warn!("skipping coordinate: {}", err);
                    writeln!(diagnostics, "Hey! Skipping a position: {}", err)?;
                }
            }
        }
    }

    output.flush()?;
    diagnostics.flush()?;

    Ok(summary)
}
