//! A builder for a [`GenomeIndex`].

use std::collections::HashMap;
use std::io::BufRead;

use tracing::debug;

use crate::feature;
use crate::feature::Record;
use crate::index::ChromosomeIndex;
use crate::index::Entry;
use crate::index::GenomeIndex;

/// An error related to building a [`GenomeIndex`].
#[derive(Debug)]
pub enum Error {
    /// An error reading feature records.
    InvalidRecords(feature::reader::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidRecords(err) => write!(f, "invalid feature records: {}", err),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`GenomeIndex`].
///
/// Records are accumulated with [`Builder::push()`] and frozen into an
/// immutable index with [`Builder::build()`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The features accumulated so far, keyed by chromosome and then by start.
    inner: HashMap<String, HashMap<u64, Entry>>,
    /// The number of records pushed.
    records: usize,
    /// The number of records that replaced an earlier record.
    overwritten: usize,
}

impl Builder {
    /// Adds a feature record.
    ///
    /// Features are keyed by `(chromosome, start)`, so this is the step that
    /// de-duplicates starts: a record with the same chromosome and start as an
    /// earlier one replaces it, and the replaced entry is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfpos::feature::Record;
    /// use gtfpos::index;
    ///
    /// let mut builder = index::Builder::default();
    /// let first = "chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"A\";".parse::<Record>()?;
    /// let second = "chr1\tsrc\tgene\t100\t300\t.\t+\t.\tgene_id \"B\";".parse::<Record>()?;
    ///
    /// assert!(builder.push(first).is_none());
    /// assert_eq!(builder.push(second).map(|entry| entry.end()), Some(200));
    ///
    /// let index = builder.build();
    /// assert_eq!(index.get("chr1").unwrap().get(100).unwrap().end(), 300);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn push(&mut self, record: Record) -> Option<Entry> {
        let (chromosome, start, end, attributes) = record.into_parts();

        self.records += 1;

        let replaced = self
            .inner
            .entry(chromosome)
            .or_default()
            .insert(start, Entry::new(end, attributes));

        if replaced.is_some() {
            self.overwritten += 1;
        }

        replaced
    }

    /// Freezes the accumulated records into a [`GenomeIndex`].
    pub fn build(self) -> GenomeIndex {
        let mut inner = HashMap::<String, ChromosomeIndex>::new();

        for (k, v) in self.inner.into_iter() {
            inner.insert(k, ChromosomeIndex::new(v));
        }

        debug!(
            records = self.records,
            overwritten = self.overwritten,
            chromosomes = inner.len(),
            "built feature index"
        );

        GenomeIndex { inner }
    }

    /// Builds a [`GenomeIndex`] from every record in a GTF file.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"ABC\";\n\
    ///              chr2\tsrc\tgene\t5\t50\t.\t-\t.\tgene_id \"XYZ\";\n";
    /// let reader = gtfpos::feature::Reader::new(&data[..]);
    ///
    /// let index = gtfpos::index::Builder::default().try_build_from(reader)?;
    /// assert_eq!(index.len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<T>(mut self, mut reader: feature::Reader<T>) -> Result<GenomeIndex>
    where
        T: BufRead,
    {
        for result in reader.records() {
            let record = result.map_err(Error::InvalidRecords)?;
            self.push(record);
        }

        Ok(self.build())
    }
}

impl Extend<Record> for Builder {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<Record> for GenomeIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut builder = Builder::default();
        builder.extend(iter);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: &[u8] = b"chr2\tsrc\tgene\t500\t600\t.\t+\t.\tgene_id \"C\";\n\
                              chr1\tsrc\tgene\t300\t400\t.\t+\t.\tgene_id \"B\";\n\
                              chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"A\";\n\
                              chr1\tsrc\texon\t100\t150\t.\t+\t.\tgene_id \"A2\";\n";

    #[test]
    fn test_build_groups_by_chromosome() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = Builder::default().try_build_from(feature::Reader::new(FEATURES))?;

        assert_eq!(index.len(), 2);
        assert_eq!(index.num_features(), 3);

        let mut chromosomes = index.chromosomes().collect::<Vec<_>>();
        chromosomes.sort();
        assert_eq!(chromosomes, vec!["chr1", "chr2"]);

        let chr1 = index.get("chr1").unwrap();
        assert_eq!(chr1.starts(), &[100, 300]);

        Ok(())
    }

    #[test]
    fn test_last_write_wins() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let index = Builder::default().try_build_from(feature::Reader::new(FEATURES))?;

        let entry = index.get("chr1").unwrap().get(100).unwrap();
        assert_eq!(entry.end(), 150);
        assert_eq!(entry.attributes().as_str(), "gene_id \"A2\";");

        Ok(())
    }

    #[test]
    fn test_empty_input_builds_empty_index() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let index = Builder::default().try_build_from(feature::Reader::new(&b"# nothing\n"[..]))?;
        assert!(index.is_empty());
        assert!(!index.contains("chr1"));
        Ok(())
    }

    #[test]
    fn test_building_twice_is_identical() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let first = Builder::default().try_build_from(feature::Reader::new(FEATURES))?;
        let second = Builder::default().try_build_from(feature::Reader::new(FEATURES))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_invalid_record_fails_the_build() {
        let data = b"chr1\tsrc\tgene\tx\t200\t.\t+\t.\tgene_id \"A\";\n";
        let err = Builder::default()
            .try_build_from(feature::Reader::new(&data[..]))
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("invalid feature records: invalid feature record at line 1"));
    }

    #[test]
    fn test_unread_columns_do_not_fail_the_build(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"chr1\tsrc\tgene\t100\t200\t.\t+\t.\tgene_id \"A\";\t\t\n\
                     chr1\tsrc\tgene\t300\t400\tNA\t+\t.\tgene_id \"B\";\n\
                     chr1\tsrc\tgene\t500\t600\t.\t+\t3\tgene_id \"C\";\n\
                     chr1\tsrc\tgene\t700\t800\t.\t*\t.\tgene_id \"D\";\n";
        let index = Builder::default().try_build_from(feature::Reader::new(&data[..]))?;

        let chr1 = index.get("chr1").unwrap();
        assert_eq!(chr1.starts(), &[100, 300, 500, 700]);

        Ok(())
    }

    #[test]
    fn test_from_iterator() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let records = feature::Reader::new(FEATURES)
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let index = records.into_iter().collect::<GenomeIndex>();
        assert_eq!(index.num_features(), 3);
        Ok(())
    }
}
